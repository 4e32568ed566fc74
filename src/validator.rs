// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission validator.
//!
//! Each form variant has a rule table of `{field, rule, required}` entries.
//! The validator evaluates every entry exactly once and collects all
//! failures into a [`ValidationReport`]; nothing short-circuits.
//!
//! Messages are in Uzbek, the language of the forms. Every failure also has
//! a stable machine-readable [`ValidationError::kind`].

use crate::options::{
    APPLICATION_REGIONS, LANGUAGE_CODES, OPERATING_STATUS_CODES, SURVEY_REGIONS,
};
use crate::submission::{fields, FieldValue, FormVariant, Submission};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::num::IntErrorKind;
use thiserror::Error;
use tracing::debug;

/// Field validation error. `Display` is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field left empty; carries the field's prompt
    #[error("{0}")]
    Missing(&'static str),

    #[error("Kamida {min} ta harfdan iborat bo'lishi kerak")]
    TooShort { min: usize },

    #[error("Faqat harflar, bo'sh joy va apostrof ishlatish mumkin")]
    InvalidCharacters,

    #[error("Iltimos, raqam kiriting")]
    NotANumber,

    #[error("Musbat raqam kiriting")]
    Negative,

    #[error("{min} dan {max} gacha bo'lgan son kiriting")]
    OutOfRange { min: i64, max: i64 },

    #[error("Qiymat juda katta ko'rinmoqda ({max} dan oshmasligi kerak)")]
    TooLarge { max: i64 },

    #[error("Telefon raqami {digits} ta raqamdan iborat bo'lishi kerak (masalan: 90 123 45 67)")]
    InvalidPhone { digits: usize },

    #[error("Noto'g'ri tanlov")]
    InvalidChoice,
}

impl ValidationError {
    /// Stable code for programmatic consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing(_) => "missing",
            Self::TooShort { .. } => "too_short",
            Self::InvalidCharacters => "invalid_characters",
            Self::NotANumber => "not_a_number",
            Self::Negative => "negative",
            Self::OutOfRange { .. } => "out_of_range",
            Self::TooLarge { .. } => "too_large",
            Self::InvalidPhone { .. } => "invalid_phone",
            Self::InvalidChoice => "invalid_choice",
        }
    }
}

/// Result of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Field is valid
    Valid,
    /// Field is invalid
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

/// Rule applied to a non-empty field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Letters, spaces and apostrophes only, at least `min_len` characters
    PersonName { min_len: usize },
    /// Any text of at least `min_len` characters after trimming
    Text { min_len: usize },
    /// Integer within `[min, max]`
    IntegerRange { min: i64, max: i64 },
    /// Non-negative integer no larger than `max`
    Count { max: i64 },
    /// Exactly `digits` decimal digits once whitespace is removed
    Phone { digits: usize },
    /// One of a closed set of option values
    OneOf(&'static [&'static str]),
    /// Yes/no question answered either way
    Answered,
    /// No constraint
    Unchecked,
}

pub const FULL_NAME_RULE: Rule = Rule::PersonName { min_len: 3 };
pub const AGE_RULE: Rule = Rule::IntegerRange { min: 14, max: 35 };
pub const PHONE_RULE: Rule = Rule::Phone { digits: 9 };
pub const STUDENT_COUNT_RULE: Rule = Rule::Count { max: 10_000 };

/// Prompts shown when a required field is left empty.
pub mod prompts {
    pub const FULL_NAME: &str = "Iltimos, to'liq ismingizni kiriting";
    pub const NAME: &str = "Iltimos, ismingizni kiriting";
    pub const AGE: &str = "Yoshingizni kiriting";
    pub const PHONE: &str = "Telefon raqamingizni kiriting";
    pub const REGION: &str = "Viloyatni tanlang";
    pub const LOCATION: &str = "Hududni tanlang";
    pub const DISTRICT: &str = "Tuman yoki shaharni kiriting";
    pub const CENTER_NAME: &str = "O'quv markazi nomini kiriting";
    pub const OPERATING_STATUS: &str = "Faoliyat holatini tanlang";
    pub const STUDENT_COUNT: &str = "O'quvchilar sonini kiriting";
    pub const LANGUAGES: &str = "Xorijiy tillar sonini tanlang";
    pub const ANSWER: &str = "Iltimos, javob bering";
}

/// Characters accepted as apostrophes in names (ASCII, typographic and
/// the Uzbek modifier letters).
const APOSTROPHES: &[char] = &['\'', '\u{2019}', '\u{02BB}', '\u{02BC}', '`'];

/// One entry of a variant's rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub required: bool,
    pub prompt: &'static str,
}

impl FieldRule {
    pub fn required(field: &'static str, rule: Rule, prompt: &'static str) -> Self {
        Self {
            field,
            rule,
            required: true,
            prompt,
        }
    }

    pub fn optional(field: &'static str, rule: Rule) -> Self {
        Self {
            field,
            rule,
            required: false,
            prompt: "",
        }
    }

    /// Evaluate this rule against one field value.
    pub fn evaluate(&self, value: FieldValue<'_>) -> ValidationResult {
        if is_blank(value) {
            return if self.required {
                ValidationResult::Invalid(ValidationError::Missing(self.prompt))
            } else {
                ValidationResult::Valid
            };
        }

        match (self.rule, value) {
            (Rule::Unchecked, _) => ValidationResult::Valid,
            // Non-blank toggles are answered by definition.
            (Rule::Answered, FieldValue::Toggle(_)) => ValidationResult::Valid,
            (rule, FieldValue::Text(text)) => check_text(rule, text),
            _ => ValidationResult::Invalid(ValidationError::InvalidChoice),
        }
    }
}

fn is_blank(value: FieldValue<'_>) -> bool {
    match value {
        FieldValue::Text(text) => text.trim().is_empty(),
        FieldValue::Toggle(answer) => !answer.is_answered(),
        FieldValue::Selection(selection) => selection.is_empty(),
        FieldValue::Absent => true,
    }
}

fn check_text(rule: Rule, text: &str) -> ValidationResult {
    let outcome = match rule {
        Rule::PersonName { min_len } => check_person_name(text, min_len),
        Rule::Text { min_len } => check_min_len(text.trim(), min_len),
        Rule::IntegerRange { min, max } => parse_integer(text).and_then(|n| {
            if (min..=max).contains(&n) {
                Ok(())
            } else {
                Err(ValidationError::OutOfRange { min, max })
            }
        }),
        Rule::Count { max } => parse_integer(text).and_then(|n| {
            if n < 0 {
                Err(ValidationError::Negative)
            } else if n > max {
                Err(ValidationError::TooLarge { max })
            } else {
                Ok(())
            }
        }),
        Rule::Phone { digits } => {
            let normalized = normalize_phone(text);
            if normalized.chars().count() == digits && normalized.chars().all(|c| c.is_ascii_digit())
            {
                Ok(())
            } else {
                Err(ValidationError::InvalidPhone { digits })
            }
        }
        Rule::OneOf(options) => {
            if options.contains(&text) {
                Ok(())
            } else {
                Err(ValidationError::InvalidChoice)
            }
        }
        Rule::Answered => Err(ValidationError::InvalidChoice),
        Rule::Unchecked => Ok(()),
    };

    match outcome {
        Ok(()) => ValidationResult::Valid,
        Err(e) => ValidationResult::Invalid(e),
    }
}

fn check_min_len(trimmed: &str, min_len: usize) -> Result<(), ValidationError> {
    if trimmed.chars().count() < min_len {
        Err(ValidationError::TooShort { min: min_len })
    } else {
        Ok(())
    }
}

fn check_person_name(text: &str, min_len: usize) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    check_min_len(trimmed, min_len)?;

    let allowed = |c: char| c.is_alphabetic() || c == ' ' || APOSTROPHES.contains(&c);
    if trimmed.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCharacters)
    }
}

/// Parse a whole number, saturating values too large for `i64`. Record
/// conversion parses with this too, so anything a rule accepts converts.
pub(crate) fn parse_integer(text: &str) -> Result<i64, ValidationError> {
    match text.trim().parse::<i64>() {
        Ok(n) => Ok(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ValidationError::NotANumber),
        },
    }
}

/// Remove all whitespace from a phone number.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validate a full name as the application form does.
pub fn validate_full_name(name: &str) -> ValidationResult {
    FieldRule::required(fields::FULL_NAME, FULL_NAME_RULE, prompts::FULL_NAME)
        .evaluate(FieldValue::Text(name))
}

/// Validate an age: an integer from 14 to 35 inclusive.
pub fn validate_age(age: &str) -> ValidationResult {
    FieldRule::required(fields::AGE, AGE_RULE, prompts::AGE).evaluate(FieldValue::Text(age))
}

/// Validate a local phone number (country code excluded).
pub fn validate_phone(phone: &str) -> ValidationResult {
    FieldRule::required(fields::PHONE, PHONE_RULE, prompts::PHONE)
        .evaluate(FieldValue::Text(phone))
}

/// Validate a student count: a whole number from 0 to 10 000.
pub fn validate_student_count(count: &str) -> ValidationResult {
    FieldRule::required(fields::STUDENT_COUNT, STUDENT_COUNT_RULE, prompts::STUDENT_COUNT)
        .evaluate(FieldValue::Text(count))
}

/// Rule table for one form variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    variant: FormVariant,
    rules: Vec<FieldRule>,
}

impl RuleSet {
    /// Built-in table for a variant.
    pub fn for_variant(variant: FormVariant) -> Self {
        match variant {
            FormVariant::Application => Self::application(),
            FormVariant::Survey => Self::survey(),
        }
    }

    /// Application form: every field but the directions is required.
    pub fn application() -> Self {
        Self {
            variant: FormVariant::Application,
            rules: vec![
                FieldRule::required(fields::FULL_NAME, FULL_NAME_RULE, prompts::FULL_NAME),
                FieldRule::required(fields::AGE, AGE_RULE, prompts::AGE),
                FieldRule::required(fields::PHONE, PHONE_RULE, prompts::PHONE),
                FieldRule::required(
                    fields::REGION,
                    Rule::OneOf(APPLICATION_REGIONS),
                    prompts::REGION,
                ),
                FieldRule::required(
                    fields::DISTRICT,
                    Rule::Text { min_len: 2 },
                    prompts::DISTRICT,
                ),
                FieldRule::required(fields::PLANNING_CENTER, Rule::Answered, prompts::ANSWER),
                FieldRule::optional(fields::CENTER_DIRECTIONS, Rule::Unchecked),
            ],
        }
    }

    /// Survey form: shorter names allowed, district optional.
    pub fn survey() -> Self {
        Self {
            variant: FormVariant::Survey,
            rules: vec![
                FieldRule::required(fields::NAME, Rule::Text { min_len: 2 }, prompts::NAME),
                FieldRule::required(
                    fields::CENTER_NAME,
                    Rule::Text { min_len: 3 },
                    prompts::CENTER_NAME,
                ),
                FieldRule::required(
                    fields::CENTER_LOCATION,
                    Rule::OneOf(SURVEY_REGIONS),
                    prompts::LOCATION,
                ),
                FieldRule::optional(fields::DISTRICT, Rule::Text { min_len: 2 }),
                FieldRule::required(
                    fields::OPERATING_STATUS,
                    Rule::OneOf(OPERATING_STATUS_CODES),
                    prompts::OPERATING_STATUS,
                ),
                FieldRule::required(
                    fields::STUDENT_COUNT,
                    STUDENT_COUNT_RULE,
                    prompts::STUDENT_COUNT,
                ),
                FieldRule::required(
                    fields::LANGUAGES_OFFERED,
                    Rule::OneOf(LANGUAGE_CODES),
                    prompts::LANGUAGES,
                ),
                FieldRule::optional(fields::ACHIEVEMENTS, Rule::Unchecked),
                FieldRule::optional(fields::FOREIGN_UNIVERSITIES, Rule::Unchecked),
                FieldRule::required(fields::LOAN_INTEREST, Rule::Answered, prompts::ANSWER),
            ],
        }
    }

    /// Replace the entry for `rule.field`, or append it if the table has none.
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        match self.rules.iter_mut().find(|r| r.field == rule.field) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

/// Aggregated validation outcome for a whole submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<&'static str, ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Names of the failing fields, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ValidationError)> {
        self.errors.iter().map(|(field, err)| (*field, err))
    }

    /// Field to user-facing message mapping.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, err)| (*field, err.to_string()))
            .collect()
    }
}

struct FieldIssue<'a>(&'a ValidationError);

impl Serialize for FieldIssue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FieldIssue", 2)?;
        s.serialize_field("kind", self.0.kind())?;
        s.serialize_field("message", &self.0.to_string())?;
        s.end()
    }
}

struct Issues<'a>(&'a BTreeMap<&'static str, ValidationError>);

impl Serialize for Issues<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, err) in self.0 {
            map.serialize_entry(field, &FieldIssue(err))?;
        }
        map.end()
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ValidationReport", 2)?;
        s.serialize_field("isValid", &self.is_valid())?;
        s.serialize_field("errors", &Issues(&self.errors))?;
        s.end()
    }
}

/// Validates submissions against the rule table of their variant.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    application: RuleSet,
    survey: RuleSet,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldValidator {
    /// Create a validator with the built-in rule tables.
    pub fn new() -> Self {
        Self {
            application: RuleSet::application(),
            survey: RuleSet::survey(),
        }
    }

    /// Swap in a custom table for the variant it targets.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        match rules.variant() {
            FormVariant::Application => self.application = rules,
            FormVariant::Survey => self.survey = rules,
        }
        self
    }

    pub fn rules(&self, variant: FormVariant) -> &RuleSet {
        match variant {
            FormVariant::Application => &self.application,
            FormVariant::Survey => &self.survey,
        }
    }

    /// Validate a complete submission, reporting every failing field.
    pub fn validate<F: Submission + ?Sized>(&self, form: &F) -> ValidationReport {
        let variant = form.variant();
        let mut report = ValidationReport::default();

        for entry in self.rules(variant).rules() {
            if let ValidationResult::Invalid(err) = entry.evaluate(form.field(entry.field)) {
                debug!(%variant, field = entry.field, kind = err.kind(), "Field invalid");
                report.errors.insert(entry.field, err);
            }
        }

        debug!(%variant, failed = report.len(), "Submission validated");
        report
    }
}
