// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission data model.
//!
//! Forms hold what the user typed, as raw strings, so validation can report
//! on exactly that input. After validation a form converts into its typed
//! persistence record.

use crate::validator::{normalize_phone, parse_integer};
use serde::{Deserialize, Serialize};

/// Field names as they appear in validation reports and form payloads.
pub mod fields {
    pub const FULL_NAME: &str = "fullName";
    pub const AGE: &str = "age";
    pub const PHONE: &str = "phone";
    pub const REGION: &str = "region";
    pub const DISTRICT: &str = "district";
    pub const PLANNING_CENTER: &str = "planningCenter";
    pub const CENTER_DIRECTIONS: &str = "centerDirections";

    pub const NAME: &str = "name";
    pub const CENTER_NAME: &str = "centerName";
    pub const CENTER_LOCATION: &str = "centerLocation";
    pub const OPERATING_STATUS: &str = "operatingStatus";
    pub const STUDENT_COUNT: &str = "studentCount";
    pub const LANGUAGES_OFFERED: &str = "languagesOffered";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const FOREIGN_UNIVERSITIES: &str = "foreignUniversities";
    pub const LOAN_INTEREST: &str = "loanInterest";
}

/// Product variant a form belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    /// Learning center application form
    #[default]
    Application,
    /// Educational center survey
    Survey,
}

impl FormVariant {
    /// Remote table accepted submissions of this variant go to.
    pub fn default_table(&self) -> &'static str {
        match self {
            Self::Application => "applications",
            Self::Survey => "survey_responses",
        }
    }
}

impl std::fmt::Display for FormVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Application => write!(f, "application"),
            Self::Survey => write!(f, "survey"),
        }
    }
}

/// Answer to a yes/no question that starts out unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    #[default]
    Unanswered,
    Yes,
    No,
}

impl TriState {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Unanswered => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }

    pub fn is_answered(&self) -> bool {
        !matches!(self, Self::Unanswered)
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unanswered,
            Some(true) => Self::Yes,
            Some(false) => Self::No,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        value.as_bool()
    }
}

/// Multi-select answer. Items keep the order they were picked in and never
/// repeat.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item` if absent, remove it if present.
    pub fn toggle(&mut self, item: impl Into<String>) {
        let item = item.into();
        match self.0.iter().position(|s| *s == item) {
            Some(idx) => {
                self.0.remove(idx);
            }
            None => self.0.push(item),
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|s| s == item)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for Selection {
    fn from(items: Vec<String>) -> Self {
        let mut selection = Self::new();
        for item in items {
            if !selection.contains(&item) {
                selection.0.push(item);
            }
        }
        selection
    }
}

impl From<Selection> for Vec<String> {
    fn from(selection: Selection) -> Self {
        selection.0
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
    }
}

/// Borrowed view of a single form field, as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Toggle(TriState),
    Selection(&'a Selection),
    /// The form has no field of that name
    Absent,
}

/// A form that can be validated field by field and then persisted.
pub trait Submission {
    /// Typed row written to the remote store.
    type Record: Serialize + Send + Sync;

    fn variant(&self) -> FormVariant;

    /// Look up a field by its report name.
    fn field(&self, name: &str) -> FieldValue<'_>;

    /// Convert into the persistence record. Returns `None` when a field
    /// cannot be parsed, which only happens for forms that failed validation.
    fn to_record(&self) -> Option<Self::Record>;
}

/// Learning center application, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    pub full_name: String,
    pub age: String,
    pub phone: String,
    pub region: String,
    pub district: String,
    pub planning_center: TriState,
    pub center_directions: Selection,
}

/// Row written for an accepted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub full_name: String,
    pub age: u8,
    pub phone: String,
    pub region: String,
    pub district: String,
    pub planning_center: bool,
    pub center_directions: Vec<String>,
}

impl Submission for ApplicationForm {
    type Record = ApplicationRecord;

    fn variant(&self) -> FormVariant {
        FormVariant::Application
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            fields::FULL_NAME => FieldValue::Text(&self.full_name),
            fields::AGE => FieldValue::Text(&self.age),
            fields::PHONE => FieldValue::Text(&self.phone),
            fields::REGION => FieldValue::Text(&self.region),
            fields::DISTRICT => FieldValue::Text(&self.district),
            fields::PLANNING_CENTER => FieldValue::Toggle(self.planning_center),
            fields::CENTER_DIRECTIONS => FieldValue::Selection(&self.center_directions),
            _ => FieldValue::Absent,
        }
    }

    fn to_record(&self) -> Option<ApplicationRecord> {
        Some(ApplicationRecord {
            full_name: self.full_name.trim().to_string(),
            age: parse_whole(&self.age)?,
            phone: normalize_phone(&self.phone),
            region: self.region.clone(),
            district: self.district.trim().to_string(),
            planning_center: self.planning_center.as_bool()?,
            center_directions: self.center_directions.clone().into(),
        })
    }
}

/// Whether the surveyed center is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingStatus {
    #[serde(rename = "ha")]
    Operating,
    #[serde(rename = "jarayonda")]
    InProgress,
    #[serde(rename = "yoq")]
    NotOperating,
}

impl OperatingStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ha" => Some(Self::Operating),
            "jarayonda" => Some(Self::InProgress),
            "yoq" => Some(Self::NotOperating),
            _ => None,
        }
    }
}

/// How many foreign languages the center teaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguagesOffered {
    /// A single language
    #[serde(rename = "1")]
    One,
    /// English and Russian
    #[serde(rename = "2")]
    Two,
    /// English, Russian and German
    #[serde(rename = "3")]
    Three,
    /// Six or more languages
    #[serde(rename = "4")]
    Many,
}

impl LanguagesOffered {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            "3" => Some(Self::Three),
            "4" => Some(Self::Many),
            _ => None,
        }
    }
}

/// Educational center survey, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyForm {
    pub name: String,
    pub center_name: String,
    pub center_location: String,
    pub district: String,
    pub operating_status: String,
    pub student_count: String,
    pub languages_offered: String,
    pub achievements: Selection,
    pub foreign_universities: String,
    pub loan_interest: TriState,
}

/// Row written for an accepted survey response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub name: String,
    pub center_name: String,
    pub center_location: String,
    pub district: Option<String>,
    pub operating_status: OperatingStatus,
    pub student_count: u32,
    pub languages_offered: LanguagesOffered,
    pub achievements: Vec<String>,
    pub foreign_universities: Option<String>,
    pub loan_interest: bool,
}

impl Submission for SurveyForm {
    type Record = SurveyRecord;

    fn variant(&self) -> FormVariant {
        FormVariant::Survey
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            fields::NAME => FieldValue::Text(&self.name),
            fields::CENTER_NAME => FieldValue::Text(&self.center_name),
            fields::CENTER_LOCATION => FieldValue::Text(&self.center_location),
            fields::DISTRICT => FieldValue::Text(&self.district),
            fields::OPERATING_STATUS => FieldValue::Text(&self.operating_status),
            fields::STUDENT_COUNT => FieldValue::Text(&self.student_count),
            fields::LANGUAGES_OFFERED => FieldValue::Text(&self.languages_offered),
            fields::ACHIEVEMENTS => FieldValue::Selection(&self.achievements),
            fields::FOREIGN_UNIVERSITIES => FieldValue::Text(&self.foreign_universities),
            fields::LOAN_INTEREST => FieldValue::Toggle(self.loan_interest),
            _ => FieldValue::Absent,
        }
    }

    fn to_record(&self) -> Option<SurveyRecord> {
        Some(SurveyRecord {
            name: self.name.trim().to_string(),
            center_name: self.center_name.trim().to_string(),
            center_location: self.center_location.clone(),
            district: non_empty(&self.district),
            operating_status: OperatingStatus::from_code(&self.operating_status)?,
            student_count: parse_whole(&self.student_count)?,
            languages_offered: LanguagesOffered::from_code(&self.languages_offered)?,
            achievements: self.achievements.clone().into(),
            foreign_universities: non_empty(&self.foreign_universities),
            loan_interest: self.loan_interest.as_bool()?,
        })
    }
}

/// Parse with the validator's integer rules, then narrow to the record type.
fn parse_whole<T: TryFrom<i64>>(s: &str) -> Option<T> {
    T::try_from(parse_integer(s).ok()?).ok()
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
