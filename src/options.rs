// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Closed option sets offered by the forms.

/// Regions offered on the application form.
pub const APPLICATION_REGIONS: &[&str] = &[
    "Andijon",
    "Buxoro",
    "Farg'ona",
    "Jizzax",
    "Xorazm",
    "Namangan",
    "Navoiy",
    "Qashqadaryo",
    "Qoraqalpog'iston Respublikasi",
    "Samarqand",
    "Sirdaryo",
    "Surxondaryo",
    "Toshkent viloyati",
];

/// Regions offered on the survey form (adds Tashkent city).
pub const SURVEY_REGIONS: &[&str] = &[
    "Andijon",
    "Buxoro",
    "Farg'ona",
    "Jizzax",
    "Xorazm",
    "Namangan",
    "Navoiy",
    "Qashqadaryo",
    "Qoraqalpog'iston Respublikasi",
    "Samarqand",
    "Sirdaryo",
    "Surxondaryo",
    "Toshkent viloyati",
    "Toshkent shahri",
];

/// Learning center directions (application form, multi-select).
pub const DIRECTIONS: &[&str] = &[
    "IT / dasturlash",
    "Chet tillari",
    "Imtihonlarga tayyorlov",
    "Maktab fanlari",
    "Kasb-hunar",
    "Boshqa",
];

/// Operating status codes (survey form).
pub const OPERATING_STATUS_CODES: &[&str] = &["ha", "jarayonda", "yoq"];

/// Foreign language count codes (survey form).
pub const LANGUAGE_CODES: &[&str] = &["1", "2", "3", "4"];

/// Student achievement codes (survey form, multi-select).
pub const ACHIEVEMENT_CODES: &[&str] = &[
    "ielts",
    "multilevel",
    "other_certs",
    "sat",
    "toefl",
    "topik",
    "goethe",
    "others",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_regions_extend_application_regions() {
        assert_eq!(SURVEY_REGIONS.len(), APPLICATION_REGIONS.len() + 1);
        assert!(APPLICATION_REGIONS.iter().all(|r| SURVEY_REGIONS.contains(r)));
        assert!(!APPLICATION_REGIONS.contains(&"Toshkent shahri"));
    }
}
