// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Form generators for spam simulation.

use komak_intake::options::{APPLICATION_REGIONS, DIRECTIONS};
use komak_intake::submission::{ApplicationForm, Selection, TriState};

/// A valid application that varies with `i`.
pub fn valid_application(i: usize) -> ApplicationForm {
    let mut directions = Selection::new();
    for d in DIRECTIONS.iter().take(i % (DIRECTIONS.len() + 1)) {
        directions.toggle(*d);
    }

    ApplicationForm {
        full_name: format!("Ali Valiyev {}", ["Akramovich", "O'tkirovich", "Sobirovich"][i % 3]),
        age: (14 + i % 22).to_string(),
        phone: format!("9{:08}", i % 100_000_000),
        region: APPLICATION_REGIONS[i % APPLICATION_REGIONS.len()].to_string(),
        district: "Chilonzor".to_string(),
        planning_center: if i % 2 == 0 { TriState::Yes } else { TriState::No },
        center_directions: directions,
    }
}

/// Malformed applications of the kinds bots tend to send.
pub fn junk_applications() -> Vec<ApplicationForm> {
    let base = valid_application(0);
    vec![
        ApplicationForm::default(),
        ApplicationForm {
            full_name: "<script>alert(1)</script>".to_string(),
            ..base.clone()
        },
        ApplicationForm {
            full_name: "Robert'); DROP TABLE applications;--".to_string(),
            ..base.clone()
        },
        ApplicationForm {
            age: "1e9".to_string(),
            ..base.clone()
        },
        ApplicationForm {
            age: "-20".to_string(),
            ..base.clone()
        },
        ApplicationForm {
            phone: "+998 90 123 45 67".to_string(),
            ..base.clone()
        },
        ApplicationForm {
            phone: "0000000000000000000000".to_string(),
            ..base.clone()
        },
        ApplicationForm {
            region: "Atlantis".to_string(),
            ..base.clone()
        },
        ApplicationForm {
            district: "x".to_string(),
            ..base.clone()
        },
        ApplicationForm {
            planning_center: TriState::Unanswered,
            ..base
        },
    ]
}
