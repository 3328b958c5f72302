use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::qualification::domain::{
    ApplicantProfile, Category, CreditAssessment, FlagCode, Outcome, RentLiability, ScoreBand,
};
use crate::qualification::resolver::QualificationEngine;
use crate::qualification::table::{EmploymentTypeEntry, RuleTable, RuleTableVersion};

pub(super) fn engine() -> QualificationEngine {
    QualificationEngine::standard()
}

pub(super) fn student_responsible() -> ApplicantProfile {
    ApplicantProfile::new("ET_NLS92", true, true)
}

pub(super) fn non_student_responsible() -> ApplicantProfile {
    ApplicantProfile::new("ET_NLS105", true, false)
}

pub(super) fn reported(band: ScoreBand, can_pay: Option<bool>) -> CreditAssessment {
    CreditAssessment::reported(band, can_pay)
}

pub(super) fn flag(number: u16) -> Outcome {
    Outcome::Flag {
        flag: FlagCode::new(number),
    }
}

/// Table with a single entry that never received its flag blocks.
pub(super) fn gapped_engine() -> QualificationEngine {
    let entry = EmploymentTypeEntry {
        number: 1,
        category: Category::Nls1,
        student: true,
        range_liability: RentLiability::NotResponsible,
        liability: RentLiability::NotResponsible,
        responsible_base: None,
        not_responsible_base: Some(1),
    };
    let table = RuleTable::from_entries(
        RuleTableVersion {
            label: "gapped",
            effective_on: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        },
        vec![entry],
    );
    QualificationEngine::new(Box::leak(Box::new(table)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
