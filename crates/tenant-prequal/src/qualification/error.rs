use std::fmt;

use serde::Serialize;

use super::domain::CreditStanding;

/// Assessment field that the active branch needed but did not receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentField {
    CreditScoreBand,
    #[serde(rename = "can_pay_extra_deposit")]
    ExtraDepositCapacity,
}

impl AssessmentField {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentField::CreditScoreBand => "credit_score_band",
            AssessmentField::ExtraDepositCapacity => "can_pay_extra_deposit",
        }
    }
}

impl fmt::Display for AssessmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure raised while resolving a qualification outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualificationError {
    #[error("employment type code '{code}' is not in the rule table")]
    InvalidEmploymentCode { code: String },
    #[error("employment type {code} does not match declared student status (is_student: {declared})")]
    StudentStatusMismatch { code: String, declared: bool },
    #[error("credit assessment is missing {field} for this branch")]
    IncompleteCreditAssessment { field: AssessmentField },
    #[error("credit assessment is inconsistent: {detail}")]
    InconsistentCreditAssessment { detail: String },
    #[error("rule table has no rule for {code} (rent responsible: {rent_responsible}, {standing})")]
    UnmappedCombination {
        code: String,
        rent_responsible: bool,
        standing: CreditStanding,
    },
}

impl QualificationError {
    /// True when the error points at the rule table rather than the caller's input.
    pub fn is_table_defect(&self) -> bool {
        matches!(self, QualificationError::UnmappedCombination { .. })
    }

    /// Stable identifier used by fixtures and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            QualificationError::InvalidEmploymentCode { .. } => "invalid_employment_code",
            QualificationError::StudentStatusMismatch { .. } => "student_status_mismatch",
            QualificationError::IncompleteCreditAssessment { .. } => {
                "incomplete_credit_assessment"
            }
            QualificationError::InconsistentCreditAssessment { .. } => {
                "inconsistent_credit_assessment"
            }
            QualificationError::UnmappedCombination { .. } => "unmapped_combination",
        }
    }
}
