use serde::Serialize;
use tracing::{debug, error};

use super::domain::{
    ApplicantProfile, Category, CreditAssessment, CreditStanding, FlagCode, Outcome, ScoreBand,
};
use super::error::{AssessmentField, QualificationError};
use super::table::{EmploymentTypeEntry, RuleTable};

/// Resolve against the standard rule table.
pub fn resolve(
    profile: &ApplicantProfile,
    assessment: &CreditAssessment,
) -> Result<Outcome, QualificationError> {
    QualificationEngine::standard().resolve(profile, assessment)
}

/// Which half of an employment type's rules applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    RentResponsible,
    NotRentResponsible,
}

/// Audit trail of a single resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub employment_type_code: String,
    pub category: Category,
    pub branch: Branch,
    pub standing: CreditStanding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_index: Option<u16>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Stateless resolver bound to a rule table.
#[derive(Debug, Clone, Copy)]
pub struct QualificationEngine {
    table: &'static RuleTable,
}

impl QualificationEngine {
    pub fn new(table: &'static RuleTable) -> Self {
        Self { table }
    }

    pub fn standard() -> Self {
        Self::new(RuleTable::standard())
    }

    pub fn table(&self) -> &'static RuleTable {
        self.table
    }

    pub fn resolve(
        &self,
        profile: &ApplicantProfile,
        assessment: &CreditAssessment,
    ) -> Result<Outcome, QualificationError> {
        self.resolve_detailed(profile, assessment)
            .map(|resolution| resolution.outcome)
    }

    pub fn resolve_detailed(
        &self,
        profile: &ApplicantProfile,
        assessment: &CreditAssessment,
    ) -> Result<Resolution, QualificationError> {
        let entry = self.table.entry(&profile.employment_type_code)?;
        if entry.student != profile.is_student {
            return Err(QualificationError::StudentStatusMismatch {
                code: entry.code(),
                declared: profile.is_student,
            });
        }

        let standing = classify(assessment)?;
        let resolution = if profile.rent_responsible {
            resolve_responsible(entry, standing, assessment.can_pay_extra_deposit)?
        } else {
            resolve_not_responsible(entry, standing)?
        };

        debug!(
            code = %resolution.employment_type_code,
            branch = ?resolution.branch,
            %standing,
            outcome = %resolution.outcome.summary(),
            "resolved pre-qualification outcome"
        );
        Ok(resolution)
    }
}

/// Classify the credit answers, rejecting combinations that cannot be routed.
pub fn classify(assessment: &CreditAssessment) -> Result<CreditStanding, QualificationError> {
    if !assessment.in_canada {
        return Ok(CreditStanding::NotInCanada);
    }

    match (assessment.credit_report_available, assessment.credit_score_band) {
        (true, Some(band)) => Ok(CreditStanding::Reported(band)),
        (true, None) => Err(QualificationError::IncompleteCreditAssessment {
            field: AssessmentField::CreditScoreBand,
        }),
        (false, None) => Ok(CreditStanding::NoReport),
        (false, Some(band)) => Err(QualificationError::InconsistentCreditAssessment {
            detail: format!("score band {band} supplied without a credit report"),
        }),
    }
}

/// Position inside the 8-flag responsible block, or `None` when the standing auto-qualifies.
pub fn responsible_sub_index(standing: CreditStanding, can_pay_extra_deposit: bool) -> Option<u16> {
    let rank = match standing {
        CreditStanding::NotInCanada => 0,
        CreditStanding::Reported(ScoreBand::Excellent) => 1,
        CreditStanding::Reported(ScoreBand::Fair) => 2,
        CreditStanding::Reported(ScoreBand::Poor | ScoreBand::Unknown)
        | CreditStanding::NoReport => 3,
        CreditStanding::Reported(ScoreBand::VeryGood | ScoreBand::Good) => return None,
    };
    Some(rank * 2 + u16::from(!can_pay_extra_deposit))
}

/// Position inside the 3-flag not-responsible block, or `None` when the standing auto-qualifies.
pub fn not_responsible_sub_index(standing: CreditStanding) -> Option<u16> {
    match standing {
        CreditStanding::Reported(ScoreBand::Fair) => Some(0),
        CreditStanding::Reported(ScoreBand::Poor) => Some(1),
        CreditStanding::NotInCanada => Some(2),
        CreditStanding::Reported(
            ScoreBand::Excellent | ScoreBand::VeryGood | ScoreBand::Good | ScoreBand::Unknown,
        )
        | CreditStanding::NoReport => None,
    }
}

/// Whether the full branch will need the extra-deposit answer for this standing.
pub fn requires_deposit_answer(standing: CreditStanding) -> bool {
    responsible_sub_index(standing, true).is_some()
}

fn resolve_responsible(
    entry: &EmploymentTypeEntry,
    standing: CreditStanding,
    can_pay_extra_deposit: Option<bool>,
) -> Result<Resolution, QualificationError> {
    if !requires_deposit_answer(standing) {
        return Ok(resolution(
            entry,
            Branch::RentResponsible,
            standing,
            None,
            Outcome::AutoQualify,
        ));
    }

    let can_pay = can_pay_extra_deposit.ok_or(QualificationError::IncompleteCreditAssessment {
        field: AssessmentField::ExtraDepositCapacity,
    })?;
    let sub_index = responsible_sub_index(standing, can_pay)
        .ok_or_else(|| unmapped(entry, true, standing))?;
    let base = entry
        .responsible_base
        .ok_or_else(|| unmapped(entry, true, standing))?;

    Ok(resolution(
        entry,
        Branch::RentResponsible,
        standing,
        Some(sub_index),
        Outcome::Flag {
            flag: FlagCode::new(base + sub_index),
        },
    ))
}

fn resolve_not_responsible(
    entry: &EmploymentTypeEntry,
    standing: CreditStanding,
) -> Result<Resolution, QualificationError> {
    let Some(sub_index) = not_responsible_sub_index(standing) else {
        return Ok(resolution(
            entry,
            Branch::NotRentResponsible,
            standing,
            None,
            Outcome::AutoQualify,
        ));
    };

    let base = entry
        .not_responsible_base
        .ok_or_else(|| unmapped(entry, false, standing))?;

    Ok(resolution(
        entry,
        Branch::NotRentResponsible,
        standing,
        Some(sub_index),
        Outcome::Flag {
            flag: FlagCode::new(base + sub_index),
        },
    ))
}

fn resolution(
    entry: &EmploymentTypeEntry,
    branch: Branch,
    standing: CreditStanding,
    sub_index: Option<u16>,
    outcome: Outcome,
) -> Resolution {
    Resolution {
        employment_type_code: entry.code(),
        category: entry.category,
        branch,
        standing,
        sub_index,
        outcome,
    }
}

fn unmapped(
    entry: &EmploymentTypeEntry,
    rent_responsible: bool,
    standing: CreditStanding,
) -> QualificationError {
    let code = entry.code();
    error!(%code, rent_responsible, %standing, "rule table has no flag block for combination");
    QualificationError::UnmappedCombination {
        code,
        rent_responsible,
        standing,
    }
}
