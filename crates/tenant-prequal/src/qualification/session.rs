//! Caller-owned wizard state for pre-qualification.
//!
//! The session only records answers; it never persists anything. Callers hand
//! it back on every request and ask for the next question to show.

use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfile, CreditAssessment, Outcome, ScoreBand};
use super::error::QualificationError;
use super::resolver::{classify, requires_deposit_answer, QualificationEngine};

/// Question the wizard should ask next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    EmploymentType,
    RentResponsibility,
    Residency,
    CreditReport,
    ScoreBand,
    ExtraDeposit,
    Complete,
}

/// A single answer recorded against the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "value", rename_all = "snake_case")]
pub enum WizardAnswer {
    EmploymentType(String),
    RentResponsibility(bool),
    Residency(bool),
    CreditReport(bool),
    ScoreBand(ScoreBand),
    ExtraDeposit(bool),
}

/// Where the session stands, plus the outcome once every required answer is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub step: WizardStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_rent_responsible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl SessionProgress {
    fn at(step: WizardStep) -> Self {
        Self {
            step,
            suggested_rent_responsible: None,
            outcome: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrequalificationSession {
    #[serde(default)]
    pub employment_type_code: Option<String>,
    #[serde(default)]
    pub rent_responsible: Option<bool>,
    #[serde(default)]
    pub in_canada: Option<bool>,
    #[serde(default)]
    pub credit_report_available: Option<bool>,
    #[serde(default)]
    pub credit_score_band: Option<ScoreBand>,
    #[serde(default)]
    pub can_pay_extra_deposit: Option<bool>,
}

impl PrequalificationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. Answers that make later questions moot clear them.
    pub fn apply(
        &mut self,
        engine: &QualificationEngine,
        answer: WizardAnswer,
    ) -> Result<(), QualificationError> {
        match answer {
            WizardAnswer::EmploymentType(code) => {
                let entry = engine.table().entry(&code)?;
                self.employment_type_code = Some(entry.code());
            }
            WizardAnswer::RentResponsibility(value) => self.rent_responsible = Some(value),
            WizardAnswer::Residency(value) => {
                self.in_canada = Some(value);
                if !value {
                    self.credit_report_available = None;
                    self.credit_score_band = None;
                }
            }
            WizardAnswer::CreditReport(value) => {
                self.credit_report_available = Some(value);
                if !value {
                    self.credit_score_band = None;
                }
            }
            WizardAnswer::ScoreBand(band) => self.credit_score_band = Some(band),
            WizardAnswer::ExtraDeposit(value) => self.can_pay_extra_deposit = Some(value),
        }
        Ok(())
    }

    pub fn next_step(
        &self,
        engine: &QualificationEngine,
    ) -> Result<SessionProgress, QualificationError> {
        let Some(code) = self.employment_type_code.as_deref() else {
            return Ok(SessionProgress::at(WizardStep::EmploymentType));
        };
        let entry = engine.table().entry(code)?;

        let Some(rent_responsible) = self.rent_responsible else {
            return Ok(SessionProgress {
                suggested_rent_responsible: Some(entry.liability.is_responsible()),
                ..SessionProgress::at(WizardStep::RentResponsibility)
            });
        };

        let Some(in_canada) = self.in_canada else {
            return Ok(SessionProgress::at(WizardStep::Residency));
        };

        let mut assessment = CreditAssessment {
            credit_report_available: false,
            credit_score_band: None,
            in_canada,
            can_pay_extra_deposit: self.can_pay_extra_deposit,
        };

        if in_canada {
            let Some(report) = self.credit_report_available else {
                return Ok(SessionProgress::at(WizardStep::CreditReport));
            };
            if report && self.credit_score_band.is_none() {
                return Ok(SessionProgress::at(WizardStep::ScoreBand));
            }
            assessment.credit_report_available = report;
            assessment.credit_score_band = self.credit_score_band;
        }

        let standing = classify(&assessment)?;
        if rent_responsible
            && requires_deposit_answer(standing)
            && self.can_pay_extra_deposit.is_none()
        {
            return Ok(SessionProgress::at(WizardStep::ExtraDeposit));
        }

        let profile = ApplicantProfile::new(entry.code(), rent_responsible, entry.student);
        let outcome = engine.resolve(&profile, &assessment)?;
        Ok(SessionProgress {
            outcome: Some(outcome),
            ..SessionProgress::at(WizardStep::Complete)
        })
    }
}
