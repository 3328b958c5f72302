//! Pre-qualification rule table, resolver, and the tooling around them.
//!
//! `resolve` is the single entry point most callers need. The remaining modules
//! verify the table is total, drive the wizard one question at a time, replay
//! CSV fixtures, and expose everything over HTTP.

pub mod coverage;
pub mod domain;
pub mod error;
pub mod fixtures;
pub mod resolver;
pub mod router;
pub mod session;
pub mod table;

#[cfg(test)]
mod tests;

pub use coverage::{verify_totality, CategoryCoverage, CoverageGap, CoverageReport};
pub use domain::{
    ApplicantProfile, Category, CreditAssessment, CreditStanding, FlagCode, Outcome,
    RentLiability, ScoreBand,
};
pub use error::{AssessmentField, QualificationError};
pub use fixtures::{Expectation, FixtureError, FixtureReport, FixtureSuite};
pub use resolver::{resolve, Branch, QualificationEngine, Resolution};
pub use router::{prequalification_router, ResolveRequest};
pub use session::{PrequalificationSession, SessionProgress, WizardAnswer, WizardStep};
pub use table::{EmploymentTypeEntry, EmploymentTypeView, RuleTable, RuleTableVersion};
