//! Pre-qualification flag resolution for rental applicants.
//!
//! The [`qualification`] module owns the static rule table and the pure resolver
//! that maps an applicant profile plus credit assessment onto either an
//! auto-qualify outcome or a routing flag such as `V_NLS461`.

pub mod config;
pub mod error;
pub mod qualification;
pub mod telemetry;

pub use qualification::{resolve, Outcome, QualificationError};
