use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfile, CreditAssessment, FlagCode, Outcome, ScoreBand};
use super::resolver::QualificationEngine;

const ERROR_KINDS: [&str; 5] = [
    "invalid_employment_code",
    "student_status_mismatch",
    "incomplete_credit_assessment",
    "inconsistent_credit_assessment",
    "unmapped_combination",
];

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid fixture CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: unrecognised expectation '{value}'")]
    InvalidExpectation { line: u64, value: String },
    #[error("{failed} of {cases} fixtures failed")]
    Failures { failed: usize, cases: usize },
}

/// What a fixture row expects the resolver to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Outcome(Outcome),
    Error(&'static str),
}

impl Expectation {
    fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("auto_qualify") {
            return Some(Expectation::Outcome(Outcome::AutoQualify));
        }
        if let Ok(flag) = value.parse::<FlagCode>() {
            return Some(Expectation::Outcome(Outcome::Flag { flag }));
        }
        ERROR_KINDS
            .into_iter()
            .find(|kind| kind.eq_ignore_ascii_case(value))
            .map(Expectation::Error)
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Outcome(Outcome::AutoQualify) => f.write_str("auto_qualify"),
            Expectation::Outcome(Outcome::Flag { flag }) => write!(f, "{flag}"),
            Expectation::Error(kind) => f.write_str(kind),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixtureCase {
    pub line: u64,
    pub profile: ApplicantProfile,
    pub assessment: CreditAssessment,
    pub expected: Expectation,
}

#[derive(Debug, Deserialize)]
struct FixtureRow {
    employment_type_code: String,
    rent_responsible: bool,
    is_student: bool,
    credit_report_available: bool,
    #[serde(default)]
    credit_score_band: Option<ScoreBand>,
    #[serde(default)]
    in_canada: Option<bool>,
    #[serde(default)]
    can_pay_extra_deposit: Option<bool>,
    expected: String,
}

/// Table-driven expectations loaded from CSV.
#[derive(Debug, Clone, Default)]
pub struct FixtureSuite {
    cases: Vec<FixtureCase>,
}

impl FixtureSuite {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FixtureError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut record = csv::StringRecord::new();
        let mut cases = Vec::new();

        while csv_reader.read_record(&mut record)? {
            let line = record.position().map_or(0, |position| position.line());
            let row: FixtureRow = record.deserialize(Some(&headers))?;
            let expected =
                Expectation::parse(&row.expected).ok_or(FixtureError::InvalidExpectation {
                    line,
                    value: row.expected.clone(),
                })?;

            cases.push(FixtureCase {
                line,
                profile: ApplicantProfile::new(
                    row.employment_type_code,
                    row.rent_responsible,
                    row.is_student,
                ),
                assessment: CreditAssessment {
                    credit_report_available: row.credit_report_available,
                    credit_score_band: row.credit_score_band,
                    in_canada: row.in_canada.unwrap_or(true),
                    can_pay_extra_deposit: row.can_pay_extra_deposit,
                },
                expected,
            });
        }

        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[FixtureCase] {
        &self.cases
    }

    pub fn run(&self, engine: &QualificationEngine) -> FixtureReport {
        let mut failures = Vec::new();

        for case in &self.cases {
            let actual = match engine.resolve(&case.profile, &case.assessment) {
                Ok(outcome) => Expectation::Outcome(outcome),
                Err(err) => Expectation::Error(err.kind()),
            };
            if actual != case.expected {
                failures.push(FixtureFailure {
                    line: case.line,
                    employment_type_code: case.profile.employment_type_code.clone(),
                    expected: case.expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        FixtureReport {
            cases: self.cases.len(),
            passed: self.cases.len() - failures.len(),
            failures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureFailure {
    pub line: u64,
    pub employment_type_code: String,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureReport {
    pub cases: usize,
    pub passed: usize,
    pub failures: Vec<FixtureFailure>,
}

impl FixtureReport {
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turns a report with failing rows into an error.
    pub fn ensure_passed(&self) -> Result<(), FixtureError> {
        if self.all_passed() {
            return Ok(());
        }
        Err(FixtureError::Failures {
            failed: self.failures.len(),
            cases: self.cases,
        })
    }
}
