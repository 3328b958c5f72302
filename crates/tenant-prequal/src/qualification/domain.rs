use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Applicant answers that select a row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub employment_type_code: String,
    pub rent_responsible: bool,
    pub is_student: bool,
}

impl ApplicantProfile {
    pub fn new(employment_type_code: impl Into<String>, rent_responsible: bool, is_student: bool) -> Self {
        Self {
            employment_type_code: employment_type_code.into(),
            rent_responsible,
            is_student,
        }
    }
}

/// Credit answers collected by the wizard.
///
/// `credit_score_band` is `None` when no report exists; `can_pay_extra_deposit`
/// is `None` when the question was not asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub credit_report_available: bool,
    #[serde(default)]
    pub credit_score_band: Option<ScoreBand>,
    #[serde(default = "default_in_canada")]
    pub in_canada: bool,
    #[serde(default)]
    pub can_pay_extra_deposit: Option<bool>,
}

fn default_in_canada() -> bool {
    true
}

impl CreditAssessment {
    pub fn reported(band: ScoreBand, can_pay_extra_deposit: Option<bool>) -> Self {
        Self {
            credit_report_available: true,
            credit_score_band: Some(band),
            in_canada: true,
            can_pay_extra_deposit,
        }
    }

    pub fn without_report(can_pay_extra_deposit: Option<bool>) -> Self {
        Self {
            credit_report_available: false,
            credit_score_band: None,
            in_canada: true,
            can_pay_extra_deposit,
        }
    }

    pub fn outside_canada(can_pay_extra_deposit: Option<bool>) -> Self {
        Self {
            credit_report_available: false,
            credit_score_band: None,
            in_canada: false,
            can_pay_extra_deposit,
        }
    }
}

/// Self-reported credit score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreBand {
    #[serde(rename = "760-900")]
    Excellent,
    #[serde(rename = "725-760")]
    VeryGood,
    #[serde(rename = "660-725")]
    Good,
    #[serde(rename = "550-660")]
    Fair,
    #[serde(rename = "300-560")]
    Poor,
    #[serde(rename = "dont-know")]
    Unknown,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 6] = [
        ScoreBand::Excellent,
        ScoreBand::VeryGood,
        ScoreBand::Good,
        ScoreBand::Fair,
        ScoreBand::Poor,
        ScoreBand::Unknown,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "760-900",
            ScoreBand::VeryGood => "725-760",
            ScoreBand::Good => "660-725",
            ScoreBand::Fair => "550-660",
            ScoreBand::Poor => "300-560",
            ScoreBand::Unknown => "dont-know",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoreBand {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        ScoreBand::ALL
            .into_iter()
            .find(|band| band.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                format!("unknown score band '{raw}' (expected one of 760-900, 725-760, 660-725, 550-660, 300-560, dont-know)")
            })
    }
}

/// Classified credit situation the resolver branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "band", rename_all = "snake_case")]
pub enum CreditStanding {
    Reported(ScoreBand),
    NoReport,
    NotInCanada,
}

impl CreditStanding {
    pub const ALL: [CreditStanding; 8] = [
        CreditStanding::Reported(ScoreBand::Excellent),
        CreditStanding::Reported(ScoreBand::VeryGood),
        CreditStanding::Reported(ScoreBand::Good),
        CreditStanding::Reported(ScoreBand::Fair),
        CreditStanding::Reported(ScoreBand::Poor),
        CreditStanding::Reported(ScoreBand::Unknown),
        CreditStanding::NoReport,
        CreditStanding::NotInCanada,
    ];

    /// Assessment that classifies back to this standing.
    pub fn assessment(self, can_pay_extra_deposit: Option<bool>) -> CreditAssessment {
        match self {
            CreditStanding::Reported(band) => CreditAssessment::reported(band, can_pay_extra_deposit),
            CreditStanding::NoReport => CreditAssessment::without_report(can_pay_extra_deposit),
            CreditStanding::NotInCanada => CreditAssessment::outside_canada(can_pay_extra_deposit),
        }
    }
}

impl fmt::Display for CreditStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreditStanding::Reported(band) => write!(f, "band {band}"),
            CreditStanding::NoReport => f.write_str("no credit report"),
            CreditStanding::NotInCanada => f.write_str("not in Canada"),
        }
    }
}

/// Employment category prefix shared by every code in a block of 36.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "NLS1")]
    Nls1,
    #[serde(rename = "NLS2")]
    Nls2,
    #[serde(rename = "NLS3")]
    Nls3,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Nls1, Category::Nls2, Category::Nls3];

    pub const fn label(self) -> &'static str {
        match self {
            Category::Nls1 => "NLS1",
            Category::Nls2 => "NLS2",
            Category::Nls3 => "NLS3",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rent liability bucket of an employment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentLiability {
    Responsible,
    NotResponsible,
}

impl RentLiability {
    pub const fn label(self) -> &'static str {
        match self {
            RentLiability::Responsible => "responsible",
            RentLiability::NotResponsible => "not_responsible",
        }
    }

    pub const fn is_responsible(self) -> bool {
        matches!(self, RentLiability::Responsible)
    }
}

/// Routing flag consumed downstream, rendered as `V_NLS<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlagCode(u16);

impl FlagCode {
    pub const PREFIX: &'static str = "V_NLS";

    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u16 {
        self.0
    }
}

impl fmt::Display for FlagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for FlagCode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let number = trimmed
            .strip_prefix(Self::PREFIX)
            .and_then(|digits| digits.parse::<u16>().ok())
            .filter(|number| *number > 0)
            .ok_or_else(|| format!("'{raw}' is not a flag code"))?;

        // Reject padded spellings such as V_NLS0461.
        if format!("{}{}", Self::PREFIX, number) != trimmed {
            return Err(format!("'{raw}' is not a canonical flag code"));
        }
        Ok(Self(number))
    }
}

impl TryFrom<String> for FlagCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FlagCode> for String {
    fn from(value: FlagCode) -> Self {
        value.to_string()
    }
}

/// Terminal result of a qualification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    AutoQualify,
    Flag { flag: FlagCode },
}

impl Outcome {
    pub fn flag(&self) -> Option<FlagCode> {
        match self {
            Outcome::AutoQualify => None,
            Outcome::Flag { flag } => Some(*flag),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Outcome::AutoQualify => "auto-qualified".to_string(),
            Outcome::Flag { flag } => format!("flagged {flag}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bands_use_wizard_spellings() {
        let json = serde_json::to_string(&ScoreBand::Unknown).expect("serializes");
        assert_eq!(json, "\"dont-know\"");
        let band: ScoreBand = serde_json::from_str("\"300-560\"").expect("deserializes");
        assert_eq!(band, ScoreBand::Poor);
        assert_eq!("760-900".parse::<ScoreBand>(), Ok(ScoreBand::Excellent));
        assert!("700-800".parse::<ScoreBand>().is_err());
    }

    #[test]
    fn flag_codes_round_trip_through_text() {
        let flag: FlagCode = "V_NLS461".parse().expect("valid flag");
        assert_eq!(flag.number(), 461);
        assert_eq!(flag.to_string(), "V_NLS461");
        assert!("V_NLS0461".parse::<FlagCode>().is_err());
        assert!("V_NLS0".parse::<FlagCode>().is_err());
        assert!("ET_NLS4".parse::<FlagCode>().is_err());
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let flagged = Outcome::Flag {
            flag: FlagCode::new(569),
        };
        let value = serde_json::to_value(flagged).expect("serializes");
        assert_eq!(value["outcome"], "flag");
        assert_eq!(value["flag"], "V_NLS569");

        let auto = serde_json::to_value(Outcome::AutoQualify).expect("serializes");
        assert_eq!(auto["outcome"], "auto_qualify");
    }

    #[test]
    fn assessment_defaults_to_in_canada() {
        let assessment: CreditAssessment = serde_json::from_str(
            r#"{"credit_report_available": true, "credit_score_band": "660-725"}"#,
        )
        .expect("deserializes");
        assert!(assessment.in_canada);
        assert_eq!(assessment.can_pay_extra_deposit, None);
    }
}
