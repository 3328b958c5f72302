use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use super::domain::{ApplicantProfile, Category, CreditStanding, FlagCode, Outcome};
use super::error::QualificationError;
use super::resolver::QualificationEngine;
use super::table::{RuleTable, RuleTableVersion};

const DEPOSIT_STATES: [bool; 2] = [true, false];
const RENT_STATES: [bool; 2] = [true, false];

/// Outcome tallies for one employment category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCoverage {
    pub employment_types: usize,
    pub combinations: usize,
    pub auto_qualify: usize,
    pub flagged: usize,
    pub distinct_flags: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_flag: Option<FlagCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_flag: Option<FlagCode>,
}

/// A combination the table could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageGap {
    pub employment_type_code: String,
    pub rent_responsible: bool,
    pub standing: CreditStanding,
    pub can_pay_extra_deposit: bool,
    pub error: String,
}

/// Exhaustive walk of every employment type, credit standing, deposit and rent answer.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub version: RuleTableVersion,
    pub combinations: usize,
    pub auto_qualify: usize,
    pub flagged: usize,
    pub distinct_flags: usize,
    pub categories: BTreeMap<Category, CategoryCoverage>,
    pub gaps: Vec<CoverageGap>,
    #[serde(skip)]
    first_gap: Option<QualificationError>,
}

impl CoverageReport {
    pub fn for_table(table: &'static RuleTable) -> Self {
        let engine = QualificationEngine::new(table);
        let mut categories: BTreeMap<Category, CategoryCoverage> = BTreeMap::new();
        let mut category_flags: BTreeMap<Category, BTreeSet<FlagCode>> = BTreeMap::new();
        let mut gaps = Vec::new();
        let mut first_gap = None;

        for entry in table.entries() {
            let tally = categories.entry(entry.category).or_default();
            let flags = category_flags.entry(entry.category).or_default();
            tally.employment_types += 1;

            for rent_responsible in RENT_STATES {
                let profile = ApplicantProfile::new(entry.code(), rent_responsible, entry.student);
                for standing in CreditStanding::ALL {
                    for can_pay in DEPOSIT_STATES {
                        tally.combinations += 1;
                        match engine.resolve(&profile, &standing.assessment(Some(can_pay))) {
                            Ok(Outcome::AutoQualify) => tally.auto_qualify += 1,
                            Ok(Outcome::Flag { flag }) => {
                                tally.flagged += 1;
                                flags.insert(flag);
                            }
                            Err(err) => {
                                gaps.push(CoverageGap {
                                    employment_type_code: entry.code(),
                                    rent_responsible,
                                    standing,
                                    can_pay_extra_deposit: can_pay,
                                    error: err.to_string(),
                                });
                                first_gap.get_or_insert(err);
                            }
                        }
                    }
                }
            }
        }

        let mut all_flags = BTreeSet::new();
        for (category, flags) in category_flags {
            if let Some(tally) = categories.get_mut(&category) {
                tally.distinct_flags = flags.len();
                tally.lowest_flag = flags.first().copied();
                tally.highest_flag = flags.last().copied();
            }
            all_flags.extend(flags);
        }

        CoverageReport {
            version: table.version().clone(),
            combinations: categories.values().map(|tally| tally.combinations).sum(),
            auto_qualify: categories.values().map(|tally| tally.auto_qualify).sum(),
            flagged: categories.values().map(|tally| tally.flagged).sum(),
            distinct_flags: all_flags.len(),
            categories,
            gaps,
            first_gap,
        }
    }

    pub fn is_total(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// Walks the whole table and fails on the first combination without a rule.
pub fn verify_totality(table: &'static RuleTable) -> Result<CoverageReport, QualificationError> {
    let mut report = CoverageReport::for_table(table);
    if let Some(err) = report.first_gap.take() {
        return Err(err);
    }

    info!(
        version = report.version.label,
        combinations = report.combinations,
        distinct_flags = report.distinct_flags,
        "rule table verified total"
    );
    Ok(report)
}
