use std::io::Write;
use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Category, FlagCode, RentLiability};
use super::error::QualificationError;

pub const EMPLOYMENT_CODE_PREFIX: &str = "ET_NLS";
pub const EMPLOYMENT_TYPE_COUNT: u8 = 108;
pub const RESPONSIBLE_BLOCK_SIZE: u16 = 8;
pub const NOT_RESPONSIBLE_BLOCK_SIZE: u16 = 3;

const CODES_PER_CATEGORY: u8 = 36;
const CODES_PER_GROUP: u8 = 9;
const FIRST_FLAG: u16 = 1;

const STANDARD_VERSION: &str = "2025.2";
const STANDARD_EFFECTIVE_ON: NaiveDate = match NaiveDate::from_ymd_opt(2025, 9, 1) {
    Some(date) => date,
    None => panic!("invalid rule table effective date"),
};

/// Codes whose liability bucket differs from the one implied by their numeric range.
const LIABILITY_OVERRIDES: &[(u8, RentLiability)] = &[
    (27, RentLiability::NotResponsible),
    (50, RentLiability::Responsible),
];

/// Identifies a published revision of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTableVersion {
    pub label: &'static str,
    pub effective_on: NaiveDate,
}

/// One canonical employment type and the flag blocks it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmploymentTypeEntry {
    pub number: u8,
    pub category: Category,
    pub student: bool,
    pub range_liability: RentLiability,
    pub liability: RentLiability,
    pub responsible_base: Option<u16>,
    pub not_responsible_base: Option<u16>,
}

impl EmploymentTypeEntry {
    fn unallocated(number: u8) -> Self {
        let offset = number - 1;
        let category = Category::ALL[usize::from(offset / CODES_PER_CATEGORY)];
        let group = (offset % CODES_PER_CATEGORY) / CODES_PER_GROUP;
        let range_liability = if group < 2 {
            RentLiability::NotResponsible
        } else {
            RentLiability::Responsible
        };
        let liability = liability_override(number).unwrap_or(range_liability);

        Self {
            number,
            category,
            student: group % 2 == 0,
            range_liability,
            liability,
            responsible_base: None,
            not_responsible_base: None,
        }
    }

    pub fn code(&self) -> String {
        format!("{EMPLOYMENT_CODE_PREFIX}{}", self.number)
    }

    pub fn is_overridden(&self) -> bool {
        self.liability != self.range_liability
    }

    pub fn responsible_flags(&self) -> Option<(FlagCode, FlagCode)> {
        self.responsible_base
            .map(|base| block_bounds(base, RESPONSIBLE_BLOCK_SIZE))
    }

    pub fn not_responsible_flags(&self) -> Option<(FlagCode, FlagCode)> {
        self.not_responsible_base
            .map(|base| block_bounds(base, NOT_RESPONSIBLE_BLOCK_SIZE))
    }

    pub fn view(&self) -> EmploymentTypeView {
        let responsible = self.responsible_flags();
        let not_responsible = self.not_responsible_flags();
        EmploymentTypeView {
            code: self.code(),
            category: self.category,
            student: self.student,
            range_liability: self.range_liability,
            liability: self.liability,
            overridden: self.is_overridden(),
            responsible_first: responsible.map(|(first, _)| first),
            responsible_last: responsible.map(|(_, last)| last),
            not_responsible_first: not_responsible.map(|(first, _)| first),
            not_responsible_last: not_responsible.map(|(_, last)| last),
        }
    }
}

fn block_bounds(base: u16, size: u16) -> (FlagCode, FlagCode) {
    (FlagCode::new(base), FlagCode::new(base + size - 1))
}

fn liability_override(number: u8) -> Option<RentLiability> {
    LIABILITY_OVERRIDES
        .iter()
        .find(|(code, _)| *code == number)
        .map(|(_, liability)| *liability)
}

/// Flat projection of an entry used for API responses and CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmploymentTypeView {
    pub code: String,
    pub category: Category,
    pub student: bool,
    pub range_liability: RentLiability,
    pub liability: RentLiability,
    pub overridden: bool,
    pub responsible_first: Option<FlagCode>,
    pub responsible_last: Option<FlagCode>,
    pub not_responsible_first: Option<FlagCode>,
    pub not_responsible_last: Option<FlagCode>,
}

/// Immutable mapping from employment types to their flag blocks.
#[derive(Debug, Clone)]
pub struct RuleTable {
    version: RuleTableVersion,
    entries: Vec<EmploymentTypeEntry>,
}

impl RuleTable {
    /// The published table, built on first use and shared for the life of the process.
    pub fn standard() -> &'static RuleTable {
        static STANDARD: OnceLock<RuleTable> = OnceLock::new();
        STANDARD.get_or_init(|| RuleTable {
            version: RuleTableVersion {
                label: STANDARD_VERSION,
                effective_on: STANDARD_EFFECTIVE_ON,
            },
            entries: standard_entries(),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_entries(
        version: RuleTableVersion,
        mut entries: Vec<EmploymentTypeEntry>,
    ) -> Self {
        entries.sort_by_key(|entry| entry.number);
        Self { version, entries }
    }

    pub fn version(&self) -> &RuleTableVersion {
        &self.version
    }

    pub fn entries(&self) -> &[EmploymentTypeEntry] {
        &self.entries
    }

    pub fn entries_in(&self, category: Category) -> impl Iterator<Item = &EmploymentTypeEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.category == category)
    }

    pub fn entry(&self, code: &str) -> Result<&EmploymentTypeEntry, QualificationError> {
        parse_employment_code(code)
            .and_then(|number| {
                self.entries
                    .binary_search_by_key(&number, |entry| entry.number)
                    .ok()
            })
            .map(|index| &self.entries[index])
            .ok_or_else(|| QualificationError::InvalidEmploymentCode {
                code: code.to_string(),
            })
    }

    /// Number of distinct flags owned by entries of this table.
    pub fn flag_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| {
                let responsible = entry.responsible_base.map_or(0, |_| RESPONSIBLE_BLOCK_SIZE);
                let not_responsible = entry
                    .not_responsible_base
                    .map_or(0, |_| NOT_RESPONSIBLE_BLOCK_SIZE);
                usize::from(responsible + not_responsible)
            })
            .sum()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            csv_writer.serialize(entry.view())?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn parse_employment_code(raw: &str) -> Option<u8> {
    let trimmed = raw.trim();
    let number = trimmed
        .strip_prefix(EMPLOYMENT_CODE_PREFIX)?
        .parse::<u8>()
        .ok()?;

    // Only the canonical spelling is accepted; ET_NLS092 is not ET_NLS92.
    (format!("{EMPLOYMENT_CODE_PREFIX}{number}") == trimmed).then_some(number)
}

#[derive(Debug, Clone, Copy)]
enum FlagBlock {
    Responsible,
    NotResponsible,
}

impl FlagBlock {
    const fn size(self) -> u16 {
        match self {
            FlagBlock::Responsible => RESPONSIBLE_BLOCK_SIZE,
            FlagBlock::NotResponsible => NOT_RESPONSIBLE_BLOCK_SIZE,
        }
    }
}

fn standard_entries() -> Vec<EmploymentTypeEntry> {
    let mut entries: Vec<EmploymentTypeEntry> = (1..=EMPLOYMENT_TYPE_COUNT)
        .map(EmploymentTypeEntry::unallocated)
        .collect();

    // Native blocks first, then the cross-branch blocks, each pass in code order.
    let mut next = FIRST_FLAG;
    next = allocate(&mut entries, next, RentLiability::NotResponsible, FlagBlock::NotResponsible);
    next = allocate(&mut entries, next, RentLiability::Responsible, FlagBlock::Responsible);
    next = allocate(&mut entries, next, RentLiability::NotResponsible, FlagBlock::Responsible);
    allocate(&mut entries, next, RentLiability::Responsible, FlagBlock::NotResponsible);

    entries
}

fn allocate(
    entries: &mut [EmploymentTypeEntry],
    mut next: u16,
    bucket: RentLiability,
    block: FlagBlock,
) -> u16 {
    for entry in entries.iter_mut().filter(|entry| entry.liability == bucket) {
        match block {
            FlagBlock::Responsible => entry.responsible_base = Some(next),
            FlagBlock::NotResponsible => entry.not_responsible_base = Some(next),
        }
        next += block.size();
    }
    next
}
