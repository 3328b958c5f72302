use clap::Args;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tenant_prequal::error::AppError;
use tenant_prequal::qualification::{
    verify_totality, ApplicantProfile, CoverageReport, CreditAssessment, FixtureSuite,
    QualificationEngine, RuleTable, ScoreBand,
};

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// Employment type code, e.g. ET_NLS92
    #[arg(long)]
    pub(crate) code: String,
    /// The applicant is responsible for paying rent
    #[arg(long)]
    pub(crate) rent_responsible: bool,
    /// The applicant is a student
    #[arg(long)]
    pub(crate) student: bool,
    /// Self-reported score band (760-900, 725-760, 660-725, 550-660, 300-560, dont-know)
    #[arg(long)]
    pub(crate) band: Option<ScoreBand>,
    /// Whether the applicant can pay an extra deposit
    #[arg(long)]
    pub(crate) pays_deposit: Option<bool>,
    /// The applicant has no credit report
    #[arg(long)]
    pub(crate) no_report: bool,
    /// The applicant does not live in Canada
    #[arg(long)]
    pub(crate) outside_canada: bool,
    /// Print the full resolution as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CoverageArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RulesExportArgs {
    /// Write the CSV to a file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct FixturesRunArgs {
    /// Fixture CSV file
    pub(crate) path: PathBuf,
}

impl ResolveArgs {
    pub(crate) fn profile(&self) -> ApplicantProfile {
        ApplicantProfile::new(self.code.clone(), self.rent_responsible, self.student)
    }

    pub(crate) fn assessment(&self) -> CreditAssessment {
        CreditAssessment {
            credit_report_available: !self.no_report,
            credit_score_band: self.band,
            in_canada: !self.outside_canada,
            can_pay_extra_deposit: self.pays_deposit,
        }
    }
}

pub(crate) fn run_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let engine = QualificationEngine::standard();
    let resolution = engine.resolve_detailed(&args.profile(), &args.assessment())?;

    if args.json {
        let body = serde_json::to_string_pretty(&resolution).map_err(io::Error::from)?;
        println!("{body}");
        return Ok(());
    }

    println!(
        "{} ({}) | {:?} | {}",
        resolution.employment_type_code, resolution.category, resolution.branch, resolution.standing
    );
    println!("Outcome: {}", resolution.outcome.summary());
    Ok(())
}

pub(crate) fn run_coverage(args: CoverageArgs) -> Result<(), AppError> {
    let report = verify_totality(RuleTable::standard())?;

    if args.json {
        let body = serde_json::to_string_pretty(&report).map_err(io::Error::from)?;
        println!("{body}");
        return Ok(());
    }

    render_coverage(&report);
    Ok(())
}

fn render_coverage(report: &CoverageReport) {
    println!(
        "Rule table {} (effective {})",
        report.version.label, report.version.effective_on
    );
    println!(
        "- {} combinations | {} auto-qualify | {} flagged | {} distinct flags",
        report.combinations, report.auto_qualify, report.flagged, report.distinct_flags
    );
    for (category, tally) in &report.categories {
        let range = match (tally.lowest_flag, tally.highest_flag) {
            (Some(low), Some(high)) => format!("{low}..{high}"),
            _ => "no flags".to_string(),
        };
        println!(
            "  - {category}: {} employment types | {} combinations | {} auto | {} flagged | {} distinct ({range})",
            tally.employment_types,
            tally.combinations,
            tally.auto_qualify,
            tally.flagged,
            tally.distinct_flags
        );
    }
}

pub(crate) fn run_rules_export(args: RulesExportArgs) -> Result<(), AppError> {
    let table = RuleTable::standard();
    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            table.write_csv(file)?;
            println!(
                "Exported {} employment types to {}",
                table.entries().len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            table.write_csv(stdout.lock())?;
        }
    }
    Ok(())
}

pub(crate) fn run_fixtures(args: FixturesRunArgs) -> Result<(), AppError> {
    let suite = FixtureSuite::from_path(&args.path)?;
    let report = suite.run(&QualificationEngine::standard());

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "{}: {}/{} fixtures passed",
        args.path.display(),
        report.passed,
        report.cases
    )?;
    for failure in &report.failures {
        writeln!(
            stdout,
            "  - line {} {}: expected {}, got {}",
            failure.line, failure.employment_type_code, failure.expected, failure.actual
        )?;
    }
    stdout.flush()?;

    report.ensure_passed()?;
    Ok(())
}
