use chrono::{Local, NaiveDate};
use clap::Args;
use tenant_prequal::error::AppError;
use tenant_prequal::qualification::{
    PrequalificationSession, QualificationEngine, ScoreBand, WizardAnswer, WizardStep,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Employment type code the demo applicant selects
    #[arg(long, default_value = "ET_NLS92")]
    pub(crate) code: String,
    /// Answer the rent question explicitly instead of taking the suggestion
    #[arg(long)]
    pub(crate) rent_responsible: Option<bool>,
    /// Simulate an applicant living outside Canada
    #[arg(long)]
    pub(crate) outside_canada: bool,
    /// Simulate an applicant without a credit report
    #[arg(long)]
    pub(crate) no_report: bool,
    /// Score band the applicant reports
    #[arg(long, default_value = "760-900")]
    pub(crate) band: ScoreBand,
    /// Whether the applicant can pay an extra deposit
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) pays_deposit: bool,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            code: "ET_NLS92".to_string(),
            rent_responsible: None,
            outside_canada: false,
            no_report: false,
            band: ScoreBand::Excellent,
            pays_deposit: true,
            as_of: None,
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = QualificationEngine::standard();
    let version = engine.table().version();
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    println!("Pre-qualification wizard demo");
    println!(
        "Rule table {} (effective {}, {})",
        version.label,
        version.effective_on,
        table_status(version.effective_on, as_of)
    );

    let transcript = walk_session(&engine, &args)?;
    for (index, line) in transcript.iter().enumerate() {
        println!("  {}. {}", index + 1, line);
    }
    Ok(())
}

fn table_status(effective_on: NaiveDate, as_of: NaiveDate) -> String {
    let days = (as_of - effective_on).num_days();
    if days >= 0 {
        format!("in force for {days} days as of {as_of}")
    } else {
        format!("takes effect in {} days as of {as_of}", -days)
    }
}

/// Answers every question the session asks and records the exchange.
fn walk_session(engine: &QualificationEngine, args: &DemoArgs) -> Result<Vec<String>, AppError> {
    let mut session = PrequalificationSession::new();
    let mut transcript = Vec::new();

    loop {
        let progress = session.next_step(engine)?;
        let answer = match progress.step {
            WizardStep::EmploymentType => WizardAnswer::EmploymentType(args.code.clone()),
            WizardStep::RentResponsibility => {
                let suggested = progress.suggested_rent_responsible.unwrap_or(true);
                let value = args.rent_responsible.unwrap_or(suggested);
                transcript.push(format!("rent responsibility suggested: {suggested}"));
                WizardAnswer::RentResponsibility(value)
            }
            WizardStep::Residency => WizardAnswer::Residency(!args.outside_canada),
            WizardStep::CreditReport => WizardAnswer::CreditReport(!args.no_report),
            WizardStep::ScoreBand => WizardAnswer::ScoreBand(args.band),
            WizardStep::ExtraDeposit => WizardAnswer::ExtraDeposit(args.pays_deposit),
            WizardStep::Complete => {
                let summary = progress
                    .outcome
                    .map(|outcome| outcome.summary())
                    .unwrap_or_else(|| "no outcome".to_string());
                transcript.push(format!("complete: {summary}"));
                return Ok(transcript);
            }
        };
        transcript.push(describe(&answer));
        session.apply(engine, answer)?;
    }
}

fn describe(answer: &WizardAnswer) -> String {
    match answer {
        WizardAnswer::EmploymentType(code) => format!("employment type: {code}"),
        WizardAnswer::RentResponsibility(value) => format!("responsible for rent: {value}"),
        WizardAnswer::Residency(value) => format!("lives in Canada: {value}"),
        WizardAnswer::CreditReport(value) => format!("has a credit report: {value}"),
        WizardAnswer::ScoreBand(band) => format!("score band: {band}"),
        WizardAnswer::ExtraDeposit(value) => format!("can pay extra deposit: {value}"),
    }
}
