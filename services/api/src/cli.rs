use crate::commands::{
    run_coverage, run_fixtures, run_resolve, run_rules_export, CoverageArgs, FixturesRunArgs,
    ResolveArgs, RulesExportArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tenant_prequal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tenant Pre-Qualification",
    about = "Resolve pre-qualification flags and serve the resolver over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Resolve a single applicant against the standard rule table
    Resolve(ResolveArgs),
    /// Walk every combination and summarise the outcomes per category
    Coverage(CoverageArgs),
    /// Inspect the rule table
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// Run CSV fixture suites against the resolver
    Fixtures {
        #[command(subcommand)]
        command: FixturesCommand,
    },
    /// Walk a pre-qualification wizard session end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Write the employment type table with its flag blocks as CSV
    Export(RulesExportArgs),
}

#[derive(Subcommand, Debug)]
enum FixturesCommand {
    /// Evaluate every row of a fixture file; exits non-zero on any failure
    Run(FixturesRunArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Resolve(args) => run_resolve(args),
        Command::Coverage(args) => run_coverage(args),
        Command::Rules {
            command: RulesCommand::Export(args),
        } => run_rules_export(args),
        Command::Fixtures {
            command: FixturesCommand::Run(args),
        } => run_fixtures(args),
        Command::Demo(args) => run_demo(args),
    }
}
