use crate::interview::{
    run_interview, run_quotient, run_recent, run_score, InterviewArgs, QuotientArgs, RecentArgs,
    ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use reciprocity::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Romanishan Reciprocity Service",
    about = "Run the Romanishan Reciprocity assessment service and tooling from the command line",
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
    /// Walk the guided interview in the terminal, or replay a transcript
    Interview(InterviewArgs),
    /// Score a set of domain aggregates and print the result
    Score(ScoreArgs),
    /// Compute a Reciprocity Quotient reading from the four slider values
    Quotient(QuotientArgs),
    /// List the most recent submissions in the configured database
    Recent(RecentArgs),
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
        Command::Interview(args) => run_interview(args),
        Command::Score(args) => run_score(args),
        Command::Quotient(args) => run_quotient(args),
        Command::Recent(args) => run_recent(args),
    }
}
