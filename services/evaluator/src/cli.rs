use crate::evaluate::{run_evaluate, EvaluateArgs};
use crate::table::{run_table, TableArgs};
use clap::{Parser, Subcommand};
use nvi_points::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "NVI Evaluator",
    about = "Classify publications as NVI candidates and calculate their points",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate publication documents against an organization registry snapshot
    Evaluate(EvaluateArgs),
    /// Print the base points table
    Table(TableArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Table(args) => run_table(args),
    }
}
