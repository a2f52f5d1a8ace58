use crate::demo::{run_demo, run_ranking, run_score, DemoArgs, RankingArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ideciclo::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "IDECICLO",
    about = "Score cycling infrastructure surveys and serve the IDECICLO ranking",
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
    /// Score a city from segment and form CSV exports
    Score(ScoreArgs),
    /// Rank every city found in the CSV exports
    Ranking(RankingArgs),
    /// Score a built-in sample city and print the full breakdown
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args),
        Command::Ranking(args) => run_ranking(args),
        Command::Demo(args) => run_demo(args),
    }
}
