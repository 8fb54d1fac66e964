use crate::demo::{run_demo, run_dispatch, run_validate, DemoArgs, DispatchArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use finpro_contact::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "FinancePro Contact Service",
    about = "Run the FinancePro contact intake service from the command line",
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
    /// Validate a JSON form file against the full step rules
    Validate(ValidateArgs),
    /// Re-send a stored submission to the configured channels
    Dispatch(DispatchArgs),
    /// Run an end-to-end CLI demo: validate, store, and deliver a sample submission
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
        Command::Validate(args) => run_validate(args),
        Command::Dispatch(args) => run_dispatch(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
