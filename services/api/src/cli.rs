use crate::demo::{run_demo, run_preferences_export, DemoArgs, ExportArgs};
use crate::server;
use campus_housing::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campus Housing",
    about = "Run and demonstrate the student housing search service",
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
    /// Walk the search wizard, rank listings, and print the results
    Demo(DemoArgs),
    /// Inspect stored preferences
    Preferences {
        #[command(subcommand)]
        command: PreferencesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PreferencesCommand {
    /// Print stored preferences as export JSON
    Export(ExportArgs),
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
        Command::Demo(args) => run_demo(args).await,
        Command::Preferences {
            command: PreferencesCommand::Export(args),
        } => run_preferences_export(args),
    }
}
