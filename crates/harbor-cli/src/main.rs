//! CLI entry point - the composition root.
//!
//! Parses arguments, bootstraps the [`harbor_cli::CliContext`] and hands the
//! invocation to the command registry. Errors are classified into sysexits
//! codes here and nowhere else.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use harbor_cli::{
    Cli, CliConfig, CliError, CommandRegistry, Commands, GlobalFlags, bootstrap, init_logging,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.flags.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help
        if let Err(e) = Cli::command().print_help() {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    let trace = cli.flags.trace;
    match run(&cli.flags, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let classified = CliError::classify(&err);
            if trace {
                eprintln!("error: {err:?}");
            } else {
                eprintln!("error: {classified}");
            }
            ExitCode::from(u8::try_from(classified.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(flags: &GlobalFlags, command: Commands) -> anyhow::Result<()> {
    let config = CliConfig::from_flags(flags)?;
    let ctx = bootstrap(config)?;

    CommandRegistry::standard()
        .dispatch(&ctx, &command.into())
        .await
}
