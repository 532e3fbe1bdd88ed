use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    topic_template::logging::init().context("init logging")?;

    let cli = topic_template::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        topic_template::cli::Command::Convert(args) => {
            topic_template::commands::convert(args).context("convert")?;
        }
        topic_template::cli::Command::Validate(args) => {
            topic_template::commands::validate(args).context("validate")?;
        }
    }

    Ok(())
}
