use clap::{Args, Parser, Subcommand};

use crate::convert::{DEFAULT_CATEGORY, TopicIdentity};

#[derive(Debug, Parser)]
#[command(author, version, about = "Convert a topic taxonomy CSV into a needs-map template")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Convert(ConvertArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input CSV with `phase`, `section`, `topic` (and optional `prompt`, `tags`) columns.
    #[arg(long)]
    pub input: String,

    /// Output file path for the template JSON.
    #[arg(long)]
    pub output: String,

    /// Template name.
    #[arg(long)]
    pub name: String,

    /// Template description.
    #[arg(long)]
    pub description: String,

    /// Template category.
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// How rows that repeat a topic title are matched to an existing topic.
    #[arg(long, value_enum, default_value_t = TopicIdentity::ByTitle)]
    pub topic_identity: TopicIdentity,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Input CSV to check.
    #[arg(long)]
    pub input: String,

    /// Print the validation result as JSON.
    #[arg(long)]
    pub json: bool,
}
