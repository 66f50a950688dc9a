pub mod apply;
pub mod query;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "nodepatch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply a patch file to a YAML or JSON document
    Apply(ApplyArgs),

    /// Print the node at a path within a YAML or JSON document
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// YAML file with a top-level `patches` list
    #[arg(short, long)]
    pub patches: PathBuf,

    /// Document `copyFromObject` patches read from
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Namespace appended to names by the rewrite verbs
    #[arg(short, long, env = "NODEPATCH_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Extra suffix appended after the namespace by the rewrite verbs
    #[arg(long, env = "NODEPATCH_SUFFIX")]
    pub suffix: Option<String>,

    /// Namespace written over a rename pattern's NAMESPACE group
    #[arg(long)]
    pub target_namespace: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,

    /// Document to patch; read from stdin when omitted
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Dotted path to resolve, e.g. spec.containers.0.name
    ///
    /// Dots inside a key are escaped with a backslash.
    pub path: String,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,

    /// Document to query; read from stdin when omitted
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}
