//! buildspec cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Relative header search paths are resolved against
    /// the final work directory.
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load specifications and list them
    Specs(SpecsCommand),

    /// Generate the header maps of a target
    Headermap(HeadermapCommand),
}

#[derive(Parser, Debug)]
pub struct SpecArgs {
    /// Specification documents or directories of them
    ///
    /// Loaded in the order given; bases have to be loaded before the specifications based
    /// on them.
    #[clap(short = 's', long = "specs", required(true))]
    pub paths: Vec<PathBuf>,

    /// Domain of specifications that do not declare one
    #[clap(long = "domain")]
    pub domain: Option<String>,

    /// Report unknown keys in specifications
    #[clap(long = "check")]
    pub check: bool,
}

#[derive(Parser, Debug)]
pub struct SpecsCommand {
    #[clap(flatten)]
    pub specs: SpecArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct HeadermapCommand {
    #[clap(flatten)]
    pub specs: SpecArgs,

    /// Project document
    #[clap(short = 'p', long = "project")]
    pub project: PathBuf,

    /// Name of the target to build
    #[clap(short = 't', long = "target")]
    pub target: String,

    /// Build settings document (a flat object)
    #[clap(long = "settings")]
    pub settings: PathBuf,

    /// Domains to look up the headermap tool and file types in, before the wildcard domain
    #[clap(long = "lookup-domain")]
    pub lookup_domains: Vec<String>,

    #[clap(long = "user-header-search-path")]
    pub user_header_search_paths: Vec<String>,

    #[clap(long = "header-search-path")]
    pub header_search_paths: Vec<String>,

    /// Only print the header map lists, do not write the files
    #[clap(long = "dry-run")]
    pub dry_run: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
