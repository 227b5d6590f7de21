use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "rdfmagic")]
/// Interactive SPARQL shell over local and remote RDF documents
pub struct Args {
    /// Most verbose level of the log messages written to stderr
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,
    /// Timeout for fetching a remote document, in seconds
    ///
    /// Defaults to 60 seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the interactive shell, reading commands from stdin
    Shell,
    /// Run a single SPARQL query and print its results
    Query {
        /// Document to load before querying, a file path or a URL
        ///
        /// Can be repeated. `FROM <uri>` clauses in the query are loaded as well.
        #[arg(short, long = "source", value_hint = ValueHint::AnyPath)]
        sources: Vec<String>,
        /// The SPARQL query
        #[arg(short, long, required_unless_present = "query_file", conflicts_with = "query_file")]
        query: Option<String>,
        /// File holding the SPARQL query
        #[arg(long, value_hint = ValueHint::FilePath)]
        query_file: Option<PathBuf>,
        /// How to print the result table
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Print the number of rows found before the table
        #[arg(short, long)]
        count: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab separated lines
    Text,
    /// An HTML table
    Html,
}
