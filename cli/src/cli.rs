use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "rdf-streams")]
/// RDF Streams command line tool to inspect and run streaming SPARQL topologies
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the topology that evaluates a query
    Plan {
        #[command(flatten)]
        query: QueryArgs,
        /// Name of the topic the statements are read from
        #[arg(long, default_value = "statements")]
        statement_topic: String,
        /// Name of the topic the results are written to
        #[arg(long, default_value = "results")]
        result_topic: String,
        /// Number the stages of the topology instead of using random ids
        #[arg(long)]
        sequential_ids: bool,
        /// Also print the algebra tree the topology has been compiled from
        #[arg(long)]
        algebra: bool,
    },
    /// Evaluate a query over the triples of a file
    Run {
        #[command(flatten)]
        query: QueryArgs,
        /// File to read the statements from
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        data_file: PathBuf,
        /// The format of the data file
        ///
        /// It can be an extension like "nt" or a MIME type like "application/n-triples".
        ///
        /// By default the format is guessed from the data file extension.
        #[arg(long)]
        data_format: Option<String>,
        /// The visibility expression attached to every statement of the data file
        #[arg(long, default_value = "")]
        visibility: String,
        /// The format of the results
        ///
        /// It can be an extension like "json" or a MIME type like "application/sparql-results+json".
        #[arg(long, default_value = "json")]
        results_format: String,
    },
}

#[derive(clap::Args)]
pub struct QueryArgs {
    /// The SPARQL query
    #[arg(short, long, required_unless_present = "query_file")]
    pub query: Option<String>,
    /// File to read the SPARQL query from
    #[arg(long, conflicts_with = "query", value_hint = ValueHint::FilePath)]
    pub query_file: Option<PathBuf>,
}
