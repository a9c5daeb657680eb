#![allow(clippy::print_stderr, clippy::print_stdout)]
use crate::cli::{Args, Command, QueryArgs};
use anyhow::{bail, Context};
use clap::Parser;
use oxrdfio::{RdfFormat, RdfParser};
use rdf_streams::engine::LocalDriver;
use rdf_streams::model::{Triple, Variable, VisibilityBindingSet, VisibilityStatement};
use rdf_streams::{IdGeneration, TopologyFactory, TopologyFactoryConfig};
use sparesults::{QueryResultsFormat, QueryResultsSerializer};
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::{stdout, Write};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Args::parse();
    match matches.command {
        Command::Plan {
            query,
            statement_topic,
            result_topic,
            sequential_ids,
            algebra,
        } => {
            let id_generation = if sequential_ids {
                IdGeneration::Sequential
            } else {
                IdGeneration::Random
            };
            let factory = TopologyFactory::new(
                TopologyFactoryConfig::new().with_id_generation(id_generation),
            );
            let plan = factory
                .compile(&read_query(&query)?)
                .context("The query cannot be compiled into a topology")?;
            let topology = plan.assemble(&statement_topic, &result_topic)?;

            let mut out = stdout().lock();
            if algebra {
                writeln!(out, "Algebra:")?;
                for line in plan.tree().to_string().lines() {
                    writeln!(out, "  {line}")?;
                }
            }
            write!(out, "{topology}")?;
            out.flush()?;
            Ok(())
        }
        Command::Run {
            query,
            data_file,
            data_format,
            visibility,
            results_format,
        } => {
            let data_format = if let Some(format) = data_format {
                rdf_format_from_name(&format)?
            } else {
                rdf_format_from_path(&data_file)?
            };
            let results_format = query_results_format_from_name(&results_format)?;

            let plan = TopologyFactory::default()
                .compile(&read_query(&query)?)
                .context("The query cannot be compiled into a topology")?;
            let topology = plan.assemble("statements", "results")?;
            let mut driver = LocalDriver::new(&topology);

            let parser = RdfParser::from_format(data_format).for_reader(
                File::open(&data_file)
                    .with_context(|| format!("Cannot open {}", data_file.display()))?,
            );
            let mut results = Vec::new();
            let mut statements = 0_usize;
            for quad in parser {
                let quad = quad?;
                let triple = Triple::new(quad.subject, quad.predicate, quad.object);
                driver.pipe_statement(VisibilityStatement::new(triple, visibility.as_str()))?;
                results.extend(driver.read_results());
                statements += 1;
            }
            info!(statements, results = results.len(), "cli.run.finished");

            write_results(results_format, plan.variables(), &results)
        }
    }
}

fn read_query(args: &QueryArgs) -> anyhow::Result<String> {
    match (&args.query, &args.query_file) {
        (Some(query), _) => Ok(query.clone()),
        (None, Some(file)) => fs::read_to_string(file)
            .with_context(|| format!("Cannot read the query file {}", file.display())),
        (None, None) => bail!("Either --query or --query-file must be set"),
    }
}

fn write_results(
    format: QueryResultsFormat,
    variables: &[String],
    results: &[VisibilityBindingSet],
) -> anyhow::Result<()> {
    let variables = variables
        .iter()
        .map(|name| Variable::new_unchecked(name.as_str()))
        .collect::<Vec<_>>();
    let mut serializer = QueryResultsSerializer::from_format(format)
        .serialize_solutions_to_writer(stdout().lock(), variables.clone())?;
    for result in results {
        serializer.serialize(variables.iter().filter_map(|variable| {
            result
                .bindings()
                .get(variable.as_str())
                .map(|term| (variable.as_ref(), term.as_ref()))
        }))?;
    }
    serializer
        .finish()
        .context("Could not finalize serializer")?
        .flush()?;
    Ok(())
}

fn format_from_path<T>(
    path: &Path,
    from_extension: impl FnOnce(&str) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        from_extension(ext).map_err(|e| {
            e.context(format!(
                "Not able to guess the file format from file name extension '{ext}'"
            ))
        })
    } else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    }
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    format_from_path(path, |ext| {
        RdfFormat::from_extension(ext)
            .with_context(|| format!("The file extension '{ext}' is unknown"))
    })
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(t) = RdfFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = RdfFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The file format '{name}' is unknown")
}

fn query_results_format_from_name(name: &str) -> anyhow::Result<QueryResultsFormat> {
    if let Some(t) = QueryResultsFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = QueryResultsFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The query results format '{name}' is unknown")
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use predicates::prelude::*;

    const QUERY: &str = "PREFIX ex: <http://example.com/> SELECT ?a ?c WHERE { ?a ex:knows ?b . ?b ex:knows ?c }";

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command.arg("run").arg("--bin").arg("rdf-streams");
        command.arg("--");
        command
    }

    fn data_file() -> Result<NamedTempFile> {
        let file = NamedTempFile::new("data.nt")?;
        file.write_str(
            "<http://example.com/alice> <http://example.com/knows> <http://example.com/bob> .\n\
             <http://example.com/bob> <http://example.com/knows> <http://example.com/carol> .\n",
        )?;
        Ok(file)
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn cli_plan() {
        cli_command()
            .arg("plan")
            .arg("--query")
            .arg(QUERY)
            .arg("--sequential-ids")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Processor: JOIN_1 (Join (natural): join_vars=[b] all_vars=[b, a, c])",
            ))
            .stdout(predicate::str::contains("Source: SOURCE (topic: statements"));
    }

    #[test]
    fn cli_plan_with_algebra() {
        cli_command()
            .arg("plan")
            .arg("--query")
            .arg(QUERY)
            .arg("--algebra")
            .arg("--result-topic")
            .arg("friends-of-friends")
            .assert()
            .success()
            .stdout(predicate::str::contains("Algebra:\n  Projection [?a, ?c]"))
            .stdout(predicate::str::contains("topic: friends-of-friends"));
    }

    #[test]
    fn cli_plan_from_query_file() -> Result<()> {
        let query_file = NamedTempFile::new("query.rq")?;
        query_file.write_str(QUERY)?;
        cli_command()
            .arg("plan")
            .arg("--query-file")
            .arg(query_file.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Sink: SINK (topic: results"));
        Ok(())
    }

    #[test]
    fn cli_plan_unsupported_query() {
        cli_command()
            .arg("plan")
            .arg("--query")
            .arg("SELECT ?s WHERE { ?s ?p ?o FILTER(?o > 1) }")
            .assert()
            .failure()
            .stderr(predicate::str::contains("not supported"));
    }

    #[test]
    fn cli_run_csv() -> Result<()> {
        let data_file = data_file()?;
        cli_command()
            .arg("run")
            .arg("--query")
            .arg(QUERY)
            .arg("--data-file")
            .arg(data_file.path())
            .arg("--results-format")
            .arg("csv")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "http://example.com/alice,http://example.com/carol",
            ));
        Ok(())
    }

    #[test]
    fn cli_run_json() -> Result<()> {
        let data_file = data_file()?;
        cli_command()
            .arg("run")
            .arg("--query")
            .arg(QUERY)
            .arg("--data-file")
            .arg(data_file.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"vars\":[\"a\",\"c\"]"))
            .stdout(predicate::str::contains("http://example.com/carol"));
        Ok(())
    }

    #[test]
    fn cli_run_unknown_data_format() -> Result<()> {
        let data_file = NamedTempFile::new("data.unknown")?;
        data_file.write_str("")?;
        cli_command()
            .arg("run")
            .arg("--query")
            .arg(QUERY)
            .arg("--data-file")
            .arg(data_file.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("is unknown"));
        Ok(())
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
