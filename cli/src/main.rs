use crate::cli::{Args, Command, OutputFormat};
use crate::shell::{write_table, Script, Shell, Terminal};
use anyhow::{bail, Context};
use clap::Parser;
use rdfmagic::{Loader, LoaderConfig, NamespaceRegistry, NoVariables, SourceArg, SparqlRequest};
use std::fs;
use std::io::{self, stdin, stdout, IsTerminal, Write};
use std::time::Duration;

mod cli;
mod shell;

pub fn main() -> anyhow::Result<()> {
    let matches = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(matches.log_level)
        .with_writer(io::stderr)
        .init();

    let mut config = LoaderConfig::default();
    if let Some(timeout) = matches.timeout {
        config = config.with_timeout(Duration::from_secs(timeout));
    }
    let loader = Loader::new(&config).context("Failed to set up the HTTP client")?;

    match matches.command {
        Command::Shell => {
            let mut shell = Shell::new(loader);
            if stdin().is_terminal() {
                shell.run(&mut Terminal::new()?, stdout())
            } else {
                shell.run(&mut Script::new(stdin().lock()), stdout().lock())
            }
        }
        Command::Query {
            sources,
            query,
            query_file,
            format,
            count,
        } => {
            let query = if let Some(query) = query {
                query
            } else if let Some(file) = query_file {
                fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read the query file {}", file.display()))?
            } else {
                bail!("Either --query or --query-file must be set")
            };
            let registry = NamespaceRegistry::default();
            let request = sources
                .into_iter()
                .fold(SparqlRequest::new(query), |request, source| {
                    request.with_source(SourceArg::Literal(source))
                });
            let table = request.execute(&registry, &loader, &NoVariables)?;

            let mut out = stdout().lock();
            if count {
                writeln!(out, "Found {} rows.", table.len())?;
            }
            write_table(&mut out, &table, &registry, format == OutputFormat::Html)?;
            out.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use predicates::prelude::*;

    const DATA: &str = "@prefix ex: <http://example.org/> .\nex:b a ex:Person .\nex:a a ex:Person .\n";

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command.arg("run").arg("--bin").arg("rdfmagic");
        command.arg("--");
        command
    }

    fn data_file() -> Result<NamedTempFile> {
        let file = NamedTempFile::new("people.ttl")?;
        file.write_str(DATA)?;
        Ok(file)
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("SPARQL shell"));
    }

    #[test]
    fn cli_query_file_source() -> Result<()> {
        let file = data_file()?;
        cli_command()
            .arg("query")
            .arg("--source")
            .arg(file.path())
            .arg("--query")
            .arg("SELECT ?s WHERE { ?s rdf:type ?type } ORDER BY ?s")
            .arg("--count")
            .assert()
            .success()
            .stdout("Found 2 rows.\ns\nhttp://example.org/a\nhttp://example.org/b\n");
        Ok(())
    }

    #[test]
    fn cli_query_from_clause_as_html() -> Result<()> {
        let file = data_file()?;
        let query_file = NamedTempFile::new("query.rq")?;
        query_file.write_str(&format!(
            "SELECT ?s FROM <{}> WHERE {{ ?s a <http://example.org/Person> }} ORDER BY ?s",
            rdfmagic::Locator::from_path(file.path())?
        ))?;
        cli_command()
            .arg("query")
            .arg("--query-file")
            .arg(query_file.path())
            .arg("--format")
            .arg("html")
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "<table><tr><th>s</th></tr><tr><td><a href=\"http://example.org/a\">",
            ));
        Ok(())
    }

    #[test]
    fn cli_query_without_source_fails() {
        cli_command()
            .arg("query")
            .arg("--query")
            .arg("SELECT * WHERE { ?s ?p ?o }")
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Please specify a source to query against.",
            ));
    }

    #[test]
    fn cli_shell_script() -> Result<()> {
        let file = data_file()?;
        cli_command()
            .arg("shell")
            .write_stdin(format!(
                "addns ex http://example.org/\nsparql -s {}\nSELECT ?s WHERE {{ ?s a ex:Person }} ORDER BY ?s\n.\nquit\n",
                file.path().display()
            ))
            .assert()
            .success()
            .stdout("s\nex:a\nex:b\n");
        Ok(())
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
