//! The interactive shell.
//!
//! Each input line is one command. `sparql` is the only command spanning several lines: its
//! query follows on the next lines and ends with a line holding a single `.`.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueHint};
use rdfmagic::error::SourceError;
use rdfmagic::rdf::{Literal, NamedNode, Term};
use rdfmagic::{
    Fetch, HttpFetcher, Loader, Model, NamespaceRegistry, ParserName, SourceArg, SourceValue,
    SparqlRequest, Table, VariableLookup,
};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::ops::ControlFlow;
use std::path::PathBuf;

const PROMPT: &str = "rdfmagic> ";
const CONTINUATION_PROMPT: &str = "    ...> ";
const END_OF_QUERY: &str = ".";

#[derive(Parser)]
#[command(no_binary_name = true, name = "rdfmagic")]
struct Line {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Register a namespace under a prefix, replacing an earlier binding
    Addns {
        prefix: String,
        #[arg(value_hint = ValueHint::Url)]
        namespace: String,
    },
    /// List the registered namespaces
    Lsns,
    /// Remove a namespace, given either its prefix or its URI
    Delns { name: String },
    /// Bind a variable to a text, a list of texts or a URI node written as <iri>
    Set {
        name: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Bind a variable to a new empty model
    Model { name: String },
    /// Load documents into a model
    ///
    /// A source is a file path, a URL or a variable holding either or a list of them.
    #[command(name = "load_source")]
    LoadSource {
        /// Variable holding the model to load into
        ///
        /// Without it the documents are loaded into a model that is thrown away.
        #[arg(short, long)]
        model: Option<String>,
        sources: Vec<String>,
    },
    /// Run the SPARQL query written on the following lines, up to a line holding a single `.`
    Sparql {
        /// Variable holding the model to query
        #[arg(short, long)]
        model: Option<String>,
        /// Document to load before querying, or a variable holding sources
        #[arg(short, long)]
        source: Vec<String>,
        /// Variable to store the result table in instead of printing it
        #[arg(short, long)]
        output: Option<String>,
        /// Print the number of rows found
        #[arg(short, long)]
        count: bool,
        /// Print the table as HTML
        #[arg(long)]
        html: bool,
    },
    /// Print a result table stored in a variable
    Show {
        name: String,
        /// Print the table as HTML
        #[arg(long)]
        html: bool,
    },
    /// Write a model to a file
    #[command(name = "save_model")]
    SaveModel {
        /// Variable holding the model to save
        #[arg(short, long)]
        model: String,
        /// Serialization format, turtle or rdfxml
        #[arg(short, long, default_value = "turtle")]
        format: ParserName,
        #[arg(value_hint = ValueHint::FilePath)]
        filename: PathBuf,
    },
    /// Print a model as Turtle
    Dump {
        /// Variable holding the model to print
        #[arg(short, long)]
        model: String,
    },
    /// List the bound variables
    Vars,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// A value bound to a shell variable.
#[derive(Debug, Clone)]
pub enum Value {
    /// A text, a URI node or a list of them.
    Source(SourceValue),
    Model(Model),
    Table(Table),
}

impl Value {
    fn describe(&self) -> anyhow::Result<String> {
        Ok(match self {
            Self::Source(SourceValue::Text(text)) => format!("text {text:?}"),
            Self::Source(SourceValue::Node(node)) => format!("node {node}"),
            Self::Source(SourceValue::List(items)) => format!("list of {} items", items.len()),
            Self::Model(model) => format!("model with {} triples", model.len()?),
            Self::Table(table) => format!("table with {} rows", table.len()),
        })
    }
}

/// The variables of a shell session.
#[derive(Debug, Default)]
pub struct Variables(BTreeMap<String, Value>);

impl Variables {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    fn model(&self, name: &str) -> anyhow::Result<Model> {
        match self.0.get(name) {
            Some(Value::Model(model)) => Ok(model.clone()),
            Some(_) => bail!("Variable '{name}' does not hold a model"),
            None => bail!("Unknown variable '{name}'"),
        }
    }
}

impl VariableLookup for Variables {
    fn lookup_source(&self, name: &str) -> Result<Option<SourceValue>, SourceError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(Value::Source(value)) => Ok(Some(value.clone())),
            Some(Value::Model(_) | Value::Table(_)) => {
                Err(SourceError::NotASource(name.to_owned()))
            }
        }
    }
}

/// A source of shell input lines.
pub trait ReadLine {
    /// Returns the next line, or `None` once the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Reads lines from a terminal with line editing and history.
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new().context("Failed to create the line editor")?,
        })
    }
}

impl ReadLine for Terminal {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

/// Reads lines from a script, without prompting.
pub struct Script<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> Script<R> {
    pub fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
        }
    }
}

impl<R: BufRead> ReadLine for Script<R> {
    fn read_line(&mut self, _prompt: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lines.next().transpose()?)
    }
}

/// A shell session: the namespace registry and the variables live as long as the session.
pub struct Shell<F = HttpFetcher> {
    registry: NamespaceRegistry,
    variables: Variables,
    loader: Loader<F>,
}

impl<F: Fetch> Shell<F> {
    pub fn new(loader: Loader<F>) -> Self {
        Self {
            registry: NamespaceRegistry::default(),
            variables: Variables::default(),
            loader,
        }
    }

    /// Reads and executes commands until `quit` or the end of the input.
    ///
    /// A failing command is reported on `out` and does not end the session.
    pub fn run(&mut self, input: &mut impl ReadLine, mut out: impl Write) -> anyhow::Result<()> {
        loop {
            let Some(line) = input.read_line(PROMPT)? else {
                return Ok(());
            };
            let words = line.split_whitespace().collect::<Vec<_>>();
            let Some(first) = words.first() else {
                continue;
            };
            if first.starts_with('#') {
                continue;
            }
            let body = if *first == "sparql" {
                Some(read_query_body(input)?)
            } else {
                None
            };

            let command = match Line::try_parse_from(words.iter().copied()) {
                Ok(line) => line.command,
                Err(error) => {
                    write!(out, "{}", error.render())?;
                    continue;
                }
            };
            tracing::debug!(command = %line, "Executing shell command");
            match self.execute(command, body.unwrap_or_default(), &mut out) {
                Ok(ControlFlow::Continue(())) => (),
                Ok(ControlFlow::Break(())) => return Ok(()),
                Err(error) => writeln!(out, "Error: {error:#}")?,
            }
        }
    }

    fn execute(
        &mut self,
        command: ShellCommand,
        body: String,
        out: &mut impl Write,
    ) -> anyhow::Result<ControlFlow<()>> {
        match command {
            ShellCommand::Addns { prefix, namespace } => self.registry.add(prefix, namespace),
            ShellCommand::Lsns => {
                let width = self
                    .registry
                    .list()
                    .map(|(prefix, _)| prefix.len())
                    .max()
                    .unwrap_or(0);
                for (prefix, namespace) in self.registry.list() {
                    writeln!(out, "{prefix:width$} {namespace}")?;
                }
            }
            ShellCommand::Delns { name } => {
                self.registry.remove(&name)?;
            }
            ShellCommand::Set { name, values } => {
                let mut values = values
                    .iter()
                    .map(String::as_str)
                    .map(parse_source_value)
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let value = if values.len() == 1 {
                    values.remove(0)
                } else {
                    SourceValue::List(values)
                };
                self.variables.insert(name, Value::Source(value));
            }
            ShellCommand::Model { name } => {
                self.variables.insert(name, Value::Model(Model::new()?));
            }
            ShellCommand::LoadSource { model, sources } => {
                let model = match model {
                    Some(name) => self.variables.model(&name)?,
                    None => Model::new()?,
                };
                let mut added = 0;
                for source in sources {
                    let locators =
                        rdfmagic::resolve_sources(&SourceArg::VariableRef(source), &self.variables)?;
                    added += self.loader.load_all(&model, &locators)?;
                }
                writeln!(out, "Loaded {added} triples.")?;
            }
            ShellCommand::Sparql {
                model,
                source,
                output,
                count,
                html,
            } => {
                let mut request = SparqlRequest::new(body);
                if let Some(name) = model {
                    request = request.with_model(self.variables.model(&name)?);
                }
                for source in source {
                    request = request.with_source(SourceArg::VariableRef(source));
                }
                let table = request.execute(&self.registry, &self.loader, &self.variables)?;
                if count {
                    writeln!(out, "Found {} rows.", table.len())?;
                }
                match output {
                    Some(name) => self.variables.insert(name, Value::Table(table)),
                    None => write_table(out, &table, &self.registry, html)?,
                }
            }
            ShellCommand::Show { name, html } => match self.variables.get(&name) {
                Some(Value::Table(table)) => write_table(out, table, &self.registry, html)?,
                Some(_) => bail!("Variable '{name}' does not hold a result table"),
                None => bail!("Unknown variable '{name}'"),
            },
            ShellCommand::SaveModel {
                model,
                format,
                filename,
            } => {
                let model = self.variables.model(&model)?;
                let file = File::create(&filename)
                    .with_context(|| format!("Failed to create {}", filename.display()))?;
                close_file_writer(model.serialize(format, BufWriter::new(file))?)?;
            }
            ShellCommand::Dump { model } => {
                self.variables.model(&model)?.serialize(ParserName::Turtle, &mut *out)?;
            }
            ShellCommand::Vars => {
                for (name, value) in &self.variables.0 {
                    writeln!(out, "{name}\t{}", value.describe()?)?;
                }
            }
            ShellCommand::Quit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }
}

/// Prints a table as tab separated text or as HTML.
pub fn write_table(
    out: &mut impl Write,
    table: &Table,
    registry: &NamespaceRegistry,
    html: bool,
) -> io::Result<()> {
    if html {
        for fragment in table.render_markup(registry) {
            out.write_all(fragment.as_bytes())?;
        }
        writeln!(out)
    } else {
        writeln!(out, "{}", table.render_text(registry))
    }
}

/// Reads `<iri>` as a URI node and anything else as plain text.
fn parse_term(value: &str) -> anyhow::Result<Term> {
    match value
        .strip_prefix('<')
        .and_then(|value| value.strip_suffix('>'))
    {
        Some(iri) => Ok(NamedNode::new(iri)
            .with_context(|| format!("Invalid IRI <{iri}>"))?
            .into()),
        None => Ok(Literal::new_simple_literal(value).into()),
    }
}

fn parse_source_value(value: &str) -> anyhow::Result<SourceValue> {
    SourceValue::from_term(parse_term(value)?)
        .with_context(|| format!("{value} does not denote a source"))
}

fn read_query_body(input: &mut impl ReadLine) -> anyhow::Result<String> {
    let mut body = Vec::new();
    while let Some(line) = input.read_line(CONTINUATION_PROMPT)? {
        if line.trim() == END_OF_QUERY {
            break;
        }
        body.push(line);
    }
    Ok(body.join("\n"))
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}
