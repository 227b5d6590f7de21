//! Resolution of source arguments into absolute [`Locator`]s.

use crate::error::SourceError;
use oxigraph::model::{NamedNode, Term};
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::path::{self, Path, PathBuf};
use std::str::FromStr;
use url::{ParseError, Url};

/// An absolute reference to a loadable RDF document.
///
/// Either a `file:` URL holding an absolute path or a URL with an explicit scheme such as
/// `http:` or `https:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(Url);

impl Locator {
    /// Normalizes a source string into a locator.
    ///
    /// Text with a scheme is kept as it is. Anything else is a file system path and is made
    /// absolute against the current working directory.
    pub fn parse(source: &str) -> Result<Self, SourceError> {
        match Url::parse(source) {
            Ok(url) => Ok(Self(url)),
            Err(ParseError::RelativeUrlWithoutBase) => Self::from_path(Path::new(source)),
            Err(error) => Err(SourceError::InvalidLocator {
                source_text: source.to_owned(),
                reason: error.to_string(),
            }),
        }
    }

    /// Creates a `file:` locator, resolving a relative `path` against the working directory.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let invalid = |reason: String| SourceError::InvalidLocator {
            source_text: path.display().to_string(),
            reason,
        };
        let absolute = path::absolute(path).map_err(|e| invalid(e.to_string()))?;
        Url::from_file_path(&absolute)
            .map(Self)
            .map_err(|()| invalid("not an absolute file system path".to_owned()))
    }

    /// The URL scheme, `file` for local documents.
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// The path component, used for extension based format detection.
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// The full locator, also used as the base IRI of the document.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The underlying URL, as handed to the fetcher.
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Whether the document is read from the local file system.
    pub fn is_file(&self) -> bool {
        self.scheme() == "file"
    }

    /// The file system path of a `file:` locator.
    pub fn to_file_path(&self) -> Result<PathBuf, SourceError> {
        self.0
            .to_file_path()
            .map_err(|()| SourceError::InvalidLocator {
                source_text: self.0.to_string(),
                reason: "not a local file path".to_owned(),
            })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Locator {
    type Err = SourceError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

/// A value a shell variable can hold that denotes one or more sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceValue {
    Text(String),
    /// A URI node, used through its IRI.
    Node(NamedNode),
    /// An ordered collection, each element being a source of its own.
    List(Vec<SourceValue>),
}

impl SourceValue {
    /// Coerces an RDF term into a source value.
    ///
    /// IRIs are used through their IRI and literals through their lexical value. Blank nodes
    /// do not denote documents.
    pub fn from_term(term: Term) -> Option<Self> {
        match term {
            Term::NamedNode(node) => Some(Self::Node(node)),
            Term::Literal(literal) => Some(Self::Text(literal.value().to_owned())),
            _ => None,
        }
    }

    fn flatten_into(&self, sources: &mut Vec<String>) {
        match self {
            Self::Text(text) => sources.push(text.clone()),
            Self::Node(node) => sources.push(node.as_str().to_owned()),
            Self::List(values) => {
                for value in values {
                    value.flatten_into(sources);
                }
            }
        }
    }
}

impl From<&str> for SourceValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for SourceValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NamedNode> for SourceValue {
    fn from(node: NamedNode) -> Self {
        Self::Node(node)
    }
}

impl<T: Into<SourceValue>> From<Vec<T>> for SourceValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// A source argument as handed over by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceArg {
    /// Text that is used as the source itself.
    Literal(String),
    /// Text that names a shell variable and is used literally when the variable is unbound.
    VariableRef(String),
    /// Values the shell has already looked up.
    Resolved(Vec<SourceValue>),
}

/// Access to the variables of the surrounding shell.
pub trait VariableLookup {
    /// Returns the source value bound to `name`, or `None` when `name` is unbound.
    ///
    /// Fails when `name` is bound to a value that does not denote sources.
    fn lookup_source(&self, name: &str) -> Result<Option<SourceValue>, SourceError>;
}

impl<S: BuildHasher> VariableLookup for HashMap<String, SourceValue, S> {
    fn lookup_source(&self, name: &str) -> Result<Option<SourceValue>, SourceError> {
        Ok(self.get(name).cloned())
    }
}

/// A lookup without any bound variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVariables;

impl VariableLookup for NoVariables {
    fn lookup_source(&self, _name: &str) -> Result<Option<SourceValue>, SourceError> {
        Ok(None)
    }
}

/// Resolves a source argument into locators, keeping the order in which they are given.
pub fn resolve_sources(
    argument: &SourceArg,
    variables: &impl VariableLookup,
) -> Result<Vec<Locator>, SourceError> {
    let mut sources = Vec::new();
    match argument {
        SourceArg::Literal(text) => sources.push(text.clone()),
        SourceArg::VariableRef(name) => match variables.lookup_source(name)? {
            Some(value) => value.flatten_into(&mut sources),
            None => sources.push(name.clone()),
        },
        SourceArg::Resolved(values) => {
            for value in values {
                value.flatten_into(&mut sources);
            }
        }
    }
    sources.iter().map(|source| Locator::parse(source)).collect()
}
