use crate::format::ParserName;
use oxigraph::io::RdfParseError;
use oxigraph::model::IriParseError;
use oxigraph::sparql::EvaluationError;
use oxigraph::store::StorageError;
use std::io;
use std::path::PathBuf;

/// An error raised while editing the [`NamespaceRegistry`](crate::NamespaceRegistry).
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    /// The name is neither a registered prefix nor a registered namespace URI.
    #[error("{0} was not found in the namespace registry")]
    NotFound(String),
}

/// The name does not denote one of the known parsers.
#[derive(Debug, thiserror::Error)]
#[error("Unknown RDF format '{0}' (expected one of rdfxml, turtle, rdfa, guess)")]
pub struct UnknownFormatError(pub String);

/// An error raised while turning a source argument into [`Locator`](crate::Locator)s.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source is neither a URI nor a usable file system path.
    #[error("Invalid source locator '{source_text}': {reason}")]
    InvalidLocator {
        /// The offending source text.
        source_text: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A variable is bound, but not to something that can be loaded.
    #[error("Variable '{0}' does not hold a source (expected a string, a list or a URI node)")]
    NotASource(String),
}

/// An error raised while loading a document into a [`Model`](crate::Model).
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The local file does not exist.
    #[error("File {} does not exist", .0.display())]
    NotFound(PathBuf),
    /// The transport failed before a response was received.
    #[error("Problem opening {locator}: {source}")]
    Transport {
        /// The locator that was fetched.
        locator: String,
        /// The underlying transport failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The server answered with a non-success status.
    #[error("Problem opening {locator}: HTTP status {status}")]
    HttpStatus {
        /// The locator that was fetched.
        locator: String,
        /// The status code of the response.
        status: u16,
    },
    /// The locator uses a scheme the loader cannot open.
    #[error("Unsupported locator scheme '{scheme}' in {locator}")]
    UnsupportedScheme {
        /// The scheme of the locator.
        scheme: String,
        /// The full locator.
        locator: String,
    },
    /// No parser is available for the selected format.
    #[error("No parser is available for the {0} format")]
    UnsupportedFormat(ParserName),
    /// The base IRI is invalid.
    #[error("Invalid base IRI '{iri}': {error}")]
    InvalidBaseIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
    /// The document is not valid for the chosen parser.
    #[error(transparent)]
    Parse(#[from] RdfParseError),
    /// An error raised while reading the stream.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error raised by the underlying store.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The locator could not be mapped to a path.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// An error raised while evaluating a query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The query could not be parsed or evaluated.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// An error raised while writing a [`Model`](crate::Model) out.
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
    /// The format can be parsed but not written.
    #[error("Models cannot be saved in the {0} format")]
    UnsupportedFormat(ParserName),
    /// An error raised while serializing the content.
    #[error(transparent)]
    Serialization(#[from] oxigraph::store::SerializerError),
    /// An error raised while writing the content.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An error raised when accessing a [`Table`](crate::Table).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The row index is not within `[0, len)`.
    #[error("Row index {index} is out of range for a table with {len} rows")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of rows.
        len: usize,
    },
}

/// The caller supplied arguments that do not describe a valid request.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Any error raised by the query pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RdfMagicError {
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Serializer(#[from] SerializerError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
