use crate::error::{LoaderError, QueryError, SerializerError};
use crate::format::ParserName;
use oxigraph::io::RdfParser;
use oxigraph::model::GraphNameRef;
use oxigraph::sparql::QueryResults;
use oxigraph::store::{StorageError, Store};
use std::fmt;
use std::io::Write;

/// A mutable collection of triples that can be queried with SPARQL.
///
/// Cloning a [`Model`] creates another handle to the same triples, which is how a model bound
/// to a shell variable is shared with the loader. No handle has exclusive access.
///
/// ```
/// use rdfmagic::{Model, ParserName};
/// use oxigraph::sparql::QueryResults;
///
/// let model = Model::new()?;
/// assert_eq!(model.parse(b"<s> <p> <o> .", ParserName::Turtle, "http://example.com/")?, 1);
/// assert_eq!(model.len()?, 1);
/// assert!(matches!(
///     model.execute_query("ASK { <http://example.com/s> ?p ?o }")?,
///     QueryResults::Boolean(true)
/// ));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone)]
pub struct Model {
    store: Store,
}

impl Model {
    /// Creates a fresh, empty in-memory model.
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            store: Store::new()?,
        })
    }

    /// Wraps an existing store.
    pub fn from_store(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Parses `data` with the given parser and adds the resulting triples to the model.
    ///
    /// Relative IRIs in the document are resolved against `base_iri`. Existing triples are
    /// kept. Returns the number of triples the document held; nothing is added when the
    /// document is malformed.
    pub fn parse(
        &self,
        data: &[u8],
        parser: ParserName,
        base_iri: &str,
    ) -> Result<usize, LoaderError> {
        let resolved = parser.resolve(data);
        if resolved != parser {
            tracing::debug!(parser = %resolved, base_iri, "Guessed parser from content");
        }
        let format = resolved
            .rdf_format()
            .ok_or(LoaderError::UnsupportedFormat(resolved))?;
        let quads = RdfParser::from_format(format)
            .with_base_iri(base_iri)
            .map_err(|error| LoaderError::InvalidBaseIri {
                iri: base_iri.to_owned(),
                error,
            })?
            .for_reader(data)
            .collect::<Result<Vec<_>, _>>()?;
        let count = quads.len();
        self.store.extend(quads)?;
        Ok(count)
    }

    /// Evaluates a SPARQL query against the model.
    pub fn execute_query(&self, query: &str) -> Result<QueryResults, QueryError> {
        Ok(self.store.query(query)?)
    }

    /// Writes the triples of the model to `writer` in the given format.
    pub fn serialize<W: Write>(&self, format: ParserName, writer: W) -> Result<W, SerializerError> {
        let rdf_format = format
            .rdf_format()
            .ok_or(SerializerError::UnsupportedFormat(format))?;
        Ok(self
            .store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, rdf_format, writer)?)
    }

    /// The number of triples in the model.
    pub fn len(&self) -> Result<usize, StorageError> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        self.store.is_empty()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model").finish_non_exhaustive()
    }
}
