//! The `sparql` request: sources are loaded into a model, then the prepared query runs on it.

use crate::error::{RdfMagicError, UsageError};
use crate::fetch::Fetch;
use crate::loader::Loader;
use crate::model::Model;
use crate::namespaces::NamespaceRegistry;
use crate::query::{extract_froms, prepare_query};
use crate::source::{resolve_sources, SourceArg, VariableLookup};
use crate::table::Table;

/// A query together with the data it should run against.
#[derive(Debug, Clone)]
pub struct SparqlRequest {
    query: String,
    sources: Vec<SourceArg>,
    model: Option<Model>,
}

impl SparqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sources: Vec::new(),
            model: None,
        }
    }

    /// Adds a source that is loaded after those named by `FROM` clauses.
    #[must_use]
    pub fn with_source(mut self, source: SourceArg) -> Self {
        self.sources.push(source);
        self
    }

    /// Runs the query against `model` instead of a fresh scratch model.
    #[must_use]
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Executes the request.
    ///
    /// The `FROM <uri>` clauses of the query are extracted and loaded first, then the explicit
    /// sources, in order. The registry prefixes are prepended to what is left of the query.
    /// Fails with a [`UsageError`] when there is neither a model nor any source.
    pub fn execute<F: Fetch>(
        self,
        registry: &NamespaceRegistry,
        loader: &Loader<F>,
        variables: &impl VariableLookup,
    ) -> Result<Table, RdfMagicError> {
        let (froms, body) = extract_froms(&self.query);
        let mut locators = Vec::new();
        for source in froms
            .into_iter()
            .map(SourceArg::Literal)
            .chain(self.sources)
        {
            locators.extend(resolve_sources(&source, variables)?);
        }

        let model = match self.model {
            Some(model) => model,
            None if locators.is_empty() => {
                return Err(
                    UsageError("Please specify a source to query against.".to_owned()).into(),
                )
            }
            None => Model::new()?,
        };
        loader.load_all(&model, &locators)?;

        let query = prepare_query(registry, &body);
        tracing::debug!(%query, "Executing query");
        Ok(Table::from_results(model.execute_query(&query)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::error::SourceError;
    use crate::format::ParserName;
    use crate::source::{Locator, NoVariables, SourceValue};
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use std::collections::HashMap;

    const DATA: &str = "@prefix ex: <http://example.org/> .\nex:a a ex:Person .\nex:b a ex:Person .\n";

    fn data_file() -> NamedTempFile {
        let file = NamedTempFile::new("people.ttl").unwrap();
        file.write_str(DATA).unwrap();
        file
    }

    fn loader() -> Loader {
        Loader::new(&LoaderConfig::default()).unwrap()
    }

    #[test]
    fn missing_sources_are_a_usage_error() {
        let err = SparqlRequest::new("SELECT * WHERE { ?s ?p ?o }")
            .execute(&NamespaceRegistry::default(), &loader(), &NoVariables)
            .unwrap_err();
        assert!(matches!(err, RdfMagicError::Usage(_)));
    }

    #[test]
    fn registry_prefixes_are_available_to_the_query() {
        let model = Model::new().unwrap();
        model
            .parse(DATA.as_bytes(), ParserName::Turtle, "http://example.org/")
            .unwrap();
        let table = SparqlRequest::new("SELECT ?s WHERE { ?s rdf:type ?type }")
            .with_model(model)
            .execute(&NamespaceRegistry::default(), &loader(), &NoVariables)
            .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn from_clauses_are_loaded_into_the_scratch_model() {
        let file = data_file();
        let locator = Locator::from_path(file.path()).unwrap();
        let table = SparqlRequest::new(format!(
            "SELECT ?s FROM <{locator}> WHERE {{ ?s ?p ?o }}"
        ))
        .execute(&NamespaceRegistry::default(), &loader(), &NoVariables)
        .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn source_variables_are_resolved() {
        let file = data_file();
        let variables = HashMap::from([(
            "people".to_owned(),
            SourceValue::from(file.path().display().to_string()),
        )]);
        let model = Model::new().unwrap();
        let table = SparqlRequest::new("SELECT ?s WHERE { ?s ?p ?o }")
            .with_source(SourceArg::VariableRef("people".to_owned()))
            .with_model(model.clone())
            .execute(&NamespaceRegistry::default(), &loader(), &variables)
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(model.len().unwrap(), 2);
    }

    #[test]
    fn variables_without_sources_fail() {
        struct Tables;

        impl VariableLookup for Tables {
            fn lookup_source(&self, name: &str) -> Result<Option<SourceValue>, SourceError> {
                Err(SourceError::NotASource(name.to_owned()))
            }
        }

        let err = SparqlRequest::new("SELECT * WHERE { ?s ?p ?o }")
            .with_source(SourceArg::VariableRef("results".to_owned()))
            .execute(&NamespaceRegistry::default(), &loader(), &Tables)
            .unwrap_err();
        assert!(matches!(err, RdfMagicError::Source(SourceError::NotASource(name)) if name == "results"));
    }
}
