#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod config;
pub mod error;
mod fetch;
mod format;
mod loader;
mod model;
mod namespaces;
mod pipeline;
mod query;
mod source;
mod table;

pub use config::{LoaderConfig, ACCEPT_HEADER, HTTP_TIMEOUT};
pub use fetch::{Fetch, FetchResponse, HttpFetcher};
pub use format::{guess_parser_name, guess_parser_name_by_extension, sniff_content, ParserName};
pub use loader::Loader;
pub use model::Model;
pub use namespaces::{NamespaceRegistry, DEFAULT_NAMESPACES};
pub use pipeline::SparqlRequest;
pub use query::{extract_froms, prepare_query};
pub use source::{resolve_sources, Locator, NoVariables, SourceArg, SourceValue, VariableLookup};
pub use table::{render_term_markup, render_term_text, Row, Table};

pub mod rdf {
    pub use oxigraph::model::{Literal, NamedNode, Term, Variable};
}
