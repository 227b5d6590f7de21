//! Materialized query results.

use crate::error::{QueryError, TableError};
use crate::namespaces::NamespaceRegistry;
use oxigraph::model::{Literal, Term, Variable};
use oxigraph::sparql::{QueryResults, QuerySolutionIter, QueryTripleIter};
use std::borrow::Cow;
use std::iter;

/// The table of a query result.
///
/// A table is built once from the single-pass cursor the engine returns and never changes
/// afterwards. Every row holds exactly one, possibly unbound, value per column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<Variable>,
    rows: Vec<Vec<Option<Term>>>,
}

impl Table {
    /// A table without columns and rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Consumes a solution cursor.
    ///
    /// An absent cursor gives the empty table. The columns follow the variable order reported by
    /// the cursor.
    pub fn build(cursor: Option<QuerySolutionIter>) -> Result<Self, QueryError> {
        let Some(cursor) = cursor else {
            return Ok(Self::empty());
        };
        let columns = cursor.variables().to_vec();
        let rows = cursor
            .map(|solution| -> Result<Vec<Option<Term>>, QueryError> {
                let solution = solution?;
                Ok(columns
                    .iter()
                    .map(|column| solution.get(column).cloned())
                    .collect())
            })
            .collect::<Result<Vec<_>, QueryError>>()?;
        Ok(Self { columns, rows })
    }

    /// Frames any kind of query result as a table.
    ///
    /// `ASK` results become a single `ask` column with one boolean row, `CONSTRUCT` and
    /// `DESCRIBE` results the columns `subject`, `predicate` and `object`.
    pub fn from_results(results: QueryResults) -> Result<Self, QueryError> {
        match results {
            QueryResults::Solutions(solutions) => Self::build(Some(solutions)),
            QueryResults::Boolean(value) => Ok(Self {
                columns: vec![Variable::new_unchecked("ask")],
                rows: vec![vec![Some(Literal::from(value).into())]],
            }),
            QueryResults::Graph(triples) => Self::from_triples(triples),
        }
    }

    fn from_triples(triples: QueryTripleIter) -> Result<Self, QueryError> {
        let rows = triples
            .map(|triple| -> Result<Vec<Option<Term>>, QueryError> {
                let triple = triple?;
                Ok(vec![
                    Some(triple.subject.into()),
                    Some(triple.predicate.into()),
                    Some(triple.object),
                ])
            })
            .collect::<Result<Vec<_>, QueryError>>()?;
        Ok(Self {
            columns: ["subject", "predicate", "object"]
                .into_iter()
                .map(Variable::new_unchecked)
                .collect(),
            rows,
        })
    }

    /// The column variables, in result order.
    pub fn columns(&self) -> &[Variable] {
        &self.columns
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `index`, counting from zero.
    pub fn row(&self, index: usize) -> Result<Row<'_>, TableError> {
        let values = self.rows.get(index).ok_or(TableError::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })?;
        Ok(Row {
            columns: &self.columns,
            values,
        })
    }

    /// Iterates over the rows in result order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Renders the table as an HTML table, one fragment at a time.
    ///
    /// IRIs become links showing their abbreviated form. Nothing is rendered before the returned
    /// iterator is advanced.
    pub fn render_markup<'a>(
        &'a self,
        registry: &'a NamespaceRegistry,
    ) -> impl Iterator<Item = Cow<'a, str>> + 'a {
        let header = iter::once(Cow::Borrowed("<table><tr>"))
            .chain(
                self.columns
                    .iter()
                    .map(|column| Cow::Owned(format!("<th>{}</th>", escape_html(column.as_str())))),
            )
            .chain(iter::once(Cow::Borrowed("</tr>")));
        let body = self.rows.iter().flat_map(move |row| {
            iter::once(Cow::Borrowed("<tr>"))
                .chain(row.iter().map(move |value| {
                    Cow::Owned(format!(
                        "<td>{}</td>",
                        render_term_markup(value.as_ref(), registry)
                    ))
                }))
                .chain(iter::once(Cow::Borrowed("</tr>")))
        });
        header.chain(body).chain(iter::once(Cow::Borrowed("</table>")))
    }

    /// Renders the whole table as HTML.
    pub fn to_html(&self, registry: &NamespaceRegistry) -> String {
        self.render_markup(registry).collect()
    }

    /// Renders the table as tab-separated text with a header line of column names.
    pub fn render_text(&self, registry: &NamespaceRegistry) -> String {
        let header = self
            .columns
            .iter()
            .map(Variable::as_str)
            .collect::<Vec<_>>()
            .join("\t");
        iter::once(header)
            .chain(self.rows.iter().map(|row| {
                row.iter()
                    .map(|value| render_term_text(value.as_ref(), registry))
                    .collect::<Vec<_>>()
                    .join("\t")
            }))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single row of a [`Table`], viewed as a mapping from column name to value.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [Variable],
    values: &'a [Option<Term>],
}

impl<'a> Row<'a> {
    /// The value bound to `column`, `None` for unknown columns and unbound values.
    pub fn get(&self, column: &str) -> Option<&'a Term> {
        let position = self.columns.iter().position(|c| c.as_str() == column)?;
        self.values.get(position)?.as_ref()
    }

    /// The values in column order.
    pub fn values(&self) -> &'a [Option<Term>] {
        self.values
    }

    /// Iterates over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Variable, Option<&'a Term>)> {
        let (columns, values) = (self.columns, self.values);
        columns.iter().zip(values.iter().map(Option::as_ref))
    }
}

/// Renders a term for display: IRIs as CURIEs where possible, literals by their value, unbound
/// values as the empty string.
pub fn render_term_text<'a>(term: Option<&'a Term>, registry: &NamespaceRegistry) -> Cow<'a, str> {
    match term {
        None => Cow::Borrowed(""),
        Some(Term::NamedNode(node)) => registry.abbreviate(node.as_str()),
        Some(Term::Literal(literal)) => Cow::Borrowed(literal.value()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Like [`render_term_text`], with IRIs turned into links to the full IRI.
pub fn render_term_markup(term: Option<&Term>, registry: &NamespaceRegistry) -> String {
    match term {
        Some(Term::NamedNode(node)) => format!(
            "<a href=\"{}\">{}</a>",
            escape_html(node.as_str()),
            escape_html(&registry.abbreviate(node.as_str()))
        ),
        other => escape_html(&render_term_text(other, registry)).into_owned(),
    }
}

fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ParserName;
    use crate::model::Model;

    const DATA: &str = r#"
@prefix ex: <http://example.org/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

ex:a rdfs:label "A & B" .
ex:b rdfs:label "B" .
"#;

    fn model() -> Model {
        let model = Model::new().unwrap();
        model
            .parse(DATA.as_bytes(), ParserName::Turtle, "http://example.org/")
            .unwrap();
        model
    }

    fn query(model: &Model, query: &str) -> Table {
        Table::from_results(model.execute_query(query).unwrap()).unwrap()
    }

    #[test]
    fn absent_cursor_gives_empty_table() {
        let table = Table::build(None).unwrap();
        assert!(table.columns().is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(
            table.row(0).unwrap_err(),
            TableError::IndexOutOfRange { index: 0, len: 0 }
        );
    }

    #[test]
    fn rows_are_aligned_to_columns() {
        let table = query(
            &model(),
            "SELECT ?s ?label WHERE { ?s <http://www.w3.org/2000/01/rdf-schema#label> ?label } ORDER BY ?s",
        );
        let columns = table.columns().iter().map(Variable::as_str).collect::<Vec<_>>();
        assert_eq!(columns, ["s", "label"]);
        assert_eq!(table.len(), 2);
        let first = table.row(0).unwrap();
        assert_eq!(
            first.get("s"),
            Some(&Term::NamedNode(oxigraph::model::NamedNode::new_unchecked(
                "http://example.org/a"
            )))
        );
        assert_eq!(first.get("label"), Some(&Literal::new_simple_literal("A & B").into()));
        assert_eq!(first.get("missing"), None);
        assert!(table.rows().all(|row| row.values().len() == 2));
    }

    #[test]
    fn row_out_of_range_fails() {
        let table = query(&model(), "SELECT ?s WHERE { ?s ?p ?o }");
        assert!(table.row(1).is_ok());
        assert_eq!(
            table.row(2).unwrap_err(),
            TableError::IndexOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn unbound_values_stay_in_place() {
        let table = query(
            &model(),
            "SELECT ?s ?missing WHERE { ?s ?p \"B\" OPTIONAL { ?s <http://example.org/nope> ?missing } }",
        );
        let row = table.row(0).unwrap();
        assert_eq!(row.values().len(), 2);
        assert_eq!(row.get("missing"), None);
        assert_eq!(table.render_text(&NamespaceRegistry::empty()), "s\tmissing\nhttp://example.org/b\t");
    }

    #[test]
    fn text_rendering_abbreviates() {
        let mut registry = NamespaceRegistry::empty();
        registry.add("ex", "http://example.org/");
        let table = query(
            &model(),
            "SELECT ?s ?label WHERE { ?s ?p ?label } ORDER BY ?s",
        );
        assert_eq!(table.render_text(&registry), "s\tlabel\nex:a\tA & B\nex:b\tB");
    }

    #[test]
    fn markup_rendering_links_and_escapes() {
        let mut registry = NamespaceRegistry::empty();
        registry.add("ex", "http://example.org/");
        let table = query(&model(), "SELECT ?s ?label WHERE { ?s ?p ?label } ORDER BY ?s");
        assert_eq!(
            table.to_html(&registry),
            "<table><tr><th>s</th><th>label</th></tr>\
             <tr><td><a href=\"http://example.org/a\">ex:a</a></td><td>A &amp; B</td></tr>\
             <tr><td><a href=\"http://example.org/b\">ex:b</a></td><td>B</td></tr>\
             </table>"
        );
    }

    #[test]
    fn markup_is_lazy_fragments() {
        let table = query(&model(), "SELECT ?s WHERE { ?s ?p ?o } ORDER BY ?s");
        let registry = NamespaceRegistry::empty();
        let mut fragments = table.render_markup(&registry);
        assert_eq!(fragments.next().as_deref(), Some("<table><tr>"));
        assert_eq!(fragments.next().as_deref(), Some("<th>s</th>"));
        assert_eq!(fragments.count(), 1 + 2 * 3 + 1);
    }

    #[test]
    fn ask_and_construct_results() {
        let model = model();
        let ask = query(&model, "ASK { ?s ?p \"B\" }");
        assert_eq!(ask.render_text(&NamespaceRegistry::empty()), "ask\ntrue");

        let construct = query(&model, "CONSTRUCT { ?s <http://example.org/q> ?o } WHERE { ?s ?p ?o }");
        assert_eq!(construct.len(), 2);
        let columns = construct.columns().iter().map(Variable::as_str).collect::<Vec<_>>();
        assert_eq!(columns, ["subject", "predicate", "object"]);
    }
}
