//! Rewriting of user supplied query bodies before they reach the engine.

use crate::namespaces::NamespaceRegistry;
use regex::Regex;
use std::sync::LazyLock;

/// A bare `FROM <uri>` clause. `FROM NAMED <uri>` never matches because `NAMED` sits between
/// the keyword and the IRI.
#[expect(clippy::expect_used, reason = "The pattern is a constant")]
static FROM_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfrom\s+<([^<>]+)>").expect("valid FROM pattern"));

/// Extracts the IRIs of all bare `FROM <uri>` clauses and removes those clauses from the query.
///
/// The engine does not load the graphs a query names in its dataset clause, so the shell
/// loads them itself. `FROM NAMED` clauses are left in place. All other characters of the
/// query, including whitespace around a removed clause, are kept as they are.
///
/// ```
/// let (froms, query) = rdfmagic::extract_froms("select from <abc> from named <def> from <gef> where");
/// assert_eq!(froms, ["abc", "gef"]);
/// assert_eq!(query, "select  from named <def>  where");
/// ```
pub fn extract_froms(query: &str) -> (Vec<String>, String) {
    let mut froms = Vec::new();
    let mut query = query.to_owned();
    loop {
        let found = FROM_CLAUSE.captures(&query).and_then(|captures| {
            Some((captures.get(0)?.range(), captures.get(1)?.as_str().to_owned()))
        });
        let Some((clause, uri)) = found else {
            break;
        };
        froms.push(uri);
        query.replace_range(clause, "");
    }
    (froms, query)
}

/// Prepends one `PREFIX` declaration per registry entry to `query`.
///
/// Declarations follow the registry order (sorted by prefix) and are joined by newlines.
pub fn prepare_query(registry: &NamespaceRegistry, query: &str) -> String {
    let mut lines = registry
        .list()
        .map(|(prefix, uri)| format!("PREFIX {prefix}: <{uri}>"))
        .collect::<Vec<_>>();
    lines.push(query.to_owned());
    lines.join("\n")
}
