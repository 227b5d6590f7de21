//! The namespace registry shared by query preparation and result rendering.

use crate::error::NamespaceError;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Vocabularies every new [`NamespaceRegistry`] starts out with.
pub const DEFAULT_NAMESPACES: [(&str, &str); 8] = [
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("vs", "http://www.w3.org/2003/06/sw-vocab-status/ns#"),
    ("wot", "http://xmlns.com/wot/0.1/"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// A bidirectional mapping between prefixes and namespace URIs.
///
/// Both directions are always exact inverses of each other: every prefix maps
/// to exactly one URI and every URI to exactly one prefix. The registry is an
/// explicit context object; the shell creates one [`Default`] instance at
/// start-up and hands it to whatever needs to expand or abbreviate URIs.
///
/// ```
/// use rdfmagic::NamespaceRegistry;
///
/// let mut registry = NamespaceRegistry::default();
/// registry.add("ex", "http://example.org/");
/// assert_eq!(registry.abbreviate("http://example.org/Thing"), "ex:Thing");
/// assert_eq!(registry.abbreviate("urn:isbn:123"), "urn:isbn:123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRegistry {
    prefixes: BTreeMap<String, String>,
    namespaces: HashMap<String, String>,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for (prefix, uri) in DEFAULT_NAMESPACES {
            registry.add(prefix, uri);
        }
        registry
    }
}

impl NamespaceRegistry {
    /// Creates a registry without any entries.
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
            namespaces: HashMap::new(),
        }
    }

    /// Binds `prefix` to `uri`.
    ///
    /// An existing binding of either the prefix or the URI is silently replaced.
    pub fn add(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        let uri = uri.into();
        if let Some(old_uri) = self.prefixes.remove(&prefix) {
            self.namespaces.remove(&old_uri);
        }
        if let Some(old_prefix) = self.namespaces.remove(&uri) {
            self.prefixes.remove(&old_prefix);
        }
        self.prefixes.insert(prefix.clone(), uri.clone());
        self.namespaces.insert(uri, prefix);
    }

    /// Removes the entry identified by either its prefix or its URI.
    ///
    /// Returns the removed `(prefix, uri)` pair.
    pub fn remove(&mut self, name: &str) -> Result<(String, String), NamespaceError> {
        if let Some(uri) = self.prefixes.remove(name) {
            self.namespaces.remove(&uri);
            return Ok((name.to_owned(), uri));
        }
        if let Some(prefix) = self.namespaces.remove(name) {
            self.prefixes.remove(&prefix);
            return Ok((prefix, name.to_owned()));
        }
        Err(NamespaceError::NotFound(name.to_owned()))
    }

    /// Returns the URI bound to `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Returns the prefix bound to the namespace `uri`.
    pub fn prefix_of(&self, uri: &str) -> Option<&str> {
        self.namespaces.get(uri).map(String::as_str)
    }

    /// Iterates over all `(prefix, uri)` pairs, sorted by prefix.
    pub fn list(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }

    /// The number of registered prefixes.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether no prefix is registered.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Shortens `uri` to a CURIE using the longest registered namespace it starts with.
    ///
    /// URIs outside every registered namespace are returned unchanged.
    pub fn abbreviate<'a>(&self, uri: &'a str) -> Cow<'a, str> {
        let longest = self
            .namespaces
            .iter()
            .filter(|(namespace, _)| !namespace.is_empty() && uri.starts_with(namespace.as_str()))
            .max_by_key(|(namespace, _)| namespace.len());
        match longest {
            Some((namespace, prefix)) => {
                Cow::Owned(format!("{prefix}:{}", &uri[namespace.len()..]))
            }
            None => Cow::Borrowed(uri),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_contains_well_known_vocabularies() {
        let registry = NamespaceRegistry::default();
        assert_eq!(registry.len(), DEFAULT_NAMESPACES.len());
        assert_eq!(
            registry.get("rdf"),
            Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#")
        );
        assert_eq!(
            registry.abbreviate("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            "rdf:type"
        );
    }

    #[test]
    fn list_is_sorted_by_prefix() {
        let mut registry = NamespaceRegistry::empty();
        registry.add("zz", "http://z.example/");
        registry.add("aa", "http://a.example/");
        registry.add("mm", "http://m.example/");
        let prefixes = registry.list().map(|(p, _)| p).collect::<Vec<_>>();
        assert_eq!(prefixes, ["aa", "mm", "zz"]);
    }

    #[test]
    fn add_overwrites_and_keeps_mappings_inverse() {
        let mut registry = NamespaceRegistry::empty();
        registry.add("ex", "http://example.org/");
        registry.add("ex", "http://example.com/");
        assert_eq!(registry.get("ex"), Some("http://example.com/"));
        assert_eq!(registry.prefix_of("http://example.org/"), None);

        registry.add("other", "http://example.com/");
        assert_eq!(registry.get("ex"), None);
        assert_eq!(registry.prefix_of("http://example.com/"), Some("other"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_by_prefix_or_uri() {
        let mut registry = NamespaceRegistry::empty();
        registry.add("ex", "http://example.org/");
        registry.add("foaf", "http://xmlns.com/foaf/0.1/");

        let removed = registry.remove("ex").unwrap();
        assert_eq!(removed, ("ex".to_owned(), "http://example.org/".to_owned()));
        assert_eq!(registry.prefix_of("http://example.org/"), None);

        registry.remove("http://xmlns.com/foaf/0.1/").unwrap();
        assert_eq!(registry.get("foaf"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_unknown_name_fails() {
        let mut registry = NamespaceRegistry::default();
        let err = registry.remove("nope").unwrap_err();
        assert!(matches!(err, NamespaceError::NotFound(name) if name == "nope"));
        assert_eq!(registry.len(), DEFAULT_NAMESPACES.len());
    }

    #[test]
    fn abbreviate_prefers_longest_namespace() {
        let mut registry = NamespaceRegistry::empty();
        registry.add("ex", "http://example.org/");
        registry.add("sub", "http://example.org/sub/");
        assert_eq!(registry.abbreviate("http://example.org/sub/Thing"), "sub:Thing");
        assert_eq!(registry.abbreviate("http://example.org/Thing"), "ex:Thing");
    }

    #[test]
    fn abbreviate_only_replaces_the_leading_namespace() {
        let mut registry = NamespaceRegistry::empty();
        registry.add("ex", "http://example.org/");
        assert_eq!(
            registry.abbreviate("http://example.org/see/http://example.org/"),
            "ex:see/http://example.org/"
        );
    }
}
