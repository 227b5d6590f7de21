//! Selection of the RDF parser for a document.
//!
//! The decision is made from the declared content type and the locator path alone. Only the
//! best-effort [`ParserName::Guess`] parser looks at the bytes, when it is resolved to a concrete
//! syntax right before parsing.

use crate::error::UnknownFormatError;
use oxigraph::io::RdfFormat;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The closed set of parsers a document can be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserName {
    /// [RDF/XML](https://www.w3.org/TR/rdf-syntax-grammar/)
    RdfXml,
    /// [Turtle](https://www.w3.org/TR/turtle/)
    Turtle,
    /// [RDFa](https://www.w3.org/TR/rdfa-core/) embedded in HTML
    Rdfa,
    /// Auto-detection of the syntax from the content.
    Guess,
}

impl ParserName {
    /// The short name of the parser, e.g. `rdfxml`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::RdfXml => "rdfxml",
            Self::Turtle => "turtle",
            Self::Rdfa => "rdfa",
            Self::Guess => "guess",
        }
    }

    /// The concrete syntax this parser reads, if it is one the store can handle.
    pub const fn rdf_format(self) -> Option<RdfFormat> {
        match self {
            Self::RdfXml => Some(RdfFormat::RdfXml),
            Self::Turtle => Some(RdfFormat::Turtle),
            Self::Rdfa | Self::Guess => None,
        }
    }

    /// Replaces [`ParserName::Guess`] by the parser the content looks like it needs.
    #[must_use]
    pub fn resolve(self, data: &[u8]) -> Self {
        match self {
            Self::Guess => sniff_content(data),
            other => other,
        }
    }
}

impl fmt::Display for ParserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParserName {
    type Err = UnknownFormatError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "rdfxml" | "rdf+xml" | "xml" | "rdf" => Ok(Self::RdfXml),
            "turtle" | "ttl" => Ok(Self::Turtle),
            "rdfa" | "html" => Ok(Self::Rdfa),
            "guess" => Ok(Self::Guess),
            _ => Err(UnknownFormatError(name.to_owned())),
        }
    }
}

/// Picks the parser for a document from its declared content type and its locator path.
///
/// A missing or `text/plain` content type defers to the file extension of `locator`. Any other
/// content type is matched by prefix; unknown types select [`ParserName::Guess`] without looking
/// at the extension.
///
/// ```
/// use rdfmagic::{guess_parser_name, ParserName};
///
/// assert_eq!(guess_parser_name(None, "diane.ttl"), ParserName::Turtle);
/// assert_eq!(guess_parser_name(Some("application/rdf+xml"), "foo"), ParserName::RdfXml);
/// assert_eq!(guess_parser_name(Some("image/jpg"), "http://example.org/f.ttl"), ParserName::Guess);
/// ```
pub fn guess_parser_name(content_type: Option<&str>, locator: &str) -> ParserName {
    let Some(content_type) = content_type.map(|t| t.trim().to_ascii_lowercase()) else {
        return guess_parser_name_by_extension(locator);
    };
    if content_type.is_empty() || content_type.starts_with("text/plain") {
        guess_parser_name_by_extension(locator)
    } else if content_type.starts_with("application/rdf+xml") {
        ParserName::RdfXml
    } else if content_type.starts_with("application/x-turtle")
        || content_type.starts_with("text/turtle")
    {
        ParserName::Turtle
    } else if content_type.starts_with("text/html") {
        ParserName::Rdfa
    } else {
        ParserName::Guess
    }
}

/// Picks the parser for a document from the extension of its path.
pub fn guess_parser_name_by_extension(path: &str) -> ParserName {
    let extension = Path::new(path)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xml" | "rdf") => ParserName::RdfXml,
        Some("html" | "xhtml") => ParserName::Rdfa,
        Some("turtle" | "ttl") => ParserName::Turtle,
        _ => ParserName::Guess,
    }
}

/// Looks at the start of a document to decide which concrete parser it needs.
///
/// XML documents go to RDF/XML unless their root is HTML, HTML goes to RDFa, and everything
/// else is read as Turtle, which also covers N-Triples.
pub fn sniff_content(data: &[u8]) -> ParserName {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let head = data[start..]
        .iter()
        .take(512)
        .map(u8::to_ascii_lowercase)
        .collect::<Vec<_>>();

    if head.starts_with(b"<?xml") {
        if head.windows(5).any(|window| window == b"<html") {
            ParserName::Rdfa
        } else {
            ParserName::RdfXml
        }
    } else if head.starts_with(b"<rdf:rdf") {
        ParserName::RdfXml
    } else if head.starts_with(b"<!doctype html") || head.starts_with(b"<html") {
        ParserName::Rdfa
    } else {
        ParserName::Turtle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_without_content_type() {
        assert_eq!(guess_parser_name(None, "diane.ttl"), ParserName::Turtle);
        assert_eq!(guess_parser_name(None, "diane.turtle"), ParserName::Turtle);
        assert_eq!(guess_parser_name(None, "diane.html"), ParserName::Rdfa);
        assert_eq!(guess_parser_name(None, "/tmp/diane.xhtml"), ParserName::Rdfa);
        assert_eq!(guess_parser_name(None, "/tmp/diane.rdf"), ParserName::RdfXml);
        assert_eq!(guess_parser_name(None, "diane.xml"), ParserName::RdfXml);
        assert_eq!(guess_parser_name(None, "diane.nt"), ParserName::Guess);
        assert_eq!(guess_parser_name(None, "diane"), ParserName::Guess);
    }

    #[test]
    fn plain_text_defers_to_extension() {
        assert_eq!(
            guess_parser_name(Some("text/plain; charset=utf-8"), "/data/diane.ttl"),
            ParserName::Turtle
        );
        assert_eq!(guess_parser_name(Some("text/plain"), "/data/diane"), ParserName::Guess);
    }

    #[test]
    fn declared_content_type_wins() {
        assert_eq!(
            guess_parser_name(Some("application/rdf+xml"), "foo"),
            ParserName::RdfXml
        );
        assert_eq!(
            guess_parser_name(Some("application/rdf+xml; charset=utf-8"), "foo.ttl"),
            ParserName::RdfXml
        );
        assert_eq!(
            guess_parser_name(Some("application/x-turtle"), "foo.rdf"),
            ParserName::Turtle
        );
        assert_eq!(guess_parser_name(Some("text/turtle"), "foo"), ParserName::Turtle);
        assert_eq!(guess_parser_name(Some("Text/HTML"), "foo"), ParserName::Rdfa);
    }

    #[test]
    fn unknown_content_type_falls_back_to_guess() {
        assert_eq!(
            guess_parser_name(Some("image/jpg"), "http://example.org/f.ttl"),
            ParserName::Guess
        );
    }

    #[test]
    fn sniffing_picks_a_concrete_parser() {
        assert_eq!(
            sniff_content(b"\xEF\xBB\xBF  <?xml version=\"1.0\"?>\n<rdf:RDF/>"),
            ParserName::RdfXml
        );
        assert_eq!(sniff_content(b"<rdf:RDF xmlns:rdf=\"...\"/>"), ParserName::RdfXml);
        assert_eq!(sniff_content(b"<!DOCTYPE html><html></html>"), ParserName::Rdfa);
        assert_eq!(
            sniff_content(b"<?xml version=\"1.0\"?><html xmlns=\"http://www.w3.org/1999/xhtml\"/>"),
            ParserName::Rdfa
        );
        assert_eq!(
            sniff_content(b"<http://a.example/s> <http://a.example/p> \"o\" ."),
            ParserName::Turtle
        );
        assert_eq!(sniff_content(b""), ParserName::Turtle);
        assert_eq!(ParserName::Turtle.resolve(b"<?xml"), ParserName::Turtle);
    }

    #[test]
    fn names_round_trip() {
        for parser in [
            ParserName::RdfXml,
            ParserName::Turtle,
            ParserName::Rdfa,
            ParserName::Guess,
        ] {
            assert_eq!(parser.name().parse::<ParserName>().unwrap(), parser);
        }
        assert!("jpeg".parse::<ParserName>().is_err());
    }
}
