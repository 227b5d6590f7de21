use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::fetch::{Fetch, HttpFetcher};
use crate::format::guess_parser_name;
use crate::model::Model;
use crate::source::Locator;
use std::fs::File;
use std::io::Read;

/// Loads documents identified by [`Locator`]s into a [`Model`].
///
/// `file:` locators are read from disk, `http:` and `https:` locators go through the [`Fetch`]
/// implementation. Loads are strictly sequential, so triples of several sources end up in the
/// model in the order the sources were given.
#[derive(Debug, Clone)]
pub struct Loader<F = HttpFetcher> {
    fetcher: F,
}

impl Loader<HttpFetcher> {
    /// Creates a loader fetching remote documents over HTTP.
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        Ok(Self::with_fetcher(HttpFetcher::new(config)?))
    }
}

impl<F: Fetch> Loader<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Loads the document at `locator` into `model`.
    ///
    /// The triples are added to whatever the model already contains. Returns how many triples
    /// the document held, counting those the model already had.
    pub fn load(&self, model: &Model, locator: &Locator) -> Result<usize, LoaderError> {
        let (content_type, mut stream) = self.open(locator)?;
        let parser = guess_parser_name(content_type.as_deref(), locator.path());
        tracing::debug!(%locator, ?content_type, %parser, "Selected parser");

        let mut body = Vec::new();
        let read = stream.read_to_end(&mut body);
        drop(stream);
        read?;

        let loaded = model.parse(&body, parser, locator.as_str())?;
        tracing::info!(%locator, loaded, "Loaded source");
        Ok(loaded)
    }

    /// Loads every locator in order, stopping at the first failure.
    pub fn load_all<'a>(
        &self,
        model: &Model,
        locators: impl IntoIterator<Item = &'a Locator>,
    ) -> Result<usize, LoaderError> {
        let mut loaded = 0;
        for locator in locators {
            loaded += self.load(model, locator)?;
        }
        Ok(loaded)
    }

    fn open(&self, locator: &Locator) -> Result<(Option<String>, Box<dyn Read>), LoaderError> {
        match locator.scheme() {
            "file" => {
                let path = locator.to_file_path()?;
                if !path.exists() {
                    return Err(LoaderError::NotFound(path));
                }
                Ok((None, Box::new(File::open(path)?)))
            }
            "http" | "https" => {
                let response = self.fetcher.fetch(locator.url())?;
                if !response.is_success() {
                    return Err(LoaderError::HttpStatus {
                        locator: locator.to_string(),
                        status: response.status,
                    });
                }
                Ok((response.content_type, response.body))
            }
            scheme => Err(LoaderError::UnsupportedScheme {
                scheme: scheme.to_owned(),
                locator: locator.to_string(),
            }),
        }
    }
}
