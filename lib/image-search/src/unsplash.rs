use crate::{
    Fetcher, HttpFetcher, ImageSearchProvider, Result, SearchError, SearchOutcome, Thumbnail,
    scrape, visible_count,
};
use image_effect::{RasterImage, codec};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use reqwest::Url;

pub const DEFAULT_ENDPOINT: &str = "https://unsplash.com/s/photos/";
pub const DEFAULT_MAX_RESULTS: usize = 40;
pub const DEFAULT_COLUMNS: usize = 3;

pub const FETCH_WARNING: &str = "Image Not Show Try Again";

/// Scrapes the Unsplash search page for `<img>` sources and downloads the
/// thumbnails that fit the column layout.
pub struct UnsplashSearch<F = HttpFetcher> {
    fetcher: F,
    endpoint: Url,
    max_results: usize,
    columns: usize,
    seed: Option<u64>,
}

impl UnsplashSearch<HttpFetcher> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher)
    }
}

impl Default for UnsplashSearch<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetcher> UnsplashSearch<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            // constant, always parses
            endpoint: Url::parse(DEFAULT_ENDPOINT).unwrap(),
            max_results: DEFAULT_MAX_RESULTS,
            columns: DEFAULT_COLUMNS,
            seed: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| SearchError::InvalidUrl(format!("{endpoint}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(SearchError::InvalidUrl(endpoint.to_string()));
        }

        self.endpoint = endpoint;
        Ok(self)
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Fixes the shuffle order.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Search page for `query`, the query becoming the last path segment.
    pub fn page_url(&self, query: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| SearchError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(query);
        Ok(url)
    }

    fn shuffle(&self, urls: &mut [Url]) {
        match self.seed {
            Some(seed) => urls.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => urls.shuffle(&mut rand::rng()),
        }
    }

    async fn fetch_thumbnail(&self, url: &Url) -> Result<RasterImage> {
        let bytes = self.fetcher.get(url).await?;
        codec::decode(&bytes).map_err(|e| SearchError::Decode {
            error: e,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> ImageSearchProvider for UnsplashSearch<F> {
    async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let page_url = self.page_url(query)?;
        let page = self.fetcher.get(&page_url).await?;
        let html = String::from_utf8_lossy(&page);

        let mut urls = scrape::extract_image_urls(&html, &page_url);
        urls.truncate(self.max_results);
        self.shuffle(&mut urls);
        urls.truncate(visible_count(urls.len(), self.columns));

        log::info!("search `{query}`: {} thumbnails to fetch", urls.len());

        let mut outcome = SearchOutcome::default();
        for url in urls {
            match self.fetch_thumbnail(&url).await {
                Ok(image) => outcome.thumbnails.push(Thumbnail { url, image }),
                Err(e) => {
                    log::warn!("{e}");
                    outcome.warning = Some(FETCH_WARNING.to_string());
                    break;
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoNetwork;

    #[async_trait::async_trait]
    impl Fetcher for NoNetwork {
        async fn get(&self, url: &Url) -> Result<Vec<u8>> {
            Err(SearchError::InvalidUrl(url.to_string()))
        }
    }

    #[test]
    fn test_page_url_encodes_query() {
        let search = UnsplashSearch::with_fetcher(NoNetwork);
        assert_eq!(
            search.page_url("cat").unwrap().as_str(),
            "https://unsplash.com/s/photos/cat"
        );
        assert_eq!(
            search.page_url("red cars/trucks?").unwrap().as_str(),
            "https://unsplash.com/s/photos/red%20cars%2Ftrucks%3F"
        );
    }

    #[test]
    fn test_custom_endpoint() {
        let search = UnsplashSearch::with_fetcher(NoNetwork)
            .with_endpoint("http://127.0.0.1:8080/search")
            .unwrap();
        assert_eq!(
            search.page_url("dog").unwrap().as_str(),
            "http://127.0.0.1:8080/search/dog"
        );

        assert!(matches!(
            UnsplashSearch::with_fetcher(NoNetwork).with_endpoint("mailto:someone"),
            Err(SearchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_seeded_shuffle_is_stable() {
        let urls: Vec<Url> = (0..10)
            .map(|i| Url::parse(&format!("https://e.com/{i}.jpg")).unwrap())
            .collect();
        let search = UnsplashSearch::with_fetcher(NoNetwork).with_seed(7);

        let mut a = urls.clone();
        let mut b = urls.clone();
        search.shuffle(&mut a);
        search.shuffle(&mut b);
        assert_eq!(a, b);

        a.sort_by(|x, y| x.as_str().cmp(y.as_str()));
        let mut sorted = urls;
        sorted.sort_by(|x, y| x.as_str().cmp(y.as_str()));
        assert_eq!(a, sorted);
    }
}
