pub mod http;
pub mod scrape;
pub mod unsplash;

pub use http::{Fetcher, HttpFetcher};
pub use reqwest::Url;
pub use unsplash::UnsplashSearch;

use image_effect::RasterImage;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("HTTP request {url} failed. Error: {error}")]
    Network { error: reqwest::Error, url: String },

    #[error("HTTP request {url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to decode {url}. Error: {error}")]
    Decode {
        error: image_effect::ImageEffectError,
        url: String,
    },
}

#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub url: Url,
    pub image: RasterImage,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub thumbnails: Vec<Thumbnail>,

    /// Set when fetching stopped early; `thumbnails` holds what came in before.
    pub warning: Option<String>,
}

impl SearchOutcome {
    /// Distributes thumbnails over `columns` columns, thumbnail `j` going to
    /// column `j % columns`.
    pub fn columns(&self, columns: usize) -> Vec<Vec<&Thumbnail>> {
        let columns = columns.max(1);
        let mut layout = vec![Vec::new(); columns];
        for (j, thumbnail) in self.thumbnails.iter().enumerate() {
            layout[j % columns].push(thumbnail);
        }
        layout
    }
}

/// Number of results shown when `found` results are laid out over `columns`
/// equally filled columns. The remainder is dropped.
pub fn visible_count(found: usize, columns: usize) -> usize {
    let columns = columns.max(1);
    (found / columns) * columns
}

#[async_trait::async_trait]
pub trait ImageSearchProvider: Send + Sync {
    /// Runs one search. Failing to load the results page is an error; a
    /// failing thumbnail ends the search with a warning instead.
    async fn search(&self, query: &str) -> Result<SearchOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_effect::Channels;

    fn thumbnail(i: u8) -> Thumbnail {
        Thumbnail {
            url: Url::parse(&format!("https://images.example.com/{i}.jpg")).unwrap(),
            image: RasterImage::filled(1, 1, Channels::Gray, &[i]).unwrap(),
        }
    }

    #[test]
    fn test_visible_count() {
        assert_eq!(visible_count(40, 3), 39);
        assert_eq!(visible_count(9, 3), 9);
        assert_eq!(visible_count(2, 3), 0);
        assert_eq!(visible_count(0, 3), 0);
        assert_eq!(visible_count(5, 0), 5);
    }

    #[test]
    fn test_columns_round_robin() {
        let outcome = SearchOutcome {
            thumbnails: (0..7).map(thumbnail).collect(),
            warning: None,
        };

        let layout = outcome.columns(3);
        assert_eq!(layout.len(), 3);
        let ids: Vec<Vec<u8>> = layout
            .iter()
            .map(|col| col.iter().map(|t| t.image.samples()[0]).collect())
            .collect();
        assert_eq!(ids, vec![vec![0, 3, 6], vec![1, 4], vec![2, 5]]);
    }
}
