use crate::{Result, SearchError};
use once_cell::sync::Lazy;
use reqwest::{
    Client, Url,
    header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT},
};

const USER_AGENT_VALUE: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// Browser-like headers; the search pages refuse bare clients.
pub fn headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Plain GET over the shared client. No timeout is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        log::debug!("GET {url}");

        let response = HTTP_CLIENT
            .get(url.clone())
            .headers(headers())
            .send()
            .await
            .map_err(|e| SearchError::Network {
                error: e,
                url: url.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| SearchError::Network {
            error: e,
            url: url.to_string(),
        })?;

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let headers = headers();
        assert!(headers.contains_key("user-agent"));
        assert_eq!(headers[ACCEPT], "*/*");
        assert_eq!(headers[CACHE_CONTROL], "no-cache");
    }
}
