use crate::config::FeedConfig;
use crate::error::FeedError;
use reqwest::{Client, StatusCode};
use std::future::Future;
use tracing::{error, trace};
use url::Url;

/// Build the shared HTTP client every provider sends its requests through.
pub fn http_client(config: &FeedConfig) -> Result<Client, FeedError> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

pub trait ClientExt {
    fn get_raw(&self, url: Url) -> impl Future<Output = Result<(StatusCode, Vec<u8>), FeedError>> + Send;
}

/// Add-on methods for [`reqwest::Client`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
impl ClientExt for Client {
    /// GET `url` and return the status with the raw body. Vendors put error
    /// details in the body of non-2xx responses, so the status is not turned
    /// into an error here.
    async fn get_raw(&self, url: Url) -> Result<(StatusCode, Vec<u8>), FeedError> {
        trace!("GET {}", redact(&url));
        let response = self.get(url.clone()).send().await.map_err(|e| {
            error!("request error: {e}\nURL: {}", redact(&url));
            e
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("body read error: {e}\nURL: {}", redact(&url));
            e
        })?;
        trace!("{status} ({} bytes) from {}", body.len(), redact(&url));

        Ok((status, body.to_vec()))
    }
}

/// Hide credentials before a URL reaches the logs.
pub(crate) fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if !pairs.is_empty() {
        shown.query_pairs_mut().clear().extend_pairs(pairs);
    }
    shown.to_string()
}
