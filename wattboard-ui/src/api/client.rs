//! HTTP API Client
//!
//! `gloo-net` implementation of the dashboard's [`Backend`] seam, plus the
//! lookups that locate the dashboard config in the page.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;
use wattboard::{ApiConfig, Backend, FetchError, FetchResult};

/// Id of the inline `<script type="application/toml">` holding the config
pub const CONFIG_ELEMENT_ID: &str = "wattboard-config";

/// Local storage key overriding `api.base_url`
pub const API_URL_KEY: &str = "wattboard_api_url";

/// Read the inline config document, if the page has one
pub fn config_source() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
    element.text_content().filter(|text| !text.trim().is_empty())
}

/// Apply the local storage API URL override, if set
pub fn apply_api_override(api: &mut ApiConfig) {
    let stored = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten());

    if let Some(url) = stored {
        tracing::info!(%url, "Using API URL from local storage");
        api.base_url = url.trim_end_matches('/').to_string();
    }
}

/// Backend reached over `fetch`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    api: ApiConfig,
}

impl HttpBackend {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn get_json(&self, path: &str) -> FetchResult<Value> {
        let url = self.api.url(path);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(FetchError::Http {
                status: response.status(),
                path: path.to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}
