use dioxus::prelude::*;
use serde::Deserialize;

const HOSTED_API_BASE_URL: &str = "https://latinfy.onrender.com";
const DEFAULT_AD_FETCH_DELAY_MS: u64 = 1000;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub api_base_url: String,
    #[serde(default = "default_ad_fetch_delay_ms")]
    pub ad_fetch_delay_ms: u64,
}

fn default_ad_fetch_delay_ms() -> u64 {
    DEFAULT_AD_FETCH_DELAY_MS
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            ad_fetch_delay_ms: DEFAULT_AD_FETCH_DELAY_MS,
        }
    }
}

impl RuntimeConfig {
    /// Used when no config file is deployed next to the page. The static
    /// GitHub Pages build talks to the hosted backend, everything else is
    /// served by the backend itself.
    pub fn for_host(hostname: &str) -> Self {
        Self {
            api_base_url: api_base_for_host(hostname),
            ..Self::default()
        }
    }
}

pub fn api_base_for_host(hostname: &str) -> String {
    if hostname.contains("github.io") {
        HOSTED_API_BASE_URL.to_string()
    } else {
        String::new()
    }
}

pub fn use_runtime_config() -> Resource<Result<RuntimeConfig, String>> {
    use_resource(|| async move { fetch_runtime_config().await })
}

/// `location.origin` of the page, used to absolutize relative asset paths.
pub fn page_origin() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var("LATINIFY_PAGE_ORIGIN").unwrap_or_default()
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    for path in ["/config.json", "/assets/config.json"] {
        match fetch_config_from(path).await {
            Ok(config) => return Ok(config),
            Err(err) => tracing::debug!("{err}"),
        }
    }
    let hostname = web_sys::window()
        .and_then(|window| window.location().hostname().ok())
        .unwrap_or_default();
    Ok(RuntimeConfig::for_host(&hostname))
}

#[cfg(target_arch = "wasm32")]
async fn fetch_config_from(path: &str) -> Result<RuntimeConfig, String> {
    let response = gloo_net::http::Request::get(path)
        .send()
        .await
        .map_err(|err| format!("config fetch failed: {err}"))?;
    if !response.ok() {
        return Err(format!("config fetch failed: status {}", response.status()));
    }
    response
        .json::<RuntimeConfig>()
        .await
        .map_err(|err| format!("config decode failed: {err}"))
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    let hostname = std::env::var("LATINIFY_PAGE_HOST").unwrap_or_default();
    let mut config = RuntimeConfig::for_host(&hostname);
    if let Ok(api_base_url) = std::env::var("LATINIFY_API_BASE_URL") {
        config.api_base_url = api_base_url;
    }
    if let Ok(raw) = std::env::var("LATINIFY_AD_FETCH_DELAY_MS") {
        config.ad_fetch_delay_ms = raw
            .parse()
            .map_err(|_| format!("LATINIFY_AD_FETCH_DELAY_MS is not a number: {raw}"))?;
    }
    Ok(config)
}
