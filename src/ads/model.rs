use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_ALT: &str = "Reklama";

#[derive(Debug, Error, PartialEq)]
pub enum AdError {
    #[error("ad payload has no image reference")]
    MissingImage,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AdEnvelope {
    #[serde(default)]
    pub ad: Option<AdPayload>,
}

/// Ad record as the backend sends it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AdPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub delay_seconds: Option<f64>,
}

/// A validated ad, ready to be scheduled.
#[derive(Clone, Debug, PartialEq)]
pub struct Ad {
    pub id: Option<i64>,
    pub image: String,
    pub title: String,
    pub redirect_url: Option<String>,
    pub delay: Duration,
}

impl TryFrom<AdPayload> for Ad {
    type Error = AdError;

    fn try_from(payload: AdPayload) -> Result<Self, Self::Error> {
        // image_url wins over image_path when both are present.
        let image = [payload.image_url, payload.image_path]
            .into_iter()
            .flatten()
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or(AdError::MissingImage)?;

        Ok(Self {
            id: payload.id,
            image,
            title: payload.title.unwrap_or_default(),
            redirect_url: payload
                .redirect_url
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            delay: delay_from_seconds(payload.delay_seconds),
        })
    }
}

/// Missing, negative and NaN delays mean "now"; delays too large for a
/// `Duration` saturate instead of wrapping to zero.
fn delay_from_seconds(seconds: Option<f64>) -> Duration {
    match seconds {
        Some(value) if value > 0.0 => {
            Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
        }
        _ => Duration::ZERO,
    }
}

/// What the modal renders for one ad.
#[derive(Clone, Debug, PartialEq)]
pub struct AdView {
    pub image_src: String,
    pub alt: String,
    pub title: String,
    pub href: Option<String>,
}

impl AdView {
    pub fn for_ad(ad: &Ad, origin: &str) -> Self {
        let alt = if ad.title.is_empty() {
            DEFAULT_ALT.to_string()
        } else {
            ad.title.clone()
        };
        Self {
            image_src: resolve_image(&ad.image, origin),
            alt,
            title: ad.title.clone(),
            href: ad.redirect_url.clone(),
        }
    }
}

/// Absolute references pass through; anything else is joined onto `origin`.
pub fn resolve_image(reference: &str, origin: &str) -> String {
    if Url::parse(reference).is_ok() {
        return reference.to_string();
    }
    match Url::parse(origin).and_then(|base| base.join(reference)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}{}", origin.trim_end_matches('/'), reference),
    }
}
