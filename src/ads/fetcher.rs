use async_trait::async_trait;

use super::model::{Ad, AdPayload};
use crate::api::{self, ApiError};

/// Backend collaborator answering "is there an ad for this visit".
#[async_trait(?Send)]
pub trait AdSource {
    async fn current_ad(&self) -> Result<Option<AdPayload>, ApiError>;
}

#[derive(Clone, Debug)]
pub struct HttpAdSource {
    base_url: String,
}

impl HttpAdSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl AdSource for HttpAdSource {
    async fn current_ad(&self) -> Result<Option<AdPayload>, ApiError> {
        Ok(api::fetch_current_ad(&self.base_url).await?.ad)
    }
}

/// Asks the source once. Failures and unusable payloads are logged and read
/// as "no ad".
pub async fn fetch_ad<S: AdSource + ?Sized>(source: &S) -> Option<Ad> {
    let payload = match source.current_ad().await {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            tracing::debug!("ad: none available");
            return None;
        }
        Err(err) => {
            tracing::warn!("ad check failed: {err}");
            return None;
        }
    };
    match Ad::try_from(payload) {
        Ok(ad) => Some(ad),
        Err(err) => {
            tracing::warn!("ad dropped: {err}");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    pub(crate) struct FakeSource {
        reply: RefCell<Option<Result<Option<AdPayload>, ApiError>>>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        pub(crate) fn replying(reply: Result<Option<AdPayload>, ApiError>) -> Self {
            Self {
                reply: RefCell::new(Some(reply)),
                calls: Cell::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    #[async_trait(?Send)]
    impl AdSource for FakeSource {
        async fn current_ad(&self) -> Result<Option<AdPayload>, ApiError> {
            self.calls.set(self.calls.get() + 1);
            self.reply.borrow_mut().take().unwrap_or(Ok(None))
        }
    }

    pub(crate) fn promo_payload() -> AdPayload {
        AdPayload {
            id: Some(1),
            image_url: Some("/ads/1.png".to_string()),
            image_path: None,
            title: Some("Promo".to_string()),
            redirect_url: Some("https://x.test".to_string()),
            delay_seconds: Some(3.0),
        }
    }

    #[test]
    fn returns_valid_ad() {
        let source = FakeSource::replying(Ok(Some(promo_payload())));
        let ad = block_on(fetch_ad(&source)).unwrap();
        assert_eq!(ad.title, "Promo");
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn transport_failure_reads_as_no_ad() {
        let source = FakeSource::replying(Err(ApiError::Transport("offline".to_string())));
        assert!(block_on(fetch_ad(&source)).is_none());
    }

    #[test]
    fn status_failure_reads_as_no_ad() {
        let source = FakeSource::replying(Err(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }));
        assert!(block_on(fetch_ad(&source)).is_none());
    }

    #[test]
    fn imageless_payload_is_dropped() {
        let mut payload = promo_payload();
        payload.image_url = None;
        let source = FakeSource::replying(Ok(Some(payload)));
        assert!(block_on(fetch_ad(&source)).is_none());
    }
}
