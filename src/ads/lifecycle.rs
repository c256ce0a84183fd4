use std::time::Duration;

use super::model::{Ad, AdView};

/// Rendering side of the ad modal.
pub trait ModalSurface {
    fn show(&mut self, view: &AdView);
    fn hide(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    NotScheduled,
    Scheduled,
    Shown,
    Dismissed,
}

/// Owns the display state for one page load. Every path to the modal goes
/// through `present`, so at most one ad is ever shown.
pub struct AdController<M> {
    surface: M,
    origin: String,
    state: ModalState,
    scheduled: Option<Ad>,
}

impl<M: ModalSurface> AdController<M> {
    pub fn new(surface: M, origin: impl Into<String>) -> Self {
        Self {
            surface,
            origin: origin.into(),
            state: ModalState::NotScheduled,
            scheduled: None,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    #[cfg(test)]
    pub fn surface(&self) -> &M {
        &self.surface
    }

    /// Accepts an ad only while nothing is scheduled yet. Returns the delay
    /// the caller should wait before calling `fire`.
    pub fn schedule(&mut self, ad: Ad) -> Option<Duration> {
        if self.state != ModalState::NotScheduled {
            tracing::debug!(state = ?self.state, "ad: ignoring second schedule");
            return None;
        }
        let delay = ad.delay;
        tracing::debug!(id = ?ad.id, ?delay, "ad: scheduled");
        self.scheduled = Some(ad);
        self.state = ModalState::Scheduled;
        Some(delay)
    }

    /// Timer path: presents the scheduled ad if it is still pending.
    pub fn fire(&mut self) -> bool {
        if self.state != ModalState::Scheduled {
            return false;
        }
        match self.scheduled.take() {
            Some(ad) => self.present(&ad),
            None => false,
        }
    }

    pub fn present(&mut self, ad: &Ad) -> bool {
        match self.state {
            ModalState::Shown | ModalState::Dismissed => return false,
            ModalState::NotScheduled | ModalState::Scheduled => {}
        }
        let view = AdView::for_ad(ad, &self.origin);
        self.surface.show(&view);
        self.scheduled = None;
        self.state = ModalState::Shown;
        tracing::info!(id = ?ad.id, image = %view.image_src, "ad: shown");
        true
    }

    pub fn dismiss(&mut self) -> bool {
        if self.state != ModalState::Shown {
            return false;
        }
        self.surface.hide();
        self.state = ModalState::Dismissed;
        tracing::debug!("ad: dismissed");
        true
    }
}
