use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use gloo_timers::future::TimeoutFuture;

use super::fetcher::{fetch_ad, AdSource};
use super::lifecycle::{AdController, ModalState, ModalSurface};

pub type SharedController<M> = Rc<RefCell<AdController<M>>>;

/// One-shot delay. The returned future resolves once and cannot be cancelled;
/// whatever runs after it must be guarded by the controller.
pub trait Timer {
    fn after(&self, delay: Duration) -> LocalBoxFuture<'static, ()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn after(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
        async move {
            for chunk in timeout_chunks(delay) {
                TimeoutFuture::new(chunk).await;
            }
        }
        .boxed_local()
    }
}

/// `setTimeout` takes a signed 32-bit delay; anything larger fires at once.
const MAX_TIMEOUT_MS: u32 = i32::MAX as u32;

/// Splits a delay into `setTimeout`-sized pieces, rounded up so the timer
/// never resolves early. A zero delay still yields one zero-length wait.
fn timeout_chunks(delay: Duration) -> impl Iterator<Item = u32> {
    let mut remaining = delay.as_micros().div_ceil(1000);
    let mut started = false;
    std::iter::from_fn(move || {
        if started && remaining == 0 {
            return None;
        }
        started = true;
        let chunk = remaining.min(u128::from(MAX_TIMEOUT_MS)) as u32;
        remaining -= u128::from(chunk);
        Some(chunk)
    })
}

/// The whole ad protocol for one page load: wait for the page to settle,
/// ask for an ad once, arm a single timer, then present through the guard.
/// Returns whether this call put the ad on screen.
pub async fn run_ad_flow<S, T, M>(
    source: &S,
    timer: &T,
    controller: SharedController<M>,
    settle: Duration,
) -> bool
where
    S: AdSource + ?Sized,
    T: Timer + ?Sized,
    M: ModalSurface,
{
    if !settle.is_zero() {
        timer.after(settle).await;
    }
    if controller.borrow().state() != ModalState::NotScheduled {
        return false;
    }

    let Some(ad) = fetch_ad(source).await else {
        return false;
    };
    let Some(delay) = controller.borrow_mut().schedule(ad) else {
        return false;
    };

    timer.after(delay).await;
    let shown = controller.borrow_mut().fire();
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::fetcher::tests::{promo_payload, FakeSource};
    use crate::ads::lifecycle::tests::{promo, RecordingSurface};
    use crate::api::ApiError;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use pretty_assertions::assert_eq;
    use std::task::{Poll, Waker};

    const ORIGIN: &str = "https://latinify.test";

    #[derive(Default)]
    struct Clock {
        now: Duration,
        armed: Vec<Duration>,
        waiting: Vec<Waker>,
    }

    /// Timer driven by hand from the test.
    #[derive(Clone, Default)]
    struct ManualTimer(Rc<RefCell<Clock>>);

    impl ManualTimer {
        fn advance_to(&self, at: Duration) {
            let waiting = {
                let mut clock = self.0.borrow_mut();
                clock.now = at;
                std::mem::take(&mut clock.waiting)
            };
            for waker in waiting {
                waker.wake();
            }
        }

        fn armed(&self) -> Vec<Duration> {
            self.0.borrow().armed.clone()
        }
    }

    impl Timer for ManualTimer {
        fn after(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
            let clock = self.0.clone();
            let deadline = {
                let mut state = clock.borrow_mut();
                state.armed.push(delay);
                state.now + delay
            };
            futures::future::poll_fn(move |cx| {
                let mut state = clock.borrow_mut();
                if state.now >= deadline {
                    Poll::Ready(())
                } else {
                    state.waiting.push(cx.waker().clone());
                    Poll::Pending
                }
            })
            .boxed_local()
        }
    }

    struct Page {
        pool: LocalPool,
        timer: ManualTimer,
        controller: SharedController<RecordingSurface>,
        source: Rc<FakeSource>,
    }

    impl Page {
        fn load(reply: Result<Option<crate::ads::model::AdPayload>, ApiError>, settle: Duration) -> Self {
            let mut page = Self {
                pool: LocalPool::new(),
                timer: ManualTimer::default(),
                controller: Rc::new(RefCell::new(AdController::new(
                    RecordingSurface::default(),
                    ORIGIN,
                ))),
                source: Rc::new(FakeSource::replying(reply)),
            };
            let timer = page.timer.clone();
            let controller = page.controller.clone();
            let source = page.source.clone();
            page.pool
                .spawner()
                .spawn_local(async move {
                    run_ad_flow(source.as_ref(), &timer, controller, settle).await;
                })
                .unwrap();
            // Let the flow arm its first timer at t=0.
            page.pool.run_until_stalled();
            page
        }

        fn at(&mut self, seconds: f64) -> ModalState {
            self.timer.advance_to(Duration::from_secs_f64(seconds));
            self.pool.run_until_stalled();
            self.controller.borrow().state()
        }

        fn shown(&self) -> usize {
            self.controller.borrow().surface().shown.len()
        }
    }

    #[test]
    fn presents_exactly_at_delay() {
        let mut page = Page::load(Ok(Some(promo_payload())), Duration::ZERO);
        assert_eq!(page.at(0.0), ModalState::Scheduled);
        assert_eq!(page.at(2.999), ModalState::Scheduled);
        assert_eq!(page.shown(), 0);

        assert_eq!(page.at(3.0), ModalState::Shown);
        let controller = page.controller.borrow();
        let view = &controller.surface().shown[0];
        assert_eq!(view.image_src, format!("{ORIGIN}/ads/1.png"));
        assert_eq!(view.title, "Promo");
        assert_eq!(view.href.as_deref(), Some("https://x.test"));
    }

    #[test]
    fn zero_delay_fires_on_next_turn() {
        let mut payload = promo_payload();
        payload.delay_seconds = Some(0.0);
        let mut page = Page::load(Ok(Some(payload)), Duration::ZERO);
        assert_eq!(page.at(0.0), ModalState::Shown);
        assert_eq!(page.shown(), 1);
    }

    #[test]
    fn no_ad_arms_no_timer() {
        let mut page = Page::load(Ok(None), Duration::ZERO);
        assert_eq!(page.at(0.0), ModalState::NotScheduled);
        assert_eq!(page.at(60.0), ModalState::NotScheduled);
        assert!(page.timer.armed().is_empty());
        assert_eq!(page.source.calls(), 1);
    }

    #[test]
    fn failed_fetch_arms_no_timer() {
        let mut page = Page::load(Err(ApiError::Decode("bad json".to_string())), Duration::ZERO);
        assert_eq!(page.at(10.0), ModalState::NotScheduled);
        assert!(page.timer.armed().is_empty());
    }

    #[test]
    fn imageless_ad_is_never_presented() {
        let mut payload = promo_payload();
        payload.image_url = None;
        payload.image_path = Some(String::new());
        let mut page = Page::load(Ok(Some(payload)), Duration::ZERO);
        assert_eq!(page.at(10.0), ModalState::NotScheduled);
        assert_eq!(page.shown(), 0);
    }

    #[test]
    fn waits_for_settle_before_fetching() {
        let mut page = Page::load(Ok(Some(promo_payload())), Duration::from_secs(1));
        assert_eq!(page.at(0.5), ModalState::NotScheduled);
        assert_eq!(page.source.calls(), 0);

        assert_eq!(page.at(1.0), ModalState::Scheduled);
        assert_eq!(page.source.calls(), 1);
        assert_eq!(page.timer.armed(), vec![Duration::from_secs(1), Duration::from_secs(3)]);

        assert_eq!(page.at(3.999), ModalState::Scheduled);
        assert_eq!(page.at(4.0), ModalState::Shown);
    }

    #[test]
    fn timer_after_direct_present_is_noop() {
        let mut page = Page::load(Ok(Some(promo_payload())), Duration::ZERO);
        assert_eq!(page.at(1.0), ModalState::Scheduled);

        assert!(page.controller.borrow_mut().present(&promo(Duration::ZERO)));
        assert_eq!(page.at(3.0), ModalState::Shown);
        assert_eq!(page.shown(), 1);
    }

    #[test]
    fn timer_after_dismiss_does_not_reopen() {
        let mut page = Page::load(Ok(Some(promo_payload())), Duration::ZERO);
        assert_eq!(page.at(3.0), ModalState::Shown);
        assert!(page.controller.borrow_mut().dismiss());
        assert!(!page.controller.borrow_mut().dismiss());

        assert_eq!(page.at(100.0), ModalState::Dismissed);
        assert_eq!(page.shown(), 1);
        assert_eq!(page.controller.borrow().surface().hides, 1);
    }

    fn chunks(delay: Duration) -> Vec<u32> {
        timeout_chunks(delay).collect()
    }

    #[test]
    fn rounds_timeouts_up() {
        assert_eq!(chunks(Duration::ZERO), vec![0]);
        assert_eq!(chunks(Duration::from_micros(1500)), vec![2]);
        assert_eq!(chunks(Duration::from_secs(3)), vec![3000]);
    }

    #[test]
    fn splits_month_long_delay_into_safe_timeouts() {
        let month = Duration::from_secs(30 * 24 * 60 * 60);
        let pieces = chunks(month);
        assert_eq!(pieces, vec![MAX_TIMEOUT_MS, 2_592_000_000 - MAX_TIMEOUT_MS]);
        assert!(pieces.iter().all(|&ms| i32::try_from(ms).is_ok()));
        let total: u64 = pieces.iter().map(|&ms| u64::from(ms)).sum();
        assert_eq!(total, 2_592_000_000);
    }

    #[test]
    fn saturated_delay_never_yields_negative_timeout() {
        let mut pieces = timeout_chunks(Duration::MAX);
        for _ in 0..1000 {
            let ms = pieces.next().unwrap();
            assert_eq!(ms, MAX_TIMEOUT_MS);
        }
    }
}
