use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;

use super::fetcher::HttpAdSource;
use super::lifecycle::{AdController, ModalSurface};
use super::model::AdView;
use super::scheduler::{run_ad_flow, BrowserTimer, SharedController};
use crate::config::{page_origin, RuntimeConfig};

/// Modal backed by a signal the component renders from, plus the body
/// scroll lock.
#[derive(Clone, Copy)]
pub struct DomModal {
    view: Signal<Option<AdView>>,
}

impl DomModal {
    pub fn new(view: Signal<Option<AdView>>) -> Self {
        Self { view }
    }
}

impl ModalSurface for DomModal {
    fn show(&mut self, view: &AdView) {
        self.view.set(Some(view.clone()));
        set_body_overflow("hidden");
    }

    fn hide(&mut self) {
        self.view.set(None);
        set_body_overflow("auto");
    }
}

fn set_body_overflow(value: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let body = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body());
        if let Some(body) = body {
            let _ = body.style().set_property("overflow", value);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = value;
    }
}

#[component]
pub fn AdInterstitial() -> Element {
    let config = use_context::<RuntimeConfig>();
    let view = use_signal(|| None::<AdView>);
    let controller: SharedController<DomModal> =
        use_hook(|| Rc::new(RefCell::new(AdController::new(DomModal::new(view), page_origin()))));

    let flow_controller = controller.clone();
    use_future(move || {
        let controller = flow_controller.clone();
        let source = HttpAdSource::new(config.api_base_url.clone());
        let settle = Duration::from_millis(config.ad_fetch_delay_ms);
        async move {
            run_ad_flow(&source, &BrowserTimer, controller, settle).await;
        }
    });

    let Some(ad) = view() else {
        return rsx! {};
    };

    let on_close = controller.clone();
    let on_overlay = controller;

    rsx! {
        div {
            id: "adModal",
            class: "ad-modal",
            onclick: move |_| {
                on_overlay.borrow_mut().dismiss();
            },
            div {
                class: "ad-modal-content",
                onclick: move |event| event.stop_propagation(),
                button {
                    r#type: "button",
                    class: "ad-modal-close",
                    aria_label: "Yopish",
                    onclick: move |event| {
                        event.prevent_default();
                        event.stop_propagation();
                        on_close.borrow_mut().dismiss();
                    },
                    "×"
                }
                a {
                    class: "ad-modal-link",
                    href: ad.href.clone(),
                    target: "_blank",
                    rel: "noopener noreferrer",
                    img { class: "ad-modal-image", src: "{ad.image_src}", alt: "{ad.alt}" }
                }
                if !ad.title.is_empty() {
                    p { class: "ad-modal-title", "{ad.title}" }
                }
            }
        }
    }
}
