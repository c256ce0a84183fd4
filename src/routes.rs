use dioxus::prelude::*;
use dioxus_router::{Link, Routable, Router};

use crate::ads::AdInterstitial;
use crate::config::use_runtime_config;
use crate::converter::{ConversionBadge, DocxPanel, TextPanel};
use crate::counter::{BrowserStore, ConversionCounter};
use crate::notice::{provide_notices, NoticeBanner};

const MAIN_CSS: Asset = asset!("/assets/main.css");

#[component]
pub fn App() -> Element {
    let config_resource = use_runtime_config();
    let config = match config_resource() {
        None => {
            return rsx! {
                document::Title { "Latinify" }
                div { class: "page loading",
                    h1 { "Yuklanmoqda..." }
                }
            }
        }
        Some(Ok(config)) => config,
        Some(Err(message)) => {
            return rsx! {
                document::Title { "Latinify" }
                div { class: "page loading",
                    h1 { "Sozlamalarni yuklab bo'lmadi" }
                    p { "{message}" }
                }
            }
        }
    };

    use_context_provider(|| config);
    use_context_provider(|| Signal::new(ConversionCounter::load(BrowserStore)));
    provide_notices();

    rsx! {
        document::Title { "Latinify" }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}

#[derive(Clone, PartialEq, Routable)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

#[component]
fn Home() -> Element {
    rsx! {
        div { class: "page",
            header { class: "page-header",
                h1 { "Latinify" }
                p { class: "page-subtitle", "O'zbek matnini Lotin va Kirill alifbolari o'rtasida konvert qiling" }
                ConversionBadge {}
            }
            NoticeBanner {}
            main { class: "page-body",
                TextPanel {}
                DocxPanel {}
            }
            AdInterstitial {}
        }
    }
}

#[component]
fn NotFound(route: Vec<String>) -> Element {
    let path = format!("/{}", route.join("/"));
    rsx! {
        div { class: "page",
            h1 { "404" }
            p { "Sahifa topilmadi: {path}" }
            Link { to: Route::Home {}, class: "panel-button", "Bosh sahifa" }
        }
    }
}
