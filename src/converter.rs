use dioxus::html::FileData;
use dioxus::prelude::*;

use crate::api::{self, DocxConversion, TextConversion};
use crate::config::RuntimeConfig;
use crate::counter::{BrowserStore, ConversionCounter};
use crate::notice::{use_notices, Notices};

pub type SharedCounter = Signal<ConversionCounter<BrowserStore>>;

const MAX_DOCX_BYTES: u64 = 5 * 1024 * 1024;
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const DOCX_DIRECTIONS: [(&str, &str); 3] = [
    ("auto", "Avtomatik aniqlash"),
    ("latin_to_cyrillic", "Lotin → Kirill"),
    ("cyrillic_to_latin", "Kirill → Lotin"),
];

#[derive(Clone, Debug, PartialEq)]
enum TextState {
    Idle,
    Loading,
    Converted(TextConversion),
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
enum DocxState {
    Idle,
    Uploading,
    Done(DocxConversion),
}

#[component]
pub fn ConversionBadge() -> Element {
    let counter = use_context::<SharedCounter>();
    let label = counter.read().label();
    rsx! {
        span { id: "conversionCounter", class: "conversion-counter", "⟳ {label}" }
    }
}

#[component]
pub fn TextPanel() -> Element {
    let config = use_context::<RuntimeConfig>();
    let counter = use_context::<SharedCounter>();
    let notices = use_notices();
    let mut input = use_signal(String::new);
    let mut state = use_signal(|| TextState::Idle);

    let char_count = input.read().chars().count();
    let result_count = match &*state.read() {
        TextState::Converted(result) => result.converted.chars().count(),
        _ => 0,
    };
    let loading = matches!(*state.read(), TextState::Loading);

    let detect_base = config.api_base_url.clone();
    let latin_base = config.api_base_url.clone();
    let cyrillic_base = config.api_base_url;

    rsx! {
        section { class: "panel",
            h2 { "Matnni konvert qilish" }
            textarea {
                id: "inputText",
                class: "panel-input",
                placeholder: "Matnni shu yerga kiriting...",
                value: "{input}",
                oninput: move |event| input.set(event.value()),
            }
            p { class: "panel-meta", "Belgilar: {char_count}" }
            div { class: "panel-actions",
                button {
                    class: "panel-button ghost",
                    disabled: loading,
                    onclick: move |_| detect(detect_base.clone(), input(), notices),
                    "Aniqlash"
                }
                button {
                    class: "panel-button",
                    disabled: loading,
                    onclick: move |_| convert(cyrillic_base.clone(), input(), state, counter, notices),
                    "Kirillga"
                }
                button {
                    class: "panel-button",
                    disabled: loading,
                    onclick: move |_| convert(latin_base.clone(), input(), state, counter, notices),
                    "Lotinga"
                }
                button {
                    class: "panel-button ghost",
                    onclick: move |_| copy_result(state(), notices),
                    "Nusxa olish"
                }
                button {
                    class: "panel-button ghost",
                    onclick: move |_| {
                        input.set(String::new());
                        state.set(TextState::Idle);
                        let mut notices = notices;
                        notices.info("Barcha maydonlar tozalandi");
                    },
                    "Tozalash"
                }
            }
            div { id: "outputText", class: "panel-output",
                match state() {
                    TextState::Idle => rsx! { p { class: "panel-placeholder", "Natija shu yerda ko'rinadi..." } },
                    TextState::Loading => rsx! { p { class: "panel-loading", "Konvertatsiya jarayonida..." } },
                    TextState::Converted(result) => rsx! {
                        p { class: "panel-caption", "Asl matn:" }
                        p { class: "panel-original", "{result.original}" }
                        p { class: "panel-caption", "Konvertatsiya natijasi:" }
                        p { class: "panel-converted", "{result.converted}" }
                        p { class: "panel-meta", {direction_label(&result.direction)} }
                    },
                    TextState::Error(message) => rsx! { p { class: "panel-error", "{message}" } },
                }
            }
            p { class: "panel-meta", "Natija belgilari: {result_count}" }
        }
    }
}

fn detect(base_url: String, text: String, mut notices: Notices) {
    let text = text.trim().to_string();
    if text.is_empty() {
        notices.warning("Matn kiriting");
        return;
    }
    spawn(async move {
        match api::convert_text(&base_url, &text).await {
            Ok(result) => notices.info(detection_message(&result.direction)),
            Err(err) => {
                tracing::warn!("alphabet detection failed: {err}");
                notices.error("Xatolik yuz berdi");
            }
        }
    });
}

/// The backend picks the direction from the input itself, so both convert
/// buttons hit the same endpoint.
fn convert(
    base_url: String,
    text: String,
    mut state: Signal<TextState>,
    mut counter: SharedCounter,
    mut notices: Notices,
) {
    let text = text.trim().to_string();
    if text.is_empty() {
        notices.warning("Matn kiriting");
        return;
    }
    state.set(TextState::Loading);
    spawn(async move {
        match api::convert_text(&base_url, &text).await {
            Ok(result) => {
                state.set(TextState::Converted(result));
                counter.write().increment();
                notices.success("Matn muvaffaqiyatli konvert qilindi!");
            }
            Err(err) => {
                tracing::warn!("text conversion failed: {err}");
                state.set(TextState::Error(format!("Konvertatsiya xatosi: {err}")));
                notices.error("Xatolik yuz berdi");
            }
        }
    });
}

fn copy_result(state: TextState, mut notices: Notices) {
    let TextState::Converted(result) = state else {
        notices.warning("Nusxa olish uchun matn yo'q");
        return;
    };
    spawn(async move {
        match write_clipboard(&result.converted).await {
            Ok(()) => notices.success("Natija nusxalandi!"),
            Err(err) => {
                tracing::warn!("clipboard write failed: {err}");
                notices.error("Nusxa olish xatosi");
            }
        }
    });
}

async fn write_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("clipboard unavailable")?;
    let clipboard = window.navigator().clipboard();
    let promise = clipboard.write_text(text);
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|_| "clipboard write failed")?;
    Ok(())
}

#[component]
pub fn DocxPanel() -> Element {
    let config = use_context::<RuntimeConfig>();
    let counter = use_context::<SharedCounter>();
    let mut notices = use_notices();
    let mut file = use_signal(|| None::<FileData>);
    let mut direction = use_signal(|| "auto".to_string());
    let mut state = use_signal(|| DocxState::Idle);

    let uploading = matches!(*state.read(), DocxState::Uploading);
    let base_url = config.api_base_url;
    let download_base = base_url.clone();

    rsx! {
        section { class: "panel",
            h2 { "DOCX faylni konvert qilish" }
            label { class: "panel-label", "Fayl (.docx, 5MB gacha)" }
            input {
                id: "docxFile",
                r#type: "file",
                accept: ".docx",
                class: "panel-input",
                onchange: move |event| {
                    let Some(selected) = event.files().into_iter().next() else {
                        return;
                    };
                    match validate_docx(&selected.name(), selected.size()) {
                        Ok(()) => {
                            file.set(Some(selected));
                            state.set(DocxState::Idle);
                            notices.success("Fayl muvaffaqiyatli yuklandi");
                        }
                        Err(message) => notices.error(message),
                    }
                }
            }
            match file() {
                Some(selected) => rsx! {
                    div { id: "selectedFileInfo", class: "panel-file",
                        span { class: "panel-file-name", {selected.name()} }
                        span { class: "panel-meta", {format_file_size(selected.size())} }
                        button {
                            class: "panel-button ghost",
                            onclick: move |_| {
                                file.set(None);
                                state.set(DocxState::Idle);
                            },
                            "O'chirish"
                        }
                    }
                },
                None => rsx! {},
            }
            label { class: "panel-label", "Yo'nalish" }
            select {
                id: "docxDirection",
                class: "panel-input",
                value: "{direction}",
                onchange: move |event| direction.set(event.value()),
                for (value, label) in DOCX_DIRECTIONS {
                    option { value: value, "{label}" }
                }
            }
            button {
                id: "convertDocxBtn",
                class: "panel-button",
                disabled: file.read().is_none() || uploading,
                onclick: move |_| convert_docx(base_url.clone(), file(), direction(), state, counter, notices),
                if uploading { "Konvertatsiya jarayonida..." } else { "Faylni konvert qilish" }
            }
            match state() {
                DocxState::Done(result) => rsx! {
                    div { id: "conversionResult", class: "panel-result",
                        p { "{result.message}" }
                        a {
                            class: "panel-button",
                            href: api::download_url(&download_base, &result.file_id),
                            download: "{result.filename}",
                            "Yuklab olish"
                        }
                        button {
                            class: "panel-button ghost",
                            onclick: move |_| {
                                file.set(None);
                                state.set(DocxState::Idle);
                            },
                            "Boshqa fayl"
                        }
                    }
                },
                _ => rsx! {},
            }
        }
    }
}

fn convert_docx(
    base_url: String,
    file: Option<FileData>,
    direction: String,
    mut state: Signal<DocxState>,
    mut counter: SharedCounter,
    mut notices: Notices,
) {
    let Some(file) = file else {
        notices.warning("Fayl tanlang");
        return;
    };
    state.set(DocxState::Uploading);
    spawn(async move {
        let outcome = match file.read_bytes().await {
            Ok(bytes) => api::upload_docx(&base_url, &file.name(), bytes.as_ref(), &direction)
                .await
                .map_err(|err| err.to_string()),
            Err(_) => Err("Faylni o'qib bo'lmadi".to_string()),
        };
        match outcome {
            Ok(result) => {
                state.set(DocxState::Done(result));
                counter.write().increment();
                notices.success("DOCX fayl muvaffaqiyatli konvert qilindi!");
            }
            Err(message) => {
                tracing::warn!("docx conversion failed: {message}");
                state.set(DocxState::Idle);
                notices.error(format!("Konvertatsiya xatosi: {message}"));
            }
        }
    });
}

fn validate_docx(name: &str, size: u64) -> Result<(), &'static str> {
    if !name.to_lowercase().ends_with(".docx") {
        return Err("Faqat .docx fayllarni yuklash mumkin");
    }
    if size > MAX_DOCX_BYTES {
        return Err("Fayl hajmi 5MB dan oshmasligi kerak");
    }
    Ok(())
}

fn format_file_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, SIZE_UNITS[unit])
    } else {
        format!("{rounded:.1} {}", SIZE_UNITS[unit])
    }
}

fn direction_label(direction: &str) -> &'static str {
    if direction == "latin_to_cyrillic" {
        "Lotin → Kirill"
    } else {
        "Kirill → Lotin"
    }
}

fn detection_message(direction: &str) -> &'static str {
    match direction {
        "latin_to_cyrillic" => "Matn Lotin alifbosida. Kirillga o'tkazish mumkin.",
        "cyrillic_to_latin" => "Matn Kirill alifbosida. Lotinga o'tkazish mumkin.",
        _ => "Alifbo aniqlanmadi.",
    }
}
