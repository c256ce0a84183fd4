use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use gloo_timers::future::TimeoutFuture;

#[cfg(target_arch = "wasm32")]
const NOTICE_TTL_MS: u32 = 5000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    fn class(self) -> &'static str {
        match self {
            Self::Info => "notice info",
            Self::Success => "notice success",
            Self::Warning => "notice warning",
            Self::Error => "notice error",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✔",
            Self::Warning => "⚠",
            Self::Error => "✖",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Notice {
    id: u64,
    kind: NoticeKind,
    message: String,
}

/// One notice at a time; a new one replaces whatever is on screen.
#[derive(Clone, Copy, PartialEq)]
pub struct Notices {
    current: Signal<Option<Notice>>,
    issued: Signal<u64>,
}

impl Notices {
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let id = self.issued.peek().wrapping_add(1);
        self.issued.set(id);
        self.current.set(Some(Notice {
            id,
            kind,
            message: message.into(),
        }));

        #[cfg(target_arch = "wasm32")]
        {
            let mut current = self.current;
            spawn(async move {
                TimeoutFuture::new(NOTICE_TTL_MS).await;
                let expired = matches!(&*current.peek(), Some(notice) if notice.id == id);
                if expired {
                    current.set(None);
                }
            });
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message);
    }
}

pub fn provide_notices() -> Notices {
    use_context_provider(|| Notices {
        current: Signal::new(None),
        issued: Signal::new(0),
    })
}

pub fn use_notices() -> Notices {
    use_context::<Notices>()
}

#[component]
pub fn NoticeBanner() -> Element {
    let notices = use_notices();
    let Some(notice) = notices.current.cloned() else {
        return rsx! {};
    };

    rsx! {
        div { class: notice.kind.class(), role: "status",
            span { class: "notice-icon", {notice.kind.icon()} }
            span { class: "notice-message", "{notice.message}" }
        }
    }
}
