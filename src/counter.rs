use thiserror::Error;

pub const COUNTER_STORAGE_KEY: &str = "latinify_conversion_count";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage error: {0}")]
    Js(String),
}

/// Device-scoped string storage.
pub trait CounterStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// `window.localStorage`, read and written as plain strings so values stay
/// compatible with what the page stored before.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or(StoreError::Unavailable)
}

impl CounterStore for BrowserStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        local_storage()?
            .get_item(key)
            .map_err(|err| StoreError::Js(format!("{err:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|err| StoreError::Js(format!("{err:?}")))
    }
}

pub struct ConversionCounter<S> {
    store: S,
    value: u64,
}

impl<S: CounterStore> ConversionCounter<S> {
    pub fn load(store: S) -> Self {
        let value = match store.read(COUNTER_STORAGE_KEY) {
            Ok(Some(raw)) => parse_count(&raw),
            Ok(None) => 0,
            Err(err) => {
                tracing::warn!("conversion counter read failed: {err}");
                0
            }
        };
        Self { store, value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn label(&self) -> String {
        format!("Konvertatsiyalar: {}", self.value())
    }

    /// Bumps the in-memory count first; persisting is best-effort.
    pub fn increment(&mut self) -> u64 {
        self.value = self.value.saturating_add(1);
        if let Err(err) = self
            .store
            .write(COUNTER_STORAGE_KEY, &self.value.to_string())
        {
            tracing::warn!("conversion counter write failed: {err}");
        }
        self.value
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }
}

fn parse_count(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(raw, "conversion counter value is not a number");
            0
        }
    }
}
