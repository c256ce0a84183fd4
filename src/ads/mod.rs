pub mod fetcher;
pub mod lifecycle;
pub mod modal;
pub mod model;
pub mod scheduler;

pub use modal::AdInterstitial;
