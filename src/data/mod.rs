pub mod fetch;
pub mod granularity;
pub mod window;

pub use fetch::*;
pub use granularity::Granularity;
pub use window::{FetchWindow, MAX_LOOKBACK_DAYS};
