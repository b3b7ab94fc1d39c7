#[cfg(feature = "browser")]
pub mod chromium;
pub mod config;

#[cfg(feature = "browser")]
pub use chromium::{ChromiumDriver, ChromiumSession};
pub use config::{DriverConfig, Viewport};
