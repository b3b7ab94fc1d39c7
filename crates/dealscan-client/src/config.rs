use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dealscan_core::error::AppError;

/// Browser window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    /// 1600×900, wide enough for the deals page to show its filter sidebar.
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
        }
    }
}

impl FromStr for Viewport {
    type Err = AppError;

    /// Parses `WIDTHxHEIGHT`, e.g. `1600x900`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::ConfigError(format!("Invalid viewport '{s}', expected WIDTHxHEIGHT"));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Settings for the Chromium driver and the sessions it opens.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub headless: bool,
    pub viewport: Viewport,
    /// How long click/check wait for their target to become actionable.
    pub action_timeout: Duration,
    pub navigation_timeout: Duration,
    /// Explicit Chrome/Chromium binary; discovered when `None`.
    pub chrome_binary: Option<PathBuf>,
}

impl DriverConfig {
    pub fn headed(mut self) -> Self {
        self.headless = false;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn with_chrome_binary(mut self, path: PathBuf) -> Self {
        self.chrome_binary = Some(path);
        self
    }
}

impl Default for DriverConfig {
    /// Headless, 1600×900, 30 s action and navigation timeouts.
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            action_timeout: Duration::from_secs(30),
            navigation_timeout: Duration::from_secs(30),
            chrome_binary: None,
        }
    }
}
