use thiserror::Error;

/// Application-wide error types for dealscan.
#[derive(Error, Debug)]
pub enum AppError {
    /// A landmark element never became visible within the expect timeout.
    #[error("{what} was not visible after {timeout_ms} ms ({locator})")]
    VisibilityTimeout {
        what: String,
        locator: String,
        timeout_ms: u64,
    },

    /// A checkbox-like control did not reach the checked state.
    #[error("{what} was not checked after {timeout_ms} ms ({locator})")]
    NotChecked {
        what: String,
        locator: String,
        timeout_ms: u64,
    },

    /// Custom predicate assertion failed.
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// The deal grid matched zero product cards.
    #[error("No products displayed, more than zero products were expected")]
    EmptyGrid,

    /// An action target never matched any element.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An action (click/check) did not complete within the action timeout.
    #[error("Action timed out after {timeout_ms} ms: {action} on {locator}")]
    ActionTimeout {
        action: String,
        locator: String,
        timeout_ms: u64,
    },

    /// Page navigation failed.
    #[error("Navigation error: {0}")]
    NavigationFailed(String),

    /// The browser or its DevTools connection failed.
    #[error("Browser error: {0}")]
    BrowserError(String),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if this error comes from the automation transport rather
    /// than from a failed expectation about the page.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::NavigationFailed(_)
                | AppError::BrowserError(_)
                | AppError::SerializationError(_)
        )
    }

    /// Returns true if this error is a verdict about page state (an assertion
    /// that did not hold) as opposed to an infrastructure problem.
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            AppError::VisibilityTimeout { .. }
                | AppError::NotChecked { .. }
                | AppError::AssertionFailed(_)
                | AppError::EmptyGrid
        )
    }
}
