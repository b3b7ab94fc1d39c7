use std::future::Future;

use crate::error::AppError;
use crate::locator::Locator;

/// A browser automation session: one tab whose current page the scenario
/// drives.
///
/// State queries (`count`, `is_visible`, ...) answer immediately for the
/// page as it is right now. Actions (`click`, `check`) wait for their target
/// to become actionable, bounded by the implementation's action timeout.
pub trait Session: Send + Sync + Clone {
    /// Load `url` in this session's tab.
    fn navigate(&self, url: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Number of elements currently matched.
    fn count(&self, locator: &Locator) -> impl Future<Output = Result<usize, AppError>> + Send;

    /// Whether the first match exists and is rendered. Missing elements are
    /// not visible; this never errors because of absence.
    fn is_visible(&self, locator: &Locator)
    -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Whether the first match exists and is not disabled.
    fn is_enabled(&self, locator: &Locator)
    -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Whether the first match is a checked checkbox (or wraps one).
    fn is_checked(&self, locator: &Locator)
    -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Click the first match.
    fn click(&self, locator: &Locator) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Bring the first match to the checked state; no-op when already checked.
    fn check(&self, locator: &Locator) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Text content of every match, in document order.
    fn text_contents(
        &self,
        locator: &Locator,
    ) -> impl Future<Output = Result<Vec<String>, AppError>> + Send;

    /// Text content of the first match, if any.
    fn text_content(
        &self,
        locator: &Locator,
    ) -> impl Future<Output = Result<Option<String>, AppError>> + Send {
        async move { Ok(self.text_contents(locator).await?.into_iter().next()) }
    }
}
