use crate::catalog::{DealsLocators, HomeLocators};
use crate::config::SiteConfig;
use crate::error::AppError;
use crate::expect::{self, ExpectConfig, Failure};
use crate::locator::Locator;
use crate::traits::Session;

/// Per-scenario state threaded through every page operation.
///
/// Owns the session handle and the soft failures recorded so far. Nothing
/// here is shared between scenarios.
pub struct ScenarioContext<S: Session> {
    session: S,
    site: SiteConfig,
    expect: ExpectConfig,
    home: HomeLocators,
    deals: DealsLocators,
    step: String,
    failures: Vec<Failure>,
}

impl<S: Session> ScenarioContext<S> {
    pub fn new(session: S, site: SiteConfig, expect: ExpectConfig) -> Self {
        Self {
            session,
            site,
            expect,
            home: HomeLocators::default(),
            deals: DealsLocators::default(),
            step: String::new(),
            failures: Vec::new(),
        }
    }

    /// Override the locator catalogs (e.g. for a mirror with other markup).
    pub fn with_locators(mut self, home: HomeLocators, deals: DealsLocators) -> Self {
        self.home = home;
        self.deals = deals;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn expect_config(&self) -> &ExpectConfig {
        &self.expect
    }

    pub fn home(&self) -> &HomeLocators {
        &self.home
    }

    pub fn deals(&self) -> &DealsLocators {
        &self.deals
    }

    /// Name of the step failures are attributed to.
    pub fn set_step(&mut self, step: &str) {
        self.step = step.to_string();
    }

    pub fn step(&self) -> &str {
        &self.step
    }

    /// Hard visibility check; the error aborts the caller.
    pub async fn expect_visible(&self, locator: &Locator, what: &str) -> Result<(), AppError> {
        expect::to_be_visible(&self.session, locator, what, &self.expect).await
    }

    /// Soft visibility check. Returns whether it held.
    pub async fn soft_expect_visible(
        &mut self,
        locator: &Locator,
        what: &str,
    ) -> Result<bool, AppError> {
        let result = expect::to_be_visible(&self.session, locator, what, &self.expect).await;
        self.record_soft(result)
    }

    /// Soft checked-state check. Returns whether it held.
    pub async fn soft_expect_checked(
        &mut self,
        locator: &Locator,
        what: &str,
    ) -> Result<bool, AppError> {
        let result = expect::to_be_checked(&self.session, locator, what, &self.expect).await;
        self.record_soft(result)
    }

    /// Record a failed check or action as a recoverable failure.
    ///
    /// Transport errors are not verdicts about the page and are handed back
    /// to the caller instead.
    pub fn record_soft(&mut self, result: Result<(), AppError>) -> Result<bool, AppError> {
        match result {
            Ok(()) => Ok(true),
            Err(e) if e.is_transport() => Err(e),
            Err(e) => {
                tracing::warn!(step = %self.step, error = %e, "Soft assertion failed");
                self.failures.push(Failure::recoverable(&self.step, &e));
                Ok(false)
            }
        }
    }

    /// Record the error that stopped the scenario.
    pub fn record_fatal(&mut self, error: &AppError) {
        let kind = if error.is_assertion() { "assertion" } else { "infrastructure" };
        tracing::debug!(step = %self.step, kind, %error, "Scenario aborted");
        self.failures.push(Failure::fatal(&self.step, error));
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn soft_failure_count(&self) -> usize {
        self.failures.iter().filter(|f| !f.is_fatal()).count()
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }
}
