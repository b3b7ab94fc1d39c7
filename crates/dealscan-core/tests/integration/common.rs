use std::time::Duration;

use dealscan_core::catalog::{DealsLocators, HomeLocators};
use dealscan_core::scenario::{ScenarioRunner, TracingScenarioReporter};
use dealscan_core::testutil::{FakeCard, FakeSession, seed_filters, seed_grid, seed_home_page};
use dealscan_core::{ExpectConfig, SiteConfig};

/// Filter options every fake deals page offers.
pub const PROGRAMS: &[&str] = &[
    "Prime eligible",
    "Prime Early Access deals",
    "Prime Exclusive deals",
];
pub const DEPARTMENTS: &[&str] = &["Books", "Electronics", "Fashion", "Home & Kitchen"];
pub const PRICES: &[&str] = &["Under $25", "$25 to $50", "$50 to $100", "$100 to $200"];

/// A fake storefront with the home page, every filter option and `cards`.
pub fn fake_site(cards: &[FakeCard]) -> FakeSession {
    let session = FakeSession::new();
    let (home, deals) = (HomeLocators::default(), DealsLocators::default());
    seed_home_page(&session, &home, &deals);
    seed_filters(&session, &deals, PROGRAMS, DEPARTMENTS, PRICES);
    seed_grid(&session, &deals, cards);
    session
}

/// Runner with short polling so failing expectations resolve quickly.
pub fn fast_runner() -> ScenarioRunner<TracingScenarioReporter> {
    ScenarioRunner::new(
        SiteConfig::default(),
        ExpectConfig::new(Duration::from_millis(50)).with_poll_interval(Duration::from_millis(5)),
        TracingScenarioReporter,
    )
}
