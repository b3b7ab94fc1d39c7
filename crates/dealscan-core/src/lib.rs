pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod expect;
pub mod filter;
pub mod grid;
pub mod locator;
pub mod models;
pub mod navigation;
pub mod scenario;
pub mod testutil;
pub mod traits;

pub use config::SiteConfig;
pub use context::ScenarioContext;
pub use error::AppError;
pub use expect::{ExpectConfig, Failure, Severity};
pub use locator::Locator;
pub use models::{DealFilters, FilterSpec, LabelSet, ProductRow, ResultTable};
pub use scenario::{Scenario, ScenarioReport, ScenarioRunner, TracingScenarioReporter};
pub use traits::Session;
