//! Scenario runner: drives one deals scenario through its steps.
//!
//! Home → Today's Deals → filters → non-empty gate → extraction. Recoverable
//! failures accumulate on the context and fail the scenario at the end; the
//! first fatal error stops the remaining steps.

use std::time::Instant;

use crate::config::SiteConfig;
use crate::context::ScenarioContext;
use crate::error::AppError;
use crate::expect::{ExpectConfig, Failure};
use crate::filter;
use crate::grid;
use crate::models::{DealFilters, ResultTable};
use crate::navigation;
use crate::traits::Session;

/// A named filter combination to run against the deals page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    /// Short identifier used on the command line.
    pub slug: String,
    pub name: String,
    pub filters: DealFilters,
}

impl Scenario {
    pub fn new(slug: &str, name: &str, filters: DealFilters) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            filters,
        }
    }

    /// The stock scenarios.
    pub fn builtin() -> Vec<Scenario> {
        vec![
            Scenario::new(
                "prime-books",
                "Prime eligible books under $25",
                DealFilters::new("Prime eligible", "Books", "Under $25"),
            ),
            Scenario::new(
                "early-access-electronics",
                "Prime Early Access deals Electronics $25 to $50",
                DealFilters::new("Prime Early Access deals", "Electronics", "$25 to $50"),
            ),
            Scenario::new(
                "exclusive-fashion",
                "Prime Exclusive deals Fashion $50 to $100",
                DealFilters::new("Prime Exclusive deals", "Fashion", "$50 to $100"),
            ),
        ]
    }

    pub fn find(slug: &str) -> Option<Scenario> {
        Self::builtin().into_iter().find(|s| s.slug == slug)
    }
}

/// Steps of a scenario, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    OpenHome,
    OpenDeals,
    Filter,
    AssertGrid,
    Extract,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::OpenHome,
        Step::OpenDeals,
        Step::Filter,
        Step::AssertGrid,
        Step::Extract,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::OpenHome => "Navigate to the home page",
            Step::OpenDeals => "Navigate to the Today's Deals page",
            Step::Filter => "Filter the products",
            Step::AssertGrid => "Assert the product grid is not empty",
            Step::Extract => "Get and print the product grid details",
        }
    }
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub slug: String,
    pub rows: ResultTable,
    pub failures: Vec<Failure>,
    pub steps_completed: usize,
    pub elapsed_ms: u64,
}

impl ScenarioReport {
    /// No fatal error and no recorded soft failures.
    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.steps_completed == Step::ALL.len()
    }

    pub fn fatal(&self) -> Option<&Failure> {
        self.failures.iter().find(|f| f.is_fatal())
    }
}

/// Events emitted while a scenario runs.
#[derive(Debug, Clone)]
pub enum ScenarioEvent<'a> {
    Started {
        scenario: &'a str,
    },
    StepStarted {
        step: &'a str,
    },
    StepPassed {
        step: &'a str,
    },
    StepFailed {
        step: &'a str,
        error: &'a str,
    },
    SoftFailure {
        step: &'a str,
        message: &'a str,
    },
    Finished {
        scenario: &'a str,
        passed: bool,
        rows: usize,
        failures: usize,
    },
}

/// Receives scenario events (decoupled logging).
pub trait ScenarioReporter: Send + Sync {
    fn report(&self, event: ScenarioEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingScenarioReporter;

impl ScenarioReporter for TracingScenarioReporter {
    fn report(&self, event: ScenarioEvent<'_>) {
        match event {
            ScenarioEvent::Started { scenario } => {
                tracing::info!(%scenario, "Scenario started");
            }
            ScenarioEvent::StepStarted { step } => {
                tracing::info!(%step, "Step");
            }
            ScenarioEvent::StepPassed { step } => {
                tracing::debug!(%step, "Step passed");
            }
            ScenarioEvent::StepFailed { step, error } => {
                tracing::error!(%step, %error, "Step failed");
            }
            ScenarioEvent::SoftFailure { step, message } => {
                tracing::warn!(%step, %message, "Soft failure");
            }
            ScenarioEvent::Finished {
                scenario,
                passed,
                rows,
                failures,
            } => {
                if passed {
                    tracing::info!(%scenario, rows, "Scenario passed");
                } else {
                    tracing::warn!(%scenario, rows, failures, "Scenario failed");
                }
            }
        }
    }
}

/// Runs scenarios against sessions handed in by the caller.
pub struct ScenarioRunner<R: ScenarioReporter> {
    site: SiteConfig,
    expect: ExpectConfig,
    reporter: R,
}

impl<R: ScenarioReporter> ScenarioRunner<R> {
    pub fn new(site: SiteConfig, expect: ExpectConfig, reporter: R) -> Self {
        Self {
            site,
            expect,
            reporter,
        }
    }

    /// Run `scenario` on `session`. Never fails itself; errors end up in the
    /// report.
    pub async fn run<S: Session>(&self, session: S, scenario: &Scenario) -> ScenarioReport {
        let started = Instant::now();
        self.reporter.report(ScenarioEvent::Started {
            scenario: &scenario.name,
        });

        let mut ctx = ScenarioContext::new(session, self.site.clone(), self.expect.clone());
        let mut rows = ResultTable::new();
        let mut steps_completed = 0;

        for step in Step::ALL {
            ctx.set_step(step.name());
            self.reporter.report(ScenarioEvent::StepStarted { step: step.name() });
            let recorded = ctx.failures().len();

            let result = self.run_step(&mut ctx, step, scenario, &mut rows).await;

            for failure in &ctx.failures()[recorded..] {
                self.reporter.report(ScenarioEvent::SoftFailure {
                    step: &failure.step,
                    message: &failure.message,
                });
            }
            match result {
                Ok(()) => {
                    steps_completed += 1;
                    self.reporter.report(ScenarioEvent::StepPassed { step: step.name() });
                }
                Err(e) => {
                    self.reporter.report(ScenarioEvent::StepFailed {
                        step: step.name(),
                        error: &e.to_string(),
                    });
                    ctx.record_fatal(&e);
                    break;
                }
            }
        }

        let report = ScenarioReport {
            scenario: scenario.name.clone(),
            slug: scenario.slug.clone(),
            rows,
            failures: ctx.into_failures(),
            steps_completed,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        self.reporter.report(ScenarioEvent::Finished {
            scenario: &report.scenario,
            passed: report.passed(),
            rows: report.rows.len(),
            failures: report.failures.len(),
        });
        report
    }

    async fn run_step<S: Session>(
        &self,
        ctx: &mut ScenarioContext<S>,
        step: Step,
        scenario: &Scenario,
        rows: &mut ResultTable,
    ) -> Result<(), AppError> {
        match step {
            Step::OpenHome => navigation::goto_home(ctx).await,
            Step::OpenDeals => navigation::goto_deals(ctx).await,
            Step::Filter => filter::filter_products(ctx, &scenario.filters).await,
            Step::AssertGrid => grid::assert_product_grid_not_empty(ctx).await.map(|_| ()),
            Step::Extract => {
                *rows = grid::extract_products(ctx, &scenario.filters.program).await?;
                Ok(())
            }
        }
    }
}
