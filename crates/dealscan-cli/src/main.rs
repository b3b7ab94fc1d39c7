use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use dealscan_client::{ChromiumDriver, DriverConfig, Viewport};
use dealscan_core::models::DealFilters;
use dealscan_core::{
    ExpectConfig, Scenario, ScenarioReport, ScenarioRunner, SiteConfig, TracingScenarioReporter,
};

type Runner = ScenarioRunner<TracingScenarioReporter>;

#[derive(Parser)]
#[command(name = "dealscan", version, about = "Today's Deals filter and grid checker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario, built-in or ad hoc
    Run {
        /// Built-in scenario slug (see `dealscan list`)
        #[arg(short, long, conflicts_with_all = ["program", "department", "price"])]
        scenario: Option<String>,

        /// Program filter label (repeatable)
        #[arg(long)]
        program: Vec<String>,

        /// Department filter label (repeatable)
        #[arg(long)]
        department: Vec<String>,

        /// Price range label, e.g. "Under $25"
        #[arg(long, default_value = "")]
        price: String,

        #[command(flatten)]
        opts: RunOptions,
    },

    /// Run every built-in scenario
    RunAll {
        /// Run scenarios concurrently, one browser tab each
        #[arg(long, default_value_t = false)]
        parallel: bool,

        #[command(flatten)]
        opts: RunOptions,
    },

    /// List the built-in scenarios
    List,
}

#[derive(Args)]
struct RunOptions {
    /// Output format for the extracted rows
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Storefront base URL
    #[arg(long, env = "DEALSCAN_BASE_URL", default_value = dealscan_core::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Timeout for visibility and checked-state expectations
    #[arg(long, env = "DEALSCAN_EXPECT_TIMEOUT_MS", default_value_t = 5000)]
    expect_timeout_ms: u64,

    /// Run Chromium without a window
    #[arg(long, env = "DEALSCAN_HEADLESS", default_value_t = true, action = clap::ArgAction::Set)]
    headless: bool,

    /// Shorthand for `--headless false`
    #[arg(long, default_value_t = false)]
    headed: bool,

    /// Browser viewport as WIDTHxHEIGHT
    #[arg(long, default_value = "1600x900")]
    viewport: String,

    /// How long click/check wait for their target to become actionable
    #[arg(long, env = "DEALSCAN_ACTION_TIMEOUT_MS", default_value_t = 30000)]
    action_timeout_ms: u64,

    /// Chrome/Chromium binary (otherwise CHROME_BIN or well-known paths)
    #[arg(long)]
    chrome_binary: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dealscan=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            program,
            department,
            price,
            opts,
        } => {
            let scenario = match scenario {
                Some(slug) => Scenario::find(&slug).with_context(|| {
                    format!("Unknown scenario '{slug}'. Run `dealscan list` to see the built-ins.")
                })?,
                None => custom_scenario(program, department, price)?,
            };
            cmd_run(vec![scenario], false, &opts).await
        }
        Commands::RunAll { parallel, opts } => cmd_run(Scenario::builtin(), parallel, &opts).await,
        Commands::List => {
            cmd_list();
            Ok(())
        }
    }
}

/// Build an ad hoc scenario from `--program/--department/--price`.
fn custom_scenario(program: Vec<String>, department: Vec<String>, price: String) -> Result<Scenario> {
    if program.is_empty() && department.is_empty() && price.is_empty() {
        anyhow::bail!("Pass --scenario or at least one of --program, --department, --price");
    }
    let filters = DealFilters::new(program, department, price);
    let name = [
        filters.program.to_string(),
        filters.department.to_string(),
        filters.price.clone(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");
    Ok(Scenario::new("custom", &name, filters))
}

fn cmd_list() {
    for scenario in Scenario::builtin() {
        println!(
            "{:<26} {}  [program: {}; department: {}; price: {}]",
            scenario.slug,
            scenario.name,
            scenario.filters.program,
            scenario.filters.department,
            scenario.filters.price,
        );
    }
}

async fn cmd_run(scenarios: Vec<Scenario>, parallel: bool, opts: &RunOptions) -> Result<()> {
    let site = SiteConfig::new(&opts.base_url).map_err(|e| anyhow::anyhow!(e))?;
    let expect = ExpectConfig::new(Duration::from_millis(opts.expect_timeout_ms));

    let config = driver_config(opts)?;

    tracing::info!(viewport = %config.viewport, headless = config.headless, "Launching browser");
    let driver = ChromiumDriver::launch(config)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    let runner = Arc::new(ScenarioRunner::new(site, expect, TracingScenarioReporter));

    let reports = if parallel {
        run_parallel(&driver, &runner, scenarios).await?
    } else {
        run_sequential(&driver, &runner, &scenarios).await?
    };

    print_reports(&reports, opts.format)?;

    let failed = reports.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} scenarios failed", reports.len());
    }
    Ok(())
}

fn driver_config(opts: &RunOptions) -> Result<DriverConfig> {
    let viewport: Viewport = opts.viewport.parse().map_err(|e| anyhow::anyhow!("{e}"))?;
    let mut config = DriverConfig::default()
        .with_viewport(viewport)
        .with_action_timeout(Duration::from_millis(opts.action_timeout_ms));
    if opts.headed || !opts.headless {
        config = config.headed();
    }
    if let Some(path) = &opts.chrome_binary {
        config = config.with_chrome_binary(path.clone());
    }
    Ok(config)
}

async fn run_sequential(
    driver: &ChromiumDriver,
    runner: &Runner,
    scenarios: &[Scenario],
) -> Result<Vec<ScenarioReport>> {
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let session = driver.new_session().await.map_err(|e| anyhow::anyhow!(e))?;
        reports.push(runner.run(session.clone(), scenario).await);
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Failed to close tab");
        }
    }
    Ok(reports)
}

async fn run_parallel(
    driver: &ChromiumDriver,
    runner: &Arc<Runner>,
    scenarios: Vec<Scenario>,
) -> Result<Vec<ScenarioReport>> {
    let mut set = JoinSet::new();
    for (index, scenario) in scenarios.into_iter().enumerate() {
        let session = driver.new_session().await.map_err(|e| anyhow::anyhow!(e))?;
        let runner = Arc::clone(runner);
        set.spawn(async move {
            let report = runner.run(session.clone(), &scenario).await;
            if let Err(e) = session.close().await {
                tracing::warn!(error = %e, "Failed to close tab");
            }
            (index, report)
        });
    }

    let mut reports = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        reports.push(joined.context("Scenario task panicked")?);
    }
    // Report in declaration order regardless of completion order.
    reports.sort_by_key(|(index, _)| *index);
    Ok(reports.into_iter().map(|(_, report)| report).collect())
}

fn print_reports(reports: &[ScenarioReport], format: Format) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(reports)?);
        }
        Format::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(std::io::stdout());
            for report in reports {
                for row in &report.rows {
                    let mut record = vec![report.slug.as_str()];
                    record.extend(row.fields().iter().map(String::as_str));
                    writer.write_record(&record)?;
                }
            }
            writer.flush()?;
        }
        Format::Table => {
            let mut out = std::io::stdout().lock();
            for report in reports {
                let status = if report.passed() { "PASSED" } else { "FAILED" };
                writeln!(
                    out,
                    "[{status}] {} ({} rows, {} ms)",
                    report.scenario,
                    report.rows.len(),
                    report.elapsed_ms
                )?;
                for row in &report.rows {
                    writeln!(out, "  {}", row.fields().join(" | "))?;
                }
                for failure in &report.failures {
                    let kind = if failure.is_fatal() { "fatal" } else { "soft" };
                    writeln!(out, "  ! {kind} @ {}: {}", failure.step, failure.message)?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
