/// Smoke-test for `ChromiumDriver`.
///
/// Launches a headless Chromium, opens the storefront home page and the
/// Today's Deals page, and prints how many product cards are on the grid.
///
/// Run with:
///   cargo run --example browser_smoke
use dealscan_client::{ChromiumDriver, DriverConfig};
use dealscan_core::catalog::{DealsLocators, HomeLocators};
use dealscan_core::{ExpectConfig, ScenarioContext, Session, SiteConfig, navigation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Launching headless browser…");
    let driver = ChromiumDriver::launch(DriverConfig::default()).await?;
    let session = driver.new_session().await?;

    let ctx = ScenarioContext::new(session.clone(), SiteConfig::default(), ExpectConfig::default());
    navigation::goto_home(&ctx).await?;
    navigation::goto_deals(&ctx).await?;

    let cards = session.count(&DealsLocators::default().products).await?;
    let logo_visible = session.is_visible(&HomeLocators::default().logo).await?;
    println!("OK: deals grid shows {cards} cards (logo visible: {logo_visible})");

    session.close().await?;
    Ok(())
}
