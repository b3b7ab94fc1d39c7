use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use dealscan_core::error::AppError;
use dealscan_core::locator::Locator;
use dealscan_core::traits::Session;
use futures::StreamExt;
use tokio::time::Instant;

use crate::config::DriverConfig;

/// How often actions re-probe their target while waiting for it.
const ACTION_POLL: Duration = Duration::from_millis(100);

/// A running Chromium process driven over the Chrome DevTools Protocol.
///
/// One process serves every session; each [`ChromiumDriver::new_session`]
/// opens its own tab so concurrent scenarios never share page state.
#[derive(Clone)]
pub struct ChromiumDriver {
    browser: Arc<Browser>,
    config: DriverConfig,
}

impl ChromiumDriver {
    /// Launches Chromium with the given settings.
    ///
    /// Requires a Chromium / Chrome binary reachable via `$PATH`, `CHROME_BIN`
    /// or [`DriverConfig::chrome_binary`].
    pub async fn launch(config: DriverConfig) -> Result<Self, AppError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        if let Some(bin) = config.chrome_binary.clone().or_else(find_chrome_binary) {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }
        if config.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }

        let browser_config = builder
            .window_size(config.viewport.width, config.viewport.height)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-translate")
            .arg("--no-first-run")
            .build()
            .map_err(|e| AppError::BrowserError(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        Ok(Self {
            browser: Arc::new(browser),
            config,
        })
    }

    /// Opens a blank tab sized to the configured viewport.
    pub async fn new_session(&self) -> Result<ChromiumSession, AppError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to open tab: {e}")))?;

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(self.config.viewport.width as i64)
            .height(self.config.viewport.height as i64)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(|e| AppError::BrowserError(format!("Invalid viewport: {e}")))?;
        page.execute(metrics)
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to set viewport: {e}")))?;

        Ok(ChromiumSession {
            page,
            action_timeout: self.config.action_timeout,
            navigation_timeout: self.config.navigation_timeout,
        })
    }
}

/// Tries to locate the real Chrome/Chromium binary.
///
/// On systems where Chromium is installed via **snap**, the wrapper at
/// `/snap/bin/chromium` strips unknown CLI flags, breaking headless mode.
/// We look for the real binary inside the snap first, then fall back to
/// well-known system paths. If nothing is found we return `None` and let
/// `chromiumoxide` do its own lookup.
fn find_chrome_binary() -> Option<PathBuf> {
    let candidates: &[&str] = &[
        "/snap/chromium/current/usr/lib/chromium-browser/chrome",
        "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/google-chrome",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
    ];

    if let Ok(p) = std::env::var("CHROME_BIN") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}

/// State of the elements matched by a locator at one instant.
#[derive(Debug, serde::Deserialize)]
struct Probe {
    count: usize,
    visible: bool,
    enabled: bool,
    checked: bool,
    texts: Vec<String>,
}

/// Resolves an XPath in the page and reports on its matches in one round
/// trip. Visibility means a non-empty box and no `visibility: hidden`;
/// checked-ness is read from the matched element, the input inside it, or
/// the input its enclosing label controls.
fn probe_script(xpath: &str) -> Result<String, AppError> {
    let literal = serde_json::to_string(xpath)?;
    Ok(format!(
        r#"(() => {{
    const snap = document.evaluate({literal}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
    const nodes = [];
    for (let i = 0; i < snap.snapshotLength; i++) {{
        const n = snap.snapshotItem(i);
        if (n.nodeType === Node.ELEMENT_NODE) nodes.push(n);
    }}
    const el = nodes[0] || null;
    const visible = !!el && el.isConnected && (() => {{
        if (getComputedStyle(el).visibility === 'hidden') return false;
        const r = el.getBoundingClientRect();
        return r.width > 0 && r.height > 0;
    }})();
    const control = !el ? null
        : el.matches('input') ? el
        : el.querySelector('input[type=checkbox], input[type=radio]')
            || (el.closest('label') && (el.closest('label').control || el.closest('label').querySelector('input')));
    const ariaHost = el && el.closest('[aria-checked]');
    const checked = control ? !!control.checked : !!ariaHost && ariaHost.getAttribute('aria-checked') === 'true';
    const enabled = !!el && !el.disabled && !el.closest('[aria-disabled="true"]');
    return {{ count: nodes.length, visible, enabled, checked, texts: nodes.map(n => n.textContent || '') }};
}})()"#
    ))
}

/// One browser tab implementing [`Session`].
#[derive(Clone)]
pub struct ChromiumSession {
    page: Page,
    action_timeout: Duration,
    navigation_timeout: Duration,
}

impl ChromiumSession {
    async fn probe(&self, locator: &Locator) -> Result<Probe, AppError> {
        let script = probe_script(locator.as_xpath())?;
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| AppError::BrowserError(format!("Probe failed for {locator}: {e}")))?;
        Ok(result.into_value()?)
    }

    /// Wait for the first match to be visible and enabled, then click it.
    async fn click_when_actionable(&self, locator: &Locator, action: &str) -> Result<(), AppError> {
        let deadline = Instant::now() + self.action_timeout;
        loop {
            let probe = self.probe(locator).await?;
            if probe.visible && probe.enabled {
                break;
            }
            if Instant::now() >= deadline {
                if probe.count == 0 {
                    return Err(AppError::ElementNotFound(locator.to_string()));
                }
                return Err(AppError::ActionTimeout {
                    action: action.to_string(),
                    locator: locator.to_string(),
                    timeout_ms: self.action_timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(ACTION_POLL).await;
        }

        let element = self
            .page
            .find_xpath(locator.as_xpath())
            .await
            .map_err(|_| AppError::ElementNotFound(locator.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| AppError::BrowserError(format!("{action} failed on {locator}: {e}")))?;
        Ok(())
    }

    /// Close this tab.
    pub async fn close(self) -> Result<(), AppError> {
        self.page
            .close()
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to close tab: {e}")))
    }
}

impl Session for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<(), AppError> {
        let result = tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await;
        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(AppError::NavigationFailed(format!(
                "Failed to navigate to {url}: {e}"
            ))),
            Err(_) => Err(AppError::NavigationFailed(format!(
                "Navigation to {url} timed out after {} seconds",
                self.navigation_timeout.as_secs()
            ))),
        }
    }

    async fn count(&self, locator: &Locator) -> Result<usize, AppError> {
        Ok(self.probe(locator).await?.count)
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, AppError> {
        Ok(self.probe(locator).await?.visible)
    }

    async fn is_enabled(&self, locator: &Locator) -> Result<bool, AppError> {
        let probe = self.probe(locator).await?;
        Ok(probe.count > 0 && probe.enabled)
    }

    async fn is_checked(&self, locator: &Locator) -> Result<bool, AppError> {
        Ok(self.probe(locator).await?.checked)
    }

    async fn click(&self, locator: &Locator) -> Result<(), AppError> {
        self.click_when_actionable(locator, "click").await
    }

    async fn check(&self, locator: &Locator) -> Result<(), AppError> {
        if self.probe(locator).await?.checked {
            return Ok(());
        }
        self.click_when_actionable(locator, "check").await?;
        if self.probe(locator).await?.checked {
            Ok(())
        } else {
            Err(AppError::AssertionFailed(format!(
                "clicking did not check {locator}"
            )))
        }
    }

    async fn text_contents(&self, locator: &Locator) -> Result<Vec<String>, AppError> {
        Ok(self.probe(locator).await?.texts)
    }
}
