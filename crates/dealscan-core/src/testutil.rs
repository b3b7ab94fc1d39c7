//! Test utilities: an in-memory [`Session`] and page fixtures.
//!
//! `FakeSession` keys elements by the rendered XPath of the locator that
//! addresses them, so tests seed the page with the same catalog locators the
//! page operations use. It uses `Arc<Mutex<_>>` for interior mutability and
//! records every action for later assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::catalog::{DealsLocators, HomeLocators};
use crate::error::AppError;
use crate::locator::Locator;
use crate::traits::Session;

// ---------------------------------------------------------------------------
// FakeElement
// ---------------------------------------------------------------------------

/// State of every element matched by one locator.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub matches: usize,
    pub visible: bool,
    pub enabled: bool,
    pub checked: bool,
    /// Refuse to become checked when clicked.
    pub stuck: bool,
    pub texts: Vec<String>,
}

impl FakeElement {
    pub fn visible() -> Self {
        Self {
            matches: 1,
            visible: true,
            enabled: true,
            checked: false,
            stuck: false,
            texts: Vec::new(),
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::visible()
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }

    pub fn repeated(mut self, matches: usize) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.texts = vec![text.to_string()];
        self
    }

    pub fn with_texts(mut self, texts: &[&str]) -> Self {
        self.matches = texts.len().max(1);
        self.texts = texts.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// An action performed through the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeAction {
    Navigate(String),
    Click(String),
    Check(String),
}

// ---------------------------------------------------------------------------
// FakeSession
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakePage {
    elements: HashMap<String, FakeElement>,
    /// Locator → polls remaining before it turns visible.
    reveal_after: HashMap<String, usize>,
    /// Locator → locators revealed when it is clicked.
    on_click: HashMap<String, Vec<String>>,
    query_error: Option<String>,
    actions: Vec<FakeAction>,
}

/// In-memory session over a hand-seeded page.
#[derive(Clone, Default)]
pub struct FakeSession {
    page: Arc<Mutex<FakePage>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, locator: &Locator, element: FakeElement) {
        self.page
            .lock()
            .unwrap()
            .elements
            .insert(locator.as_xpath().to_string(), element);
    }

    /// Make `locator` turn visible after `polls` visibility queries.
    pub fn reveal_after_polls(&self, locator: &Locator, polls: usize) {
        self.page
            .lock()
            .unwrap()
            .reveal_after
            .insert(locator.as_xpath().to_string(), polls);
    }

    /// Clicking `trigger` makes `target` visible, inserting it if needed.
    pub fn on_click_reveal(&self, trigger: &Locator, target: &Locator) {
        self.page
            .lock()
            .unwrap()
            .on_click
            .entry(trigger.as_xpath().to_string())
            .or_default()
            .push(target.as_xpath().to_string());
    }

    /// Every state query fails with a browser error from now on.
    pub fn fail_queries_with(&self, message: &str) {
        self.page.lock().unwrap().query_error = Some(message.to_string());
    }

    pub fn actions(&self) -> Vec<FakeAction> {
        self.page.lock().unwrap().actions.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                FakeAction::Click(x) | FakeAction::Check(x) => Some(x),
                FakeAction::Navigate(_) => None,
            })
            .collect()
    }

    pub fn element(&self, locator: &Locator) -> Option<FakeElement> {
        self.page
            .lock()
            .unwrap()
            .elements
            .get(locator.as_xpath())
            .cloned()
    }

    /// Read element state under the lock, honouring query failures.
    fn query<T>(
        &self,
        locator: &Locator,
        read: impl FnOnce(Option<&FakeElement>) -> T,
    ) -> Result<T, AppError> {
        let page = self.page.lock().unwrap();
        if let Some(msg) = &page.query_error {
            return Err(AppError::BrowserError(msg.clone()));
        }
        Ok(read(page.elements.get(locator.as_xpath())))
    }

    fn press(&self, locator: &Locator, checking: bool) -> Result<(), AppError> {
        let mut guard = self.page.lock().unwrap();
        let page = &mut *guard;
        let key = locator.as_xpath().to_string();
        page.actions.push(if checking {
            FakeAction::Check(key.clone())
        } else {
            FakeAction::Click(key.clone())
        });

        let element = page
            .elements
            .get_mut(&key)
            .filter(|e| e.visible && e.matches > 0)
            .ok_or_else(|| AppError::ElementNotFound(key.clone()))?;
        if !element.enabled {
            return Err(AppError::ActionTimeout {
                action: "click".into(),
                locator: key,
                timeout_ms: 0,
            });
        }
        if !element.stuck {
            element.checked = if checking { true } else { !element.checked };
        }
        let stuck = element.stuck;

        let revealed = page.on_click.get(&key).cloned().unwrap_or_default();
        for target in revealed {
            page.elements
                .entry(target)
                .and_modify(|e| e.visible = true)
                .or_insert_with(FakeElement::visible);
        }

        if checking && stuck {
            return Err(AppError::AssertionFailed(format!(
                "clicking did not check {key}"
            )));
        }
        Ok(())
    }
}

impl Session for FakeSession {
    async fn navigate(&self, url: &str) -> Result<(), AppError> {
        self.page
            .lock()
            .unwrap()
            .actions
            .push(FakeAction::Navigate(url.to_string()));
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> Result<usize, AppError> {
        self.query(locator, |e| e.map_or(0, |e| e.matches))
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, AppError> {
        {
            let mut page = self.page.lock().unwrap();
            let key = locator.as_xpath();
            let reveal = match page.reveal_after.get_mut(key) {
                Some(&mut 0) => true,
                Some(remaining) => {
                    *remaining -= 1;
                    false
                }
                None => false,
            };
            if reveal {
                page.reveal_after.remove(key);
                if let Some(e) = page.elements.get_mut(key) {
                    e.visible = true;
                }
            }
        }
        self.query(locator, |e| e.is_some_and(|e| e.visible && e.matches > 0))
    }

    async fn is_enabled(&self, locator: &Locator) -> Result<bool, AppError> {
        self.query(locator, |e| e.is_some_and(|e| e.enabled && e.matches > 0))
    }

    async fn is_checked(&self, locator: &Locator) -> Result<bool, AppError> {
        self.query(locator, |e| e.is_some_and(|e| e.checked))
    }

    async fn click(&self, locator: &Locator) -> Result<(), AppError> {
        self.press(locator, false)
    }

    async fn check(&self, locator: &Locator) -> Result<(), AppError> {
        if self.is_checked(locator).await? {
            return Ok(());
        }
        self.press(locator, true)
    }

    async fn text_contents(&self, locator: &Locator) -> Result<Vec<String>, AppError> {
        self.query(locator, |e| e.map(|e| e.texts.clone()).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Page fixtures
// ---------------------------------------------------------------------------

/// One product card to seed into the deal grid.
#[derive(Debug, Clone, Default)]
pub struct FakeCard {
    pub description: Option<&'static str>,
    /// Every text matched by the price selector, first one wins.
    pub prices: Vec<&'static str>,
    pub time: Option<&'static str>,
}

impl FakeCard {
    pub fn new(description: &'static str, price: &'static str) -> Self {
        Self {
            description: Some(description),
            prices: vec![price],
            time: None,
        }
    }

    pub fn with_time(mut self, time: &'static str) -> Self {
        self.time = Some(time);
        self
    }
}

/// Seed the landing page with its logo, carousel and the deals link.
pub fn seed_home_page(session: &FakeSession, home: &HomeLocators, deals: &DealsLocators) {
    session.insert(&home.logo, FakeElement::visible());
    session.insert(&home.carousel, FakeElement::visible());
    let link = deals.deals_link.first();
    session.insert(&link, FakeElement::visible());
    session.on_click_reveal(&link, &deals.header);
}

/// Seed the filter groups: program and department options as checkboxes,
/// price bands as links that reveal their selection marker when clicked.
pub fn seed_filters(
    session: &FakeSession,
    deals: &DealsLocators,
    programs: &[&str],
    departments: &[&str],
    prices: &[&str],
) {
    for label in programs {
        session.insert(&deals.program_option(label), FakeElement::visible());
    }
    for label in departments {
        session.insert(&deals.department_option(label), FakeElement::visible());
    }
    for label in prices {
        let option = deals.price_option(label);
        session.insert(&option, FakeElement::visible());
        session.on_click_reveal(&option, &deals.price_selected_marker(label));
    }
}

/// Seed the deal grid with `cards` in order.
pub fn seed_grid(session: &FakeSession, deals: &DealsLocators, cards: &[FakeCard]) {
    session.insert(
        &deals.products,
        FakeElement::visible().repeated(cards.len()),
    );
    for (i, card) in cards.iter().enumerate() {
        session.insert(&deals.card(i), FakeElement::visible());
        if let Some(text) = card.description {
            session.insert(&deals.card_description(i), FakeElement::visible().with_text(text));
        }
        if !card.prices.is_empty() {
            session.insert(&deals.card_price(i), FakeElement::visible().with_texts(&card.prices));
        }
        if let Some(time) = card.time {
            session.insert(&deals.card_time(i), FakeElement::visible().with_text(time));
        }
    }
}
