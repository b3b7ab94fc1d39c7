//! Page-scoped locator tables.
//!
//! Selector strings follow the target site's current markup. When the markup
//! changes these are the only strings that need updating.

use crate::locator::{Locator, TextMatch};

/// Labels of the program filters whose deals carry a countdown badge.
pub const TIME_BOUND_PROGRAMS: [&str; 2] = ["Prime Early Access deals", "Prime Exclusive deals"];

/// Landing page locators.
#[derive(Debug, Clone)]
pub struct HomeLocators {
    pub logo: Locator,
    pub carousel: Locator,
}

impl Default for HomeLocators {
    fn default() -> Self {
        Self {
            logo: Locator::xpath(r#"//div[@id="nav-logo"]"#),
            carousel: Locator::xpath(r#"//div[@class="a-carousel-row-inner"]"#),
        }
    }
}

/// Today's Deals page locators.
#[derive(Debug, Clone)]
pub struct DealsLocators {
    pub deals_link: Locator,
    pub header: Locator,
    pub program_filters: Locator,
    pub department_filters: Locator,
    pub price_filters: Locator,
    pub product_grid: Locator,
    pub products: Locator,
}

impl Default for DealsLocators {
    fn default() -> Self {
        let product_grid = Locator::xpath(r#"//div[@data-testid="grid-deals-container"]"#);
        let products =
            product_grid.join(r#"//div[contains(@class,"DealGridItem-module__dealItemDisplayGrid")]"#);
        Self {
            deals_link: Locator::xpath(r#"//a[contains(text(),"Today's Deals")]"#),
            header: Locator::xpath(r#"//h1[contains(text(),"Today's Deals")]"#),
            program_filters: Locator::xpath(r#"//span[@data-testid="grid-filter-PRIME"]"#),
            department_filters: Locator::xpath(r#"//span[@data-testid="grid-filter-DEPARTMENTS"]"#),
            price_filters: Locator::xpath(r#"//span[@data-testid="grid-filter-PRICE"]"#),
            product_grid,
            products,
        }
    }
}

impl DealsLocators {
    /// The clickable label wrapping a program filter checkbox.
    pub fn program_option(&self, label: &str) -> Locator {
        self.program_filters
            .descendant_with_text("span", TextMatch::Own, label)
            .ancestor("label")
    }

    /// A department option, matched on its exact visible text.
    pub fn department_option(&self, label: &str) -> Locator {
        self.department_filters
            .descendant_with_text("span", TextMatch::Exact, label)
    }

    /// A price band link, matched on partial visible text regardless of case.
    pub fn price_option(&self, label: &str) -> Locator {
        self.price_filters
            .descendant_with_text("a", TextMatch::Contains, label)
    }

    /// Bold marker of the currently selected price band. Depending on the
    /// layout it wraps the link or sits inside it.
    pub fn price_selected_marker(&self, label: &str) -> Locator {
        self.price_option(label)
            .enclosing(r#"span[@class="a-text-bold"]"#)
    }

    /// The `index`-th rendered product card.
    pub fn card(&self, index: usize) -> Locator {
        self.products.nth(index)
    }

    pub fn card_description(&self, index: usize) -> Locator {
        self.card(index)
            .join(r#"//div[contains(@class,"DealContent-module")]"#)
    }

    /// Visible one-line badge region of a card.
    fn card_badge(&self, index: usize) -> Locator {
        self.card(index).join(
            r#"//div[contains(@class,"BadgeAutomated-module__badgeOneLineContainer") and not(@aria-hidden="true")]"#,
        )
    }

    pub fn card_price(&self, index: usize) -> Locator {
        self.card_badge(index).join("//div")
    }

    pub fn card_time(&self, index: usize) -> Locator {
        self.card_badge(index).join("//time")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_option_walks_up_to_label() {
        let deals = DealsLocators::default();
        assert_eq!(
            deals.program_option("Prime eligible").as_xpath(),
            r#"//span[@data-testid="grid-filter-PRIME"]//span[text()="Prime eligible"]/ancestor::label"#
        );
    }

    #[test]
    fn test_department_option_is_exact() {
        let deals = DealsLocators::default();
        let books = deals.department_option("Books");
        assert!(books.as_xpath().contains(r#"normalize-space(.)="Books""#));
        assert_ne!(books, deals.department_option("Books & Audible"));
    }

    #[test]
    fn test_price_marker_encloses_option_or_its_text() {
        let deals = DealsLocators::default();
        let marker = deals.price_selected_marker("Under $25");
        assert!(marker.as_xpath().starts_with(deals.price_option("Under $25").as_xpath()));
        assert!(marker.as_xpath().ends_with(r#"//ancestor::span[@class="a-text-bold"]"#));
    }

    #[test]
    fn test_card_fields_are_scoped_to_card() {
        let deals = DealsLocators::default();
        let prefix = deals.card(3).as_xpath().to_string();
        assert!(deals.card_description(3).as_xpath().starts_with(&prefix));
        assert!(deals.card_price(3).as_xpath().starts_with(&prefix));
        assert!(deals.card_time(3).as_xpath().ends_with("//time"));
        assert!(deals.card_price(3).as_xpath().contains(r#"not(@aria-hidden="true")"#));
    }

    #[test]
    fn test_products_scoped_under_grid() {
        let deals = DealsLocators::default();
        assert!(
            deals
                .products
                .as_xpath()
                .starts_with(deals.product_grid.as_xpath())
        );
    }
}
