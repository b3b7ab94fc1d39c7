//! Catalog XPaths evaluated against a trimmed copy of the deals page markup.

use dealscan_core::Locator;
use dealscan_core::catalog::DealsLocators;
use sxd_document::parser;
use sxd_xpath::{Value, evaluate_xpath};

const DEALS_PAGE: &str = r##"<html><body>
<span data-testid="grid-filter-PRIME">
  <label><input type="checkbox"/><span>Prime eligible</span></label>
  <label><input type="checkbox"/><span>Prime Early Access deals</span></label>
</span>
<span data-testid="grid-filter-DEPARTMENTS">
  <label><input type="checkbox"/><span>Books &amp; Audible</span></label>
  <label><input type="checkbox"/><span> Books </span></label>
  <label><input type="checkbox"/><span>Electronics</span></label>
</span>
<span data-testid="grid-filter-PRICE">
  <span class="a-text-bold"><a href="#">Under $25</a></span>
  <a href="#"><span class="a-text-bold">$25 to $50</span></a>
  <a href="#">$50 to $100</a>
</span>
<div data-testid="grid-deals-container">
  <div class="DealGridItem-module__dealItemDisplayGrid_e7RLT">
    <div class="DealContent-module__truncate_sWbxETx42ZPStTc9jwySW">Kindle Paperwhite</div>
    <div class="BadgeAutomated-module__badgeOneLineContainer_yYupg" aria-hidden="true"><div>$0.00</div></div>
    <div class="BadgeAutomated-module__badgeOneLineContainer_yYupg"><div>$99.99</div><time>Ends in 02:10:00</time></div>
  </div>
  <div class="DealGridItem-module__dealItemDisplayGrid_e7RLT">
    <div class="DealContent-module__truncate_sWbxETx42ZPStTc9jwySW">Echo Dot</div>
    <div class="BadgeAutomated-module__badgeOneLineContainer_yYupg"><div>$22.99</div></div>
  </div>
</div>
</body></html>"##;

/// String values of every node `locator` selects, in document order.
fn select(locator: &Locator) -> Vec<String> {
    let package = parser::parse(DEALS_PAGE).unwrap();
    let document = package.as_document();
    match evaluate_xpath(&document, locator.as_xpath()).unwrap() {
        Value::Nodeset(nodes) => nodes
            .document_order()
            .iter()
            .map(|node| node.string_value().trim().to_string())
            .collect(),
        other => panic!("{locator} did not select nodes: {other:?}"),
    }
}

#[test]
fn program_option_resolves_to_its_label() {
    let deals = DealsLocators::default();
    assert_eq!(select(&deals.program_option("Prime eligible")), ["Prime eligible"]);
    assert!(select(&deals.program_option("Prime")).is_empty());
}

#[test]
fn department_option_ignores_longer_labels() {
    let deals = DealsLocators::default();
    assert_eq!(select(&deals.department_option("Books")), ["Books"]);
    assert_eq!(
        select(&deals.department_option("Books & Audible")),
        ["Books & Audible"]
    );
    assert!(select(&deals.department_option("Book")).is_empty());
}

#[test]
fn price_option_matches_partial_text_in_any_case() {
    let deals = DealsLocators::default();
    assert_eq!(select(&deals.price_option("Under $25")), ["Under $25"]);
    assert_eq!(select(&deals.price_option("under $25")), ["Under $25"]);
    assert_eq!(select(&deals.price_option("$50")), ["$25 to $50", "$50 to $100"]);
}

#[test]
fn price_marker_found_around_or_inside_the_link() {
    let deals = DealsLocators::default();
    // Bold span wrapping the link.
    assert_eq!(select(&deals.price_selected_marker("Under $25")), ["Under $25"]);
    // Bold span rendered inside the link.
    assert_eq!(select(&deals.price_selected_marker("$25 to $50")), ["$25 to $50"]);
    // Unselected band.
    assert!(select(&deals.price_selected_marker("$50 to $100")).is_empty());
}

#[test]
fn products_are_scoped_to_the_grid() {
    let deals = DealsLocators::default();
    assert_eq!(select(&deals.products).len(), 2);
    assert_eq!(select(&deals.product_grid).len(), 1);
}

#[test]
fn card_fields_stay_within_the_nth_card() {
    let deals = DealsLocators::default();

    assert_eq!(select(&deals.card_description(0)), ["Kindle Paperwhite"]);
    assert_eq!(select(&deals.card_description(1)), ["Echo Dot"]);

    // The aria-hidden badge copy is skipped.
    assert_eq!(select(&deals.card_price(0)).first().map(String::as_str), Some("$99.99"));
    assert_eq!(select(&deals.card_price(1)), ["$22.99"]);

    assert_eq!(select(&deals.card_time(0)), ["Ends in 02:10:00"]);
    assert!(select(&deals.card_time(1)).is_empty());
    assert!(select(&deals.card(2)).is_empty());
}
