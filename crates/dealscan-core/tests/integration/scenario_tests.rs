use dealscan_core::catalog::DealsLocators;
use dealscan_core::expect::Severity;
use dealscan_core::testutil::{FakeCard, FakeElement};
use dealscan_core::{DealFilters, Scenario};

use crate::common::{fake_site, fast_runner};

#[tokio::test]
async fn prime_books_under_25_yields_two_field_rows() {
    let session = fake_site(&[
        FakeCard::new("Atomic Habits", "$11.98"),
        FakeCard::new("Project Hail Mary", "$14.99"),
        FakeCard::new("The Hobbit", "$8.49"),
    ]);
    let scenario = Scenario::find("prime-books").unwrap();

    let report = fast_runner().run(session.clone(), &scenario).await;

    assert!(report.passed(), "failures: {:?}", report.failures);
    assert_eq!(report.rows.len(), 3);
    assert!(report.rows.iter().all(|row| row.len() == 2));

    let deals = DealsLocators::default();
    for checked in [
        deals.program_option("Prime eligible"),
        deals.department_option("Books"),
    ] {
        assert!(session.element(&checked).unwrap().checked);
    }
    assert!(
        session
            .element(&deals.price_selected_marker("Under $25"))
            .unwrap()
            .visible
    );
}

#[tokio::test]
async fn early_access_electronics_rows_carry_time_when_rendered() {
    let session = fake_site(&[
        FakeCard::new("Noise cancelling headphones", "$39.99").with_time("Ends in 03:12:45"),
        FakeCard::new("USB-C charger", "$27.99"),
    ]);
    let scenario = Scenario::find("early-access-electronics").unwrap();

    let report = fast_runner().run(session, &scenario).await;

    assert!(report.passed(), "failures: {:?}", report.failures);
    let rows = report.rows.rows();
    assert_eq!(rows[0].len(), 3);
    assert_eq!(rows[0].fields()[2], "Ends in 03:12:45");
    assert_eq!(rows[1].len(), 2);
}

#[tokio::test]
async fn exclusive_fashion_has_same_shape_as_early_access() {
    let session = fake_site(&[
        FakeCard::new("Wool coat", "$89.00").with_time("Ends in 11:00:00"),
        FakeCard::new("Leather boots", "$74.50").with_time("Ends in 09:30:00"),
    ]);
    let scenario = Scenario::find("exclusive-fashion").unwrap();

    let report = fast_runner().run(session, &scenario).await;

    assert!(report.passed(), "failures: {:?}", report.failures);
    assert!(report.rows.iter().all(|row| row.len() == 3));
}

#[tokio::test]
async fn missing_department_and_disabled_price_do_not_fail() {
    let session = fake_site(&[FakeCard::new("Blender", "$45.00")]);
    let deals = DealsLocators::default();
    session.insert(&deals.price_option("$200 & Above"), FakeElement::visible().disabled());
    let scenario = Scenario::new(
        "custom",
        "Unknown department, disabled price",
        DealFilters::new("Prime eligible", "Garden", "$200 & Above"),
    );

    let report = fast_runner().run(session.clone(), &scenario).await;

    assert!(report.passed(), "failures: {:?}", report.failures);
    assert_eq!(
        session.clicks(),
        vec![deals.program_option("Prime eligible").as_xpath().to_string()]
    );
}

#[tokio::test]
async fn empty_result_set_is_a_fatal_failure() {
    let session = fake_site(&[]);
    let scenario = Scenario::find("prime-books").unwrap();

    let report = fast_runner().run(session, &scenario).await;

    assert!(!report.passed());
    assert!(report.rows.is_empty());
    let fatal = report.fatal().unwrap();
    assert_eq!(fatal.severity, Severity::Fatal);
    assert!(fatal.message.contains("No products displayed"));
}

#[tokio::test]
async fn scenarios_run_concurrently_on_separate_sessions() {
    let runner = std::sync::Arc::new(fast_runner());
    let mut handles = Vec::new();
    for scenario in Scenario::builtin() {
        let runner = runner.clone();
        let session = fake_site(&[FakeCard::new("Item", "$30.00").with_time("Ends in 01:00:00")]);
        handles.push(tokio::spawn(async move { runner.run(session, &scenario).await }));
    }

    for handle in handles {
        let report = handle.await.unwrap();
        assert!(report.passed(), "{}: {:?}", report.slug, report.failures);
    }
}
