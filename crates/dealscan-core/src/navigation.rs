use crate::context::ScenarioContext;
use crate::error::AppError;
use crate::traits::Session;

/// Load the landing page and wait for the site logo and the carousel.
pub async fn goto_home<S: Session>(ctx: &ScenarioContext<S>) -> Result<(), AppError> {
    let url = ctx.site().base_url.clone();
    tracing::info!(%url, "Opening home page");
    ctx.session().navigate(&url).await?;

    let home = ctx.home();
    ctx.expect_visible(&home.logo, "Site logo").await?;
    ctx.expect_visible(&home.carousel, "Home page carousel")
        .await
}

/// Follow the "Today's Deals" link and wait for the deals header.
pub async fn goto_deals<S: Session>(ctx: &ScenarioContext<S>) -> Result<(), AppError> {
    let deals = ctx.deals();
    // The nav bar and the page body can both carry the link.
    ctx.session().click(&deals.deals_link.first()).await?;
    ctx.expect_visible(&deals.header, "Today's Deals header")
        .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::{DealsLocators, HomeLocators};
    use crate::config::SiteConfig;
    use crate::expect::ExpectConfig;
    use crate::locator::Locator;
    use crate::testutil::{FakeAction, FakeElement, FakeSession};

    fn ctx(session: FakeSession) -> ScenarioContext<FakeSession> {
        ScenarioContext::new(
            session,
            SiteConfig::new("https://shop.test/").unwrap(),
            ExpectConfig::new(Duration::from_millis(20)).with_poll_interval(Duration::from_millis(5)),
        )
    }

    #[tokio::test]
    async fn home_waits_for_logo_and_carousel() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        session.insert(&ctx.home().logo, FakeElement::visible());
        session.insert(&ctx.home().carousel, FakeElement::visible());

        goto_home(&ctx).await.unwrap();
        assert_eq!(
            session.actions(),
            vec![FakeAction::Navigate("https://shop.test/".into())]
        );
    }

    #[tokio::test]
    async fn home_without_carousel_is_a_visibility_timeout() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        session.insert(&ctx.home().logo, FakeElement::visible());

        let err = goto_home(&ctx).await.unwrap_err();
        match err {
            AppError::VisibilityTimeout { what, .. } => assert_eq!(what, "Home page carousel"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn home_uses_overridden_locators() {
        let session = FakeSession::new();
        let home = HomeLocators {
            logo: Locator::xpath(r#"//a[@id="brand"]"#),
            carousel: Locator::xpath(r#"//section[@id="hero"]"#),
        };
        session.insert(&home.logo, FakeElement::visible());
        session.insert(&home.carousel, FakeElement::visible());
        let ctx = ctx(session.clone()).with_locators(home, DealsLocators::default());

        goto_home(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn deals_clicks_first_link_then_waits_for_header() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        let link = ctx.deals().deals_link.first();
        session.insert(&link, FakeElement::visible());
        session.on_click_reveal(&link, &ctx.deals().header);

        goto_deals(&ctx).await.unwrap();
        assert_eq!(session.clicks(), vec![link.as_xpath().to_string()]);
    }

    #[tokio::test]
    async fn deals_header_missing_fails() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        session.insert(&ctx.deals().deals_link.first(), FakeElement::visible());

        let err = goto_deals(&ctx).await.unwrap_err();
        assert!(matches!(err, AppError::VisibilityTimeout { .. }));
    }
}
