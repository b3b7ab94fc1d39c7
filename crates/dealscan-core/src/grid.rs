//! Deal grid reading: the non-empty gate and per-card text extraction.

use crate::context::ScenarioContext;
use crate::error::AppError;
use crate::models::{LabelSet, ProductRow, ResultTable};
use crate::traits::Session;

/// Fail the scenario unless at least one product card is rendered.
pub async fn assert_product_grid_not_empty<S: Session>(
    ctx: &ScenarioContext<S>,
) -> Result<usize, AppError> {
    let count = ctx.session().count(&ctx.deals().products).await?;
    tracing::info!(count, "Product grid");
    if count == 0 {
        return Err(AppError::EmptyGrid);
    }
    Ok(count)
}

/// Read every rendered product card into a row of text fields.
///
/// `program` is the set of program filters in effect; time-bound programs add
/// the countdown field to each row. Fields are read as-is without waiting,
/// so a card still rendering may produce a short row.
pub async fn extract_products<S: Session>(
    ctx: &ScenarioContext<S>,
    program: &LabelSet,
) -> Result<ResultTable, AppError> {
    let session = ctx.session();
    let deals = ctx.deals();
    let count = session.count(&deals.products).await?;
    let has_prime_time = program.has_time_bound_program();

    let mut table = ResultTable::with_capacity(count);
    for i in 0..count {
        let mut row = ProductRow::new();

        let description = session.text_content(&deals.card_description(i)).await?;
        row.push_non_empty(description.clone());

        // The badge selector can match several nodes; the first one carries
        // the price.
        let price = session
            .text_contents(&deals.card_price(i))
            .await?
            .into_iter()
            .next();
        row.push_non_empty(price.clone());

        let time = if has_prime_time {
            let time = session.text_content(&deals.card_time(i)).await?;
            row.push_non_empty(time.clone());
            time
        } else {
            None
        };

        let prefix = time.map(|t| format!("{t} : ")).unwrap_or_default();
        tracing::info!(
            "{}{} : {}",
            prefix,
            price.unwrap_or_default(),
            description.unwrap_or_default()
        );
        table.push(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::expect::ExpectConfig;
    use crate::testutil::{FakeCard, FakeSession, seed_grid};

    fn ctx(session: FakeSession) -> ScenarioContext<FakeSession> {
        ScenarioContext::new(session, SiteConfig::default(), ExpectConfig::default())
    }

    #[tokio::test]
    async fn empty_grid_is_fatal() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        seed_grid(&session, ctx.deals(), &[]);

        let err = assert_product_grid_not_empty(&ctx).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyGrid));
    }

    #[tokio::test]
    async fn non_empty_grid_passes_with_count() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        seed_grid(
            &session,
            ctx.deals(),
            &[FakeCard::new("Kindle", "$49.99"), FakeCard::new("Echo", "$24.99")],
        );

        assert_eq!(assert_product_grid_not_empty(&ctx).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn rows_have_two_fields_without_time_bound_program() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        seed_grid(
            &session,
            ctx.deals(),
            &[
                FakeCard::new("Atomic Habits", "$11.98").with_time("Ends in 02:14:09"),
                FakeCard::new("Dune", "$9.99"),
            ],
        );

        let table = extract_products(&ctx, &"Prime eligible".into())
            .await
            .unwrap();

        assert_eq!(
            table.rows(),
            &[
                ProductRow::from(["Atomic Habits", "$11.98"]),
                ProductRow::from(["Dune", "$9.99"]),
            ]
        );
    }

    #[tokio::test]
    async fn time_bound_program_adds_time_field_when_present() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        seed_grid(
            &session,
            ctx.deals(),
            &[
                FakeCard::new("Headphones", "$39.99").with_time("Ends in 05:00:00"),
                FakeCard::new("Charger", "$29.99"),
            ],
        );

        let table = extract_products(&ctx, &"Prime Early Access deals".into())
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows()[0],
            ProductRow::from(["Headphones", "$39.99", "Ends in 05:00:00"])
        );
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[tokio::test]
    async fn first_price_of_a_multi_match_wins() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        let card = FakeCard {
            description: Some("Jacket"),
            prices: vec!["$59.99", "List: $89.99"],
            time: None,
        };
        seed_grid(&session, ctx.deals(), &[card]);

        let table = extract_products(&ctx, &LabelSet::new()).await.unwrap();
        assert_eq!(table.rows()[0], ProductRow::from(["Jacket", "$59.99"]));
    }

    #[tokio::test]
    async fn card_without_text_still_yields_a_row() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());
        seed_grid(&session, ctx.deals(), &[FakeCard::default()]);

        let table = extract_products(&ctx, &LabelSet::new()).await.unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.rows()[0].is_empty());
    }

    #[tokio::test]
    async fn no_cards_gives_empty_table() {
        let session = FakeSession::new();
        let ctx = ctx(session.clone());

        let table = extract_products(&ctx, &LabelSet::new()).await.unwrap();
        assert!(table.is_empty());
    }
}
