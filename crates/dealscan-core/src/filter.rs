//! Deal grid filters: program, department and price.
//!
//! Each filter degrades gracefully. Controls that fail to reach the expected
//! state are recorded as recoverable failures on the context; department and
//! price options that are not offered for the current results are skipped.
//! Only transport errors abort.

use crate::context::ScenarioContext;
use crate::error::AppError;
use crate::models::{DealFilters, FilterSpec, LabelSet};
use crate::traits::Session;

/// Check each Prime program option, in order.
///
/// Program options are expected on every deals page, so a missing one is
/// recorded as a failure (and its check skipped) rather than ignored.
pub async fn filter_program<S: Session>(
    ctx: &mut ScenarioContext<S>,
    labels: &LabelSet,
) -> Result<(), AppError> {
    for label in labels.iter() {
        let option = ctx.deals().program_option(label);
        let what = format!("Prime program {label}");

        if !ctx.soft_expect_visible(&option, &what).await? {
            continue;
        }
        let checked = ctx.session().check(&option).await;
        if ctx.record_soft(checked)? {
            ctx.soft_expect_checked(&option, &what).await?;
        }
        tracing::info!(%label, "Program filter applied");
    }
    Ok(())
}

/// Check each department option that is currently offered.
pub async fn filter_department<S: Session>(
    ctx: &mut ScenarioContext<S>,
    labels: &LabelSet,
) -> Result<(), AppError> {
    for label in labels.iter() {
        let option = ctx.deals().department_option(label);

        // Departments come and go with the result set; don't wait for one.
        if !ctx.session().is_visible(&option).await? {
            tracing::debug!(%label, "Department not offered, skipping");
            continue;
        }
        let checked = ctx.session().check(&option).await;
        if ctx.record_soft(checked)? {
            ctx.soft_expect_checked(&option, &format!("Department {label}"))
                .await?;
        }
        tracing::info!(%label, "Department filter applied");
    }
    Ok(())
}

/// Select a price band if it is offered and enabled.
pub async fn filter_price<S: Session>(
    ctx: &mut ScenarioContext<S>,
    label: &str,
) -> Result<(), AppError> {
    if label.is_empty() {
        return Ok(());
    }
    let option = ctx.deals().price_option(label);
    let session = ctx.session();

    // Bands with no matching items render disabled.
    if !(session.is_visible(&option).await? && session.is_enabled(&option).await?) {
        tracing::debug!(%label, "Price band not selectable, skipping");
        return Ok(());
    }
    let clicked = session.click(&option).await;
    if ctx.record_soft(clicked)? {
        let marker = ctx.deals().price_selected_marker(label);
        ctx.soft_expect_visible(&marker, &format!("Price {label} selection"))
            .await?;
    }
    tracing::info!(%label, "Price filter applied");
    Ok(())
}

/// Apply a single filter axis.
pub async fn apply<S: Session>(
    ctx: &mut ScenarioContext<S>,
    spec: &FilterSpec,
) -> Result<(), AppError> {
    match spec {
        FilterSpec::Program(labels) => filter_program(ctx, labels).await,
        FilterSpec::Department(labels) => filter_department(ctx, labels).await,
        FilterSpec::Price(label) => filter_price(ctx, label).await,
    }
}

/// Apply program, department and price filters in that order.
///
/// Not atomic: a recorded failure in one axis does not undo or skip the
/// others.
pub async fn filter_products<S: Session>(
    ctx: &mut ScenarioContext<S>,
    filters: &DealFilters,
) -> Result<(), AppError> {
    for spec in filters.specs() {
        apply(ctx, &spec).await?;
    }
    Ok(())
}
