//! Read-only reporting commands over a local catalog snapshot.

use portfolio_core::{FeedbackItem, FilterState, GovernanceConfig, NormalizedProduct};
use portfolio_pipeline::{
    aggregate, data_health_report, default_rules, evaluate, feedback_for_product,
    filter_products, group_products, project, sort_products, summarize_feedback, GroupKey,
    SortDirection, SortKey, WhatIfAdjustment,
};
use serde::Serialize;

/// Placeholder for values the product does not carry.
const DASH: &str = "\u{2014}";

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe_filters(filters: &FilterState) -> String {
    if filters.is_default() {
        "none".to_string()
    } else {
        format!("{} ({} active)", filters.to_query_string(), filters.active_count())
    }
}

fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| DASH.to_string(), |s| format!("{s:.0}"))
}

fn fmt_millions(value: Option<f64>) -> String {
    value.map_or_else(|| DASH.to_string(), |v| format!("{:.1}M", v / 1_000_000.0))
}

/// Dashboard tiles and chart series for the filtered portfolio.
pub(crate) fn run_summary(
    products: &[NormalizedProduct],
    filters: &FilterState,
    json: bool,
) -> anyhow::Result<()> {
    let filtered = filter_products(products, filters);
    let metrics = aggregate(&filtered);
    if json {
        return print_json(&metrics);
    }

    let summary = &metrics.summary;
    println!("# Portfolio Summary");
    println!();
    println!("**Filters**: {}", describe_filters(filters));
    println!("**Products**: {} of {}", summary.product_count, products.len());
    println!("**Mean readiness**: {:.1}", summary.mean_readiness);
    println!(
        "**Mean success probability**: {:.0}%",
        summary.mean_success_probability * 100.0
    );
    println!("**High risk**: {}", summary.high_risk_count);
    println!("**Commercial**: {}", summary.commercial_count);
    println!("**Total revenue target**: {:.0}", summary.total_revenue);
    println!();

    println!("## Readiness distribution");
    println!();
    for bucket in &metrics.readiness_histogram {
        println!("{:<8}{}", bucket.label, bucket.count);
    }
    println!();

    println!("## Success probability distribution");
    println!();
    for bucket in &metrics.success_histogram {
        println!("{:<8}{}", bucket.label, bucket.count);
    }
    println!();

    println!("## Risk by product type");
    println!();
    println!("{:<16}{:<6}{:<8}{:<6}TOTAL", "TYPE", "LOW", "MEDIUM", "HIGH");
    for row in &metrics.risk_by_type {
        println!(
            "{:<16}{:<6}{:<8}{:<6}{}",
            row.label(),
            row.low,
            row.medium,
            row.high,
            row.total
        );
    }
    println!();

    println!("## Revenue by product type (millions)");
    println!();
    println!("{:<16}{:<10}{:<10}AVERAGE", "TYPE", "PRODUCTS", "TOTAL");
    for row in &metrics.revenue_by_type {
        println!(
            "{:<16}{:<10}{:<10.1}{:.1}",
            row.label(),
            row.product_count,
            row.total_millions,
            row.average_millions
        );
    }
    println!();

    println!("## Lifecycle");
    println!();
    for stage in &metrics.lifecycle_distribution {
        println!("{:<14}{}", stage.stage, stage.count);
    }

    Ok(())
}

/// Filtered, sorted and optionally grouped product table.
pub(crate) fn run_list(
    products: &[NormalizedProduct],
    filters: &FilterState,
    sort: SortKey,
    direction: SortDirection,
    group_by: Option<GroupKey>,
    json: bool,
) -> anyhow::Result<()> {
    let sorted = sort_products(&filter_products(products, filters), sort, direction);

    match group_by {
        Some(key) => {
            let groups = group_products(&sorted, key);
            if json {
                return print_json(&groups);
            }
            for group in &groups {
                println!("## {} ({})", group.label(), group.products.len());
                print_table(&group.products);
                println!();
            }
        }
        None => {
            if json {
                return print_json(&sorted);
            }
            print_table(&sorted);
        }
    }
    Ok(())
}

fn print_table(products: &[NormalizedProduct]) {
    if products.is_empty() {
        println!("no products match the current filters");
        return;
    }
    println!(
        "{:<10}{:<26}{:<12}{:<13}{:<8}{:<10}{:<8}REVENUE",
        "ID", "NAME", "TYPE", "STAGE", "REGION", "READINESS", "RISK"
    );
    for p in products {
        println!(
            "{:<10}{:<26}{:<12}{:<13}{:<8}{:<10}{:<8}{}",
            p.id,
            p.name,
            p.product_type.as_deref().unwrap_or(DASH),
            p.lifecycle_stage.as_deref().unwrap_or(DASH),
            p.region.as_deref().unwrap_or(DASH),
            fmt_score(p.readiness_score()),
            p.risk_band_label().unwrap_or(DASH),
            fmt_millions(p.revenue_target),
        );
    }
}

/// Governance findings for the filtered portfolio, most severe first.
pub(crate) fn run_governance(
    products: &[NormalizedProduct],
    filters: &FilterState,
    config: &GovernanceConfig,
    json: bool,
) -> anyhow::Result<()> {
    let filtered = filter_products(products, filters);
    let rules = default_rules(config);
    let mut findings = evaluate(&rules, &filtered);
    // Stable, so rule then product order survives within a severity.
    findings.sort_by(|a, b| b.severity.cmp(&a.severity));
    if json {
        return print_json(&findings);
    }

    if findings.is_empty() {
        println!("no governance findings for {} products", filtered.len());
        return Ok(());
    }
    println!("{:<9}{:<28}{:<10}MESSAGE", "SEVERITY", "RULE", "PRODUCT");
    for f in &findings {
        println!(
            "{:<9}{:<28}{:<10}{}",
            f.severity.to_string(),
            f.rule_id,
            f.product_id,
            f.message
        );
    }
    Ok(())
}

/// Data-contract completeness per product.
pub(crate) fn run_health(
    products: &[NormalizedProduct],
    filters: &FilterState,
    json: bool,
) -> anyhow::Result<()> {
    let report = data_health_report(&filter_products(products, filters));
    if json {
        return print_json(&report);
    }

    println!(
        "mean score {:.1}, {} of {} products complete",
        report.mean_score,
        report.complete_count,
        report.products.len()
    );
    println!();
    println!("{:<10}{:<7}MISSING", "PRODUCT", "SCORE");
    for health in &report.products {
        let missing = if health.missing.is_empty() {
            DASH.to_string()
        } else {
            health.missing.join(", ")
        };
        println!("{:<10}{:<7}{}", health.product_id, health.score, missing);
    }
    Ok(())
}

/// Sentiment and theme rollup, for the whole portfolio or one product.
pub(crate) fn run_feedback(
    items: &[FeedbackItem],
    product_id: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let selected: Vec<FeedbackItem> = match product_id {
        Some(id) => feedback_for_product(items, id).into_iter().cloned().collect(),
        None => items.to_vec(),
    };
    let summary = summarize_feedback(&selected);
    if json {
        return print_json(&summary);
    }

    if selected.is_empty() {
        println!(
            "no feedback recorded{}",
            product_id
                .map(|id| format!(" for product '{id}'"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    let counts = &summary.by_sentiment;
    println!(
        "{} mentions: {} positive, {} neutral, {} negative; {} high-impact items",
        summary.total_mentions,
        counts.positive,
        counts.neutral,
        counts.negative,
        summary.high_impact_items
    );
    println!();
    println!("{:<18}{:<10}{:<7}{:<8}DOMINANT", "THEME", "MENTIONS", "ITEMS", "SCORE");
    for theme in &summary.themes {
        println!(
            "{:<18}{:<10}{:<7}{:<8.2}{}",
            theme.theme,
            theme.mentions,
            theme.items,
            theme.mean_sentiment_score,
            theme.dominant_sentiment
        );
    }
    Ok(())
}

/// Linear what-if projection for one product.
pub(crate) fn run_what_if(
    products: &[NormalizedProduct],
    product_id: &str,
    adjustment: WhatIfAdjustment,
    json: bool,
) -> anyhow::Result<()> {
    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| anyhow::anyhow!("product '{product_id}' not found in catalog"))?;
    let projection = project(product, adjustment);
    if json {
        return print_json(&projection);
    }

    println!("{} ({})", product.name, product.id);
    println!();
    println!("{:<22}{:<12}PROJECTED", "", "BASELINE");
    println!(
        "{:<22}{:<12.1}{:.1}",
        "readiness", projection.baseline_readiness, projection.projected_readiness
    );
    println!(
        "{:<22}{:<12.0}{:.0}",
        "revenue target", projection.baseline_revenue_target, projection.projected_revenue_target
    );
    let rows = [
        (
            "success probability",
            projection.baseline.success_probability,
            projection.projected.success_probability,
        ),
        (
            "revenue probability",
            projection.baseline.revenue_probability,
            projection.projected.revenue_probability,
        ),
        (
            "failure risk",
            projection.baseline.failure_risk,
            projection.projected.failure_risk,
        ),
    ];
    for (label, baseline, projected) in rows {
        println!("{label:<22}{baseline:<12.2}{projected:.2}");
    }
    Ok(())
}
