use anyhow::Context;
use deal_scout::session::DashboardState;
use deal_scout::sources::{self, ApiClient, DealQuery, DealSource, SalesQuery, SnapshotSource};
use deal_scout::view::{project, sales_panel};
use deal_scout::{DashboardConfig, ScoringRules};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🧱 Deal Scout - deals and resale indicators");
    info!("==========================================");

    let config = DashboardConfig::from_env()?;

    let source: Box<dyn DealSource> = match &config.snapshot_path {
        Some(path) => Box::new(SnapshotSource::load(path).await?),
        None => Box::new(ApiClient::with_base_url(&config.api_base, config.request_timeout)?),
    };
    info!("Using {} source", source.source_name());

    let query = DealQuery {
        size: config.page_size,
        ..Default::default()
    };
    let state = DashboardState::new(ScoringRules::default())
        .load(source.as_ref(), query)
        .await;

    info!(
        "\n✅ Page {}/{} - {} deals in total\n",
        state.pagination.current_page, state.pagination.page_count, state.pagination.count
    );

    for (i, deal) in state.best_deals(config.top_n).iter().enumerate() {
        let price = deal
            .price
            .map(|p| format!("{:.2} €", p))
            .unwrap_or_else(|| "?".to_string());
        println!("{}. {} ({})", i + 1, deal.title, price);
        println!("   Score: {}/4", state.rules.score(deal));
        if let Some(discount) = deal.discount {
            println!("   Discount: {}%", discount);
        }
        if let Some(id) = &deal.id {
            println!("   ID: {}", id);
        }
        println!("   URL: {}", deal.link);
        println!();
    }

    // Resale indicators for the first product on the page
    let sales = match state.product_ids().first() {
        Some(product_id) => {
            let sales_query = SalesQuery::new(product_id.clone(), config.sales_limit);
            let listings = sources::fetch_sales(source.as_ref(), &sales_query).await;
            let statistics = deal_scout::compute_statistics(&listings);

            println!("Resale listings for {}: {}", product_id, statistics.count);
            println!(
                "   p5 {:.2} € | p25 {:.2} € | p50 {:.2} €",
                statistics.p5, statistics.p25, statistics.p50
            );
            println!("   Lifetime: {} days", statistics.lifetime_days);

            Some(sales_panel(product_id, statistics, &listings))
        }
        None => {
            warn!("No product id on this page, skipping resale indicators");
            None
        }
    };

    let view = project(&state, config.top_n, sales);
    let json = serde_json::to_string_pretty(&view)?;
    tokio::fs::write(&config.output_path, json)
        .await
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    info!("💾 Saved dashboard view to {}", config.output_path.display());

    Ok(())
}
