//! Sample dashboard command.

use tokoku_core::admin::{AdminBoard, PANEL_ROWS};
use tracing::info;

/// Print the headline stats, recent orders and top products of the sample
/// admin board.
pub fn show() {
    let board = AdminBoard::sample();
    let stats = board.dashboard_stats();

    info!("Dashboard");
    info!("=========");
    info!(
        "Revenue: {} (+{:.1}%)",
        stats.total_revenue, stats.revenue_growth
    );
    info!("Orders: {} (+{:.1}%)", stats.total_orders, stats.order_growth);
    info!("Users: {}", stats.total_users);
    info!("Products: {}", stats.total_products);

    info!("Recent orders:");
    for order in board.recent_orders(PANEL_ROWS) {
        info!(
            "  {}  {}  {:<20}  {:>10}  {}",
            order.id,
            order.date,
            order.user_name,
            order.total.to_string(),
            order.status.label()
        );
    }

    info!("Top products:");
    for stats in board.top_products(PANEL_ROWS) {
        info!(
            "  {:<40}  {:>5} sold  {:>10}",
            stats.product_name,
            stats.sales,
            stats.revenue.to_string()
        );
    }
}
