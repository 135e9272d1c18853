//! Admin dashboard data.
//!
//! The board starts from fixed sample records. Dashboard actions change order
//! statuses and user roles; completed checkouts append new pending orders.
//! Nothing else is aggregated: the growth figures are constants.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, OrderId, OrderStatus, Price, ProductId, Role};

/// Rows shown in the "recent orders" and "top products" panels.
pub const PANEL_ROWS: usize = 5;

const REVENUE_GROWTH_PERCENT: f64 = 12.5;
const ORDER_GROWTH_PERCENT: f64 = 8.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: AccountId,
    pub user_name: String,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub date: NaiveDate,
    pub shipping_address: String,
}

impl Order {
    /// Sum of quantities over the order lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// A registered customer or admin as listed on the users tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub join_date: NaiveDate,
    pub last_login: NaiveDate,
    pub order_count: u32,
    pub total_spent: Price,
}

/// One day of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesData {
    pub date: NaiveDate,
    pub revenue: Price,
    pub orders: u32,
    pub customers: u32,
}

impl SalesData {
    /// Revenue as a whole percentage of `max`, for the bar chart.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bar_percent(&self, max: Price) -> u32 {
        if !max.is_positive() {
            return 0;
        }
        let percent = (self.revenue.to_f64() / max.to_f64() * 100.0).round();
        // Clamped to 0..=100 before the cast.
        percent.clamp(0.0, 100.0) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    pub product_id: ProductId,
    pub product_name: String,
    pub sales: u32,
    pub revenue: Price,
    pub stock: u32,
    pub rating: f64,
}

/// Headline numbers of the overview tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_revenue: Price,
    pub total_orders: u32,
    pub total_users: usize,
    pub total_products: usize,
    pub revenue_growth: f64,
    pub order_growth: f64,
}

/// All admin records.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminBoard {
    orders: Vec<Order>,
    users: Vec<AdminUser>,
    sales: Vec<SalesData>,
    product_stats: Vec<ProductStats>,
}

impl Default for AdminBoard {
    fn default() -> Self {
        Self::sample()
    }
}

impl AdminBoard {
    /// The sample data every fresh process starts with.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            orders: sample_orders(),
            users: sample_users(),
            sales: sample_sales(),
            product_stats: sample_product_stats(),
        }
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn users(&self) -> &[AdminUser] {
        &self.users
    }

    #[must_use]
    pub fn sales(&self) -> &[SalesData] {
        &self.sales
    }

    #[must_use]
    pub fn product_stats(&self) -> &[ProductStats] {
        &self.product_stats
    }

    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Returns whether the order exists.
    pub fn update_order_status(&mut self, id: &OrderId, status: OrderStatus) -> bool {
        self.orders
            .iter_mut()
            .find(|order| &order.id == id)
            .map(|order| order.status = status)
            .is_some()
    }

    /// Returns whether the user exists.
    pub fn update_user_role(&mut self, id: &AccountId, role: Role) -> bool {
        self.users
            .iter_mut()
            .find(|user| &user.id == id)
            .map(|user| user.role = role)
            .is_some()
    }

    /// Append a freshly placed order as pending.
    pub fn record_order(&mut self, mut order: Order) {
        order.status = OrderStatus::Pending;
        self.orders.push(order);
    }

    #[must_use]
    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats {
            total_revenue: self.sales.iter().map(|day| day.revenue).sum(),
            total_orders: self.sales.iter().map(|day| day.orders).sum(),
            total_users: self.users.len(),
            total_products: self.product_stats.len(),
            revenue_growth: REVENUE_GROWTH_PERCENT,
            order_growth: ORDER_GROWTH_PERCENT,
        }
    }

    /// Newest orders first.
    #[must_use]
    pub fn recent_orders(&self, limit: usize) -> Vec<Order> {
        let mut orders = self.orders.clone();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        orders.truncate(limit);
        orders
    }

    /// Highest revenue first.
    #[must_use]
    pub fn top_products(&self, limit: usize) -> Vec<ProductStats> {
        let mut stats = self.product_stats.clone();
        stats.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        stats.truncate(limit);
        stats
    }

    /// Orders with the given status, or all of them.
    #[must_use]
    pub fn orders_with_status(&self, status: Option<OrderStatus>) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|order| status.is_none_or(|status| order.status == status))
            .cloned()
            .collect()
    }

    /// Users whose username or email contains `term` (ignoring case),
    /// optionally restricted to one role.
    #[must_use]
    pub fn search_users(&self, term: &str, role: Option<Role>) -> Vec<AdminUser> {
        let term = term.trim().to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                user.username.to_lowercase().contains(&term)
                    || user.email.to_lowercase().contains(&term)
            })
            .filter(|user| role.is_none_or(|role| user.role == role))
            .cloned()
            .collect()
    }

    /// Largest daily revenue, used to scale the sales chart.
    #[must_use]
    pub fn max_sales_revenue(&self) -> Price {
        self.sales
            .iter()
            .map(|day| day.revenue)
            .max()
            .unwrap_or(Price::ZERO)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn item(product_id: i32, name: &str, quantity: u32, cents: i64) -> OrderItem {
    OrderItem {
        product_id: ProductId::new(product_id),
        product_name: name.to_string(),
        quantity,
        price: Price::from_cents(cents),
    }
}

fn sample_orders() -> Vec<Order> {
    vec![
        Order {
            id: OrderId::from("1"),
            user_id: AccountId::from("user1"),
            user_name: "John Doe".to_string(),
            items: vec![
                item(1, "Fjallraven Backpack", 1, 10995),
                item(2, "Mens T-Shirt", 2, 2230),
            ],
            total: Price::from_cents(15455),
            status: OrderStatus::Delivered,
            date: ymd(2024, 1, 15),
            shipping_address: "123 Main St, New York, NY".to_string(),
        },
        Order {
            id: OrderId::from("2"),
            user_id: AccountId::from("user2"),
            user_name: "Jane Smith".to_string(),
            items: vec![item(3, "Samsung TV", 1, 69999)],
            total: Price::from_cents(69999),
            status: OrderStatus::Processing,
            date: ymd(2024, 1, 16),
            shipping_address: "456 Oak Ave, Los Angeles, CA".to_string(),
        },
        Order {
            id: OrderId::from("3"),
            user_id: AccountId::from("user3"),
            user_name: "Mike Johnson".to_string(),
            items: vec![
                item(4, "WD Hard Drive", 1, 6499),
                item(5, "SanDisk SSD", 1, 10999),
            ],
            total: Price::from_cents(17498),
            status: OrderStatus::Shipped,
            date: ymd(2024, 1, 17),
            shipping_address: "789 Pine Rd, Chicago, IL".to_string(),
        },
    ]
}

fn sample_users() -> Vec<AdminUser> {
    let user = |id: &str,
                username: &str,
                email: &str,
                role,
                joined,
                last_login,
                order_count,
                spent_cents| AdminUser {
        id: AccountId::from(id),
        username: username.to_string(),
        email: email.to_string(),
        role,
        join_date: joined,
        last_login,
        order_count,
        total_spent: Price::from_cents(spent_cents),
    };
    vec![
        user(
            "user1",
            "john_doe",
            "john@example.com",
            Role::Customer,
            ymd(2023, 12, 1),
            ymd(2024, 1, 15),
            5,
            125_075,
        ),
        user(
            "user2",
            "jane_smith",
            "jane@example.com",
            Role::Customer,
            ymd(2023, 11, 15),
            ymd(2024, 1, 16),
            3,
            89_999,
        ),
        user(
            "user3",
            "admin_user",
            "admin@example.com",
            Role::Admin,
            ymd(2023, 10, 1),
            ymd(2024, 1, 17),
            0,
            0,
        ),
    ]
}

fn sample_sales() -> Vec<SalesData> {
    [
        (1, 1250, 8, 5),
        (2, 1890, 12, 8),
        (3, 2100, 15, 10),
        (4, 1750, 11, 7),
        (5, 2300, 16, 11),
        (6, 1950, 13, 9),
        (7, 2450, 18, 12),
    ]
    .into_iter()
    .map(|(day, revenue, orders, customers)| SalesData {
        date: ymd(2024, 1, day),
        revenue: Price::from(revenue),
        orders,
        customers,
    })
    .collect()
}

fn sample_product_stats() -> Vec<ProductStats> {
    [
        (1, "Fjallraven Backpack", 45, 494_775, 15, 4.5),
        (2, "Mens T-Shirt", 89, 198_470, 50, 4.2),
        (3, "Samsung TV", 23, 1_609_977, 8, 4.8),
        (4, "WD Hard Drive", 67, 435_433, 25, 4.1),
        (5, "SanDisk SSD", 34, 373_966, 12, 4.6),
    ]
    .into_iter()
    .map(
        |(id, name, sales, revenue_cents, stock, rating)| ProductStats {
            product_id: ProductId::new(id),
            product_name: name.to_string(),
            sales,
            revenue: Price::from_cents(revenue_cents),
            stock,
            rating,
        },
    )
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_order_totals_match_lines() {
        for order in AdminBoard::sample().orders() {
            let lines: Price = order.items.iter().map(|i| i.price * i.quantity).sum();
            assert_eq!(lines, order.total, "order {}", order.id);
        }
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = AdminBoard::sample().dashboard_stats();
        assert_eq!(stats.total_revenue, Price::from(13_690));
        assert_eq!(stats.total_orders, 93);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_products, 5);
        assert!((stats.revenue_growth - 12.5).abs() < f64::EPSILON);
        assert!((stats.order_growth - 8.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let board = AdminBoard::sample();
        let ids: Vec<String> = board
            .recent_orders(PANEL_ROWS)
            .iter()
            .map(|o| o.id.to_string())
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert_eq!(board.recent_orders(1).len(), 1);
    }

    #[test]
    fn test_top_products_by_revenue() {
        let names: Vec<String> = AdminBoard::sample()
            .top_products(3)
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        assert_eq!(names, vec!["Samsung TV", "Fjallraven Backpack", "WD Hard Drive"]);
    }

    #[test]
    fn test_update_order_status() {
        let mut board = AdminBoard::sample();
        assert!(board.update_order_status(&OrderId::from("2"), OrderStatus::Shipped));
        assert_eq!(
            board.order(&OrderId::from("2")).unwrap().status,
            OrderStatus::Shipped
        );
        assert!(!board.update_order_status(&OrderId::from("99"), OrderStatus::Shipped));
    }

    #[test]
    fn test_update_user_role() {
        let mut board = AdminBoard::sample();
        assert!(board.update_user_role(&AccountId::from("user1"), Role::Admin));
        assert_eq!(board.search_users("", Some(Role::Admin)).len(), 2);
        assert!(!board.update_user_role(&AccountId::from("nobody"), Role::Admin));
    }

    #[test]
    fn test_order_status_filter() {
        let board = AdminBoard::sample();
        assert_eq!(board.orders_with_status(None).len(), 3);
        let shipped = board.orders_with_status(Some(OrderStatus::Shipped));
        assert_eq!(shipped.len(), 1);
        assert_eq!(shipped[0].id, OrderId::from("3"));
        assert!(board.orders_with_status(Some(OrderStatus::Cancelled)).is_empty());
    }

    #[test]
    fn test_user_search_matches_username_or_email() {
        let board = AdminBoard::sample();
        assert_eq!(board.search_users("JANE", None).len(), 1);
        assert_eq!(board.search_users("example.com", None).len(), 3);
        assert_eq!(board.search_users("example.com", Some(Role::Customer)).len(), 2);
        assert!(board.search_users("zzz", None).is_empty());
    }

    #[test]
    fn test_record_order_is_pending() {
        let mut board = AdminBoard::sample();
        let mut order = board.orders()[0].clone();
        order.id = OrderId::from("ORD-1");
        order.status = OrderStatus::Delivered;
        board.record_order(order);

        assert_eq!(board.orders().len(), 4);
        assert_eq!(
            board.order(&OrderId::from("ORD-1")).unwrap().status,
            OrderStatus::Pending
        );
    }

    #[test]
    fn test_sales_chart_scaling() {
        let board = AdminBoard::sample();
        let max = board.max_sales_revenue();
        assert_eq!(max, Price::from(2450));
        assert_eq!(board.sales()[6].bar_percent(max), 100);
        assert_eq!(board.sales()[0].bar_percent(max), 51);
        assert_eq!(board.sales()[0].bar_percent(Price::ZERO), 0);
    }
}
