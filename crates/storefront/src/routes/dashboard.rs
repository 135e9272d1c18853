//! Admin dashboard route handlers.
//!
//! Every handler requires the admin role. The board holds sample data plus the
//! orders placed through checkout; nothing survives a restart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tokoku_core::admin::{AdminBoard, AdminUser, PANEL_ROWS, ProductStats, SalesData};
use tokoku_core::product::{CATEGORIES, Product, ProductDraft};
use tokoku_core::types::{AccountId, OrderId, OrderStatus, Price, Role};
use tokoku_core::validation::FieldErrors;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::products::SelectOption;
use crate::routes::{parse_product_id, redirect_back};
use crate::state::AppState;
use crate::views::{Layout, OrderView};

const PRODUCTS_TAB: &str = "/dashboard?tab=products";
const ORDERS_TAB: &str = "/dashboard?tab=orders";
const USERS_TAB: &str = "/dashboard?tab=users";

// =============================================================================
// Query & Form Types
// =============================================================================

/// Dashboard query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    pub tab: String,
    /// Order status filter, `all` or a status name.
    pub status: String,
    /// User search term.
    pub q: String,
    /// Role filter, `all` or a role name.
    pub role: String,
    /// Local product being edited.
    pub edit: String,
}

/// Order status change form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub status: String,
    pub return_to: String,
}

/// User role change form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleForm {
    pub role: String,
    pub return_to: String,
}

/// The dashboard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Products,
    Orders,
    Users,
}

impl Tab {
    pub const ALL: [Self; 4] = [Self::Overview, Self::Products, Self::Orders, Self::Users];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Users => "users",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Products => "Products",
            Self::Orders => "Orders",
            Self::Users => "Users",
        }
    }

    /// Unknown tabs show the overview.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == value.trim())
            .unwrap_or_default()
    }
}

const fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Customer => "Customer",
    }
}

/// `all` (or anything unparsable) means no filter.
fn parse_filter<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

// =============================================================================
// View Types
// =============================================================================

/// A tab in the dashboard navigation.
#[derive(Debug, Clone)]
pub struct TabLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// One bar of the sales chart.
#[derive(Debug, Clone)]
pub struct SalesBar {
    pub date: String,
    pub revenue: String,
    pub orders: u32,
    pub percent: u32,
}

impl SalesBar {
    fn new(day: &SalesData, max: Price) -> Self {
        Self {
            date: day.date.format("%b %d").to_string(),
            revenue: day.revenue.to_string(),
            orders: day.orders,
            percent: day.bar_percent(max),
        }
    }
}

/// A row of the top products table.
#[derive(Debug, Clone)]
pub struct TopProductRow {
    pub name: String,
    pub sales: u32,
    pub revenue: String,
    pub stock: u32,
    pub rating: String,
}

impl From<&ProductStats> for TopProductRow {
    fn from(stats: &ProductStats) -> Self {
        Self {
            name: stats.product_name.clone(),
            sales: stats.sales,
            revenue: stats.revenue.to_string(),
            stock: stats.stock,
            rating: format!("{:.1}", stats.rating),
        }
    }
}

/// The overview tab.
#[derive(Debug, Clone)]
pub struct OverviewPanel {
    pub total_revenue: String,
    pub total_orders: u32,
    pub total_users: usize,
    pub total_products: usize,
    pub revenue_growth: String,
    pub order_growth: String,
    pub sales: Vec<SalesBar>,
    pub top_products: Vec<TopProductRow>,
    pub recent_orders: Vec<OrderView>,
}

impl OverviewPanel {
    fn new(board: &AdminBoard) -> Self {
        let stats = board.dashboard_stats();
        let max = board.max_sales_revenue();
        Self {
            total_revenue: stats.total_revenue.to_string(),
            total_orders: stats.total_orders,
            total_users: stats.total_users,
            total_products: stats.total_products,
            revenue_growth: format!("+{:.1}%", stats.revenue_growth),
            order_growth: format!("+{:.1}%", stats.order_growth),
            sales: board.sales().iter().map(|day| SalesBar::new(day, max)).collect(),
            top_products: board
                .top_products(PANEL_ROWS)
                .iter()
                .map(TopProductRow::from)
                .collect(),
            recent_orders: board
                .recent_orders(PANEL_ROWS)
                .iter()
                .map(OrderView::from)
                .collect(),
        }
    }
}

/// Inline messages for the product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductErrors {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl From<&FieldErrors> for ProductErrors {
    fn from(errors: &FieldErrors) -> Self {
        let get = |field: &str| errors.get(field).map(str::to_owned);
        Self {
            title: get("title"),
            price: get("price"),
            description: get("description"),
            category: get("category"),
            image: get("image"),
        }
    }
}

/// The create or edit form for a local product.
#[derive(Debug, Clone)]
pub struct ProductFormView {
    pub action: String,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub editing: bool,
    pub draft: ProductDraft,
    pub categories: Vec<SelectOption>,
    pub errors: ProductErrors,
}

impl ProductFormView {
    fn create(draft: ProductDraft, errors: &FieldErrors) -> Self {
        Self::build("/dashboard/products".to_string(), false, draft, errors)
    }

    fn edit(id: i32, draft: ProductDraft, errors: &FieldErrors) -> Self {
        Self::build(format!("/dashboard/products/{id}"), true, draft, errors)
    }

    fn build(action: String, editing: bool, draft: ProductDraft, errors: &FieldErrors) -> Self {
        let categories = CATEGORIES
            .iter()
            .map(|&category| SelectOption {
                value: category.to_string(),
                label: category.to_string(),
                selected: draft.category == category,
            })
            .collect();
        Self {
            action,
            heading: if editing { "Edit product" } else { "Add product" },
            submit_label: if editing { "Save changes" } else { "Add product" },
            editing,
            draft,
            categories,
            errors: ProductErrors::from(errors),
        }
    }
}

/// A local product in the products tab.
#[derive(Debug, Clone)]
pub struct LocalProductRow {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub category: String,
    pub image: String,
}

impl From<&Product> for LocalProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            image: product.image.clone(),
        }
    }
}

/// The products tab.
#[derive(Debug, Clone)]
pub struct ProductsPanel {
    pub products: Vec<LocalProductRow>,
    pub form: ProductFormView,
}

/// An order with its status picker.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub order: OrderView,
    pub statuses: Vec<SelectOption>,
}

/// The orders tab.
#[derive(Debug, Clone)]
pub struct OrdersPanel {
    pub filter: Vec<SelectOption>,
    pub orders: Vec<OrderRow>,
    pub return_to: String,
}

/// A user with the role picker.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub join_date: String,
    pub last_login: String,
    pub order_count: u32,
    pub total_spent: String,
    pub roles: Vec<SelectOption>,
}

impl From<&AdminUser> for UserRow {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            join_date: user.join_date.format("%Y-%m-%d").to_string(),
            last_login: user.last_login.format("%Y-%m-%d").to_string(),
            order_count: user.order_count,
            total_spent: user.total_spent.to_string(),
            roles: role_options(Some(user.role), false),
        }
    }
}

/// The users tab.
#[derive(Debug, Clone)]
pub struct UsersPanel {
    pub q: String,
    pub filter: Vec<SelectOption>,
    pub users: Vec<UserRow>,
    pub return_to: String,
}

fn status_options(selected: Option<OrderStatus>, with_all: bool) -> Vec<SelectOption> {
    let all = with_all.then(|| SelectOption {
        value: "all".to_string(),
        label: "All statuses".to_string(),
        selected: selected.is_none(),
    });
    all.into_iter()
        .chain(OrderStatus::ALL.into_iter().map(|status| SelectOption {
            value: status.as_str().to_string(),
            label: status.label().to_string(),
            selected: selected == Some(status),
        }))
        .collect()
}

fn role_options(selected: Option<Role>, with_all: bool) -> Vec<SelectOption> {
    let all = with_all.then(|| SelectOption {
        value: "all".to_string(),
        label: "All roles".to_string(),
        selected: selected.is_none(),
    });
    all.into_iter()
        .chain([Role::Admin, Role::Customer].into_iter().map(|role| SelectOption {
            value: role.as_str().to_string(),
            label: role_label(role).to_string(),
            selected: selected == Some(role),
        }))
        .collect()
}

/// Admin dashboard template. Only the active tab's panel is filled in.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub tabs: Vec<TabLink>,
    pub overview: Option<OverviewPanel>,
    pub products: Option<ProductsPanel>,
    pub orders: Option<OrdersPanel>,
    pub users: Option<UsersPanel>,
}

impl DashboardTemplate {
    fn new(layout: Layout, tab: Tab) -> Self {
        Self {
            layout,
            tabs: Tab::ALL
                .into_iter()
                .map(|t| TabLink {
                    label: t.label(),
                    href: format!("/dashboard?tab={}", t.as_str()),
                    active: t == tab,
                })
                .collect(),
            overview: None,
            products: None,
            orders: None,
            users: None,
        }
    }
}

/// Build the page for `query`. `form` replaces the products tab form when a
/// submission is re-rendered with errors.
fn dashboard_page(
    state: &AppState,
    layout: Layout,
    query: &DashboardQuery,
    form: Option<ProductFormView>,
) -> Result<DashboardTemplate> {
    let tab = if form.is_some() {
        Tab::Products
    } else {
        Tab::parse_or_default(&query.tab)
    };
    let mut page = DashboardTemplate::new(layout, tab);

    match tab {
        Tab::Overview => {
            let board = state.admin()?;
            page.overview = Some(OverviewPanel::new(&board));
        }
        Tab::Products => {
            let local = state.local_products()?;
            let form = form.unwrap_or_else(|| {
                let editing = query
                    .edit
                    .trim()
                    .parse()
                    .ok()
                    .and_then(|id| local.get(id));
                match editing {
                    Some(product) => ProductFormView::edit(
                        product.id.as_i32(),
                        ProductDraft::from_product(product),
                        &FieldErrors::new(),
                    ),
                    None => ProductFormView::create(ProductDraft::default(), &FieldErrors::new()),
                }
            });
            page.products = Some(ProductsPanel {
                products: local.list().iter().map(LocalProductRow::from).collect(),
                form,
            });
        }
        Tab::Orders => {
            let filter = parse_filter::<OrderStatus>(&query.status);
            let orders = state
                .admin()?
                .orders_with_status(filter)
                .iter()
                .map(|order| OrderRow {
                    order: OrderView::from(order),
                    statuses: status_options(Some(order.status), false),
                })
                .collect();
            page.orders = Some(OrdersPanel {
                filter: status_options(filter, true),
                orders,
                return_to: format!(
                    "{ORDERS_TAB}&status={}",
                    filter.map_or("all", OrderStatus::as_str)
                ),
            });
        }
        Tab::Users => {
            let filter = parse_filter::<Role>(&query.role);
            let users = state
                .admin()?
                .search_users(&query.q, filter)
                .iter()
                .map(UserRow::from)
                .collect();
            page.users = Some(UsersPanel {
                q: query.q.trim().to_string(),
                filter: role_options(filter, true),
                users,
                return_to: format!("{USERS_TAB}&role={}", filter.map_or("all", Role::as_str)),
            });
        }
    }
    Ok(page)
}

// =============================================================================
// Routes
// =============================================================================

/// Display the dashboard.
#[instrument(skip(state, admin, layout), fields(admin = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    layout: Layout,
    Query(query): Query<DashboardQuery>,
) -> Result<DashboardTemplate> {
    dashboard_page(&state, layout, &query, None)
}

/// Change an order's status.
#[instrument(skip(state, admin, form), fields(admin = %admin.id))]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown order status: {}", form.status)))?;
    let id = OrderId::from(id);

    if !state.admin_mut()?.update_order_status(&id, status) {
        return Err(AppError::NotFound(format!("order {id}")));
    }
    tracing::info!(order_id = %id, status = %status, "Order status updated");
    add_breadcrumb("admin", "Order status updated", Some(&[("order_id", id.as_str())]));

    Ok(redirect_back(&form.return_to, ORDERS_TAB))
}

/// Change a user's role.
#[instrument(skip(state, admin, form), fields(admin = %admin.id))]
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<RoleForm>,
) -> Result<Redirect> {
    let role: Role = form
        .role
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown role: {}", form.role)))?;
    let id = AccountId::from(id);

    if !state.admin_mut()?.update_user_role(&id, role) {
        return Err(AppError::NotFound(format!("user {id}")));
    }
    tracing::info!(user_id = %id, role = %role, "User role updated");

    Ok(redirect_back(&form.return_to, USERS_TAB))
}

/// Create a local product.
#[instrument(skip(state, admin, layout, draft), fields(admin = %admin.id))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    layout: Layout,
    Form(draft): Form<ProductDraft>,
) -> Result<Response> {
    match draft.validate() {
        Ok(fields) => {
            let product = state.local_products_mut()?.add(fields);
            tracing::info!(product_id = %product.id, "Local product created");
            Ok(Redirect::to(PRODUCTS_TAB).into_response())
        }
        Err(errors) => {
            let form = ProductFormView::create(draft, &errors);
            invalid_product_form(&state, layout, form)
        }
    }
}

/// Update a local product.
#[instrument(skip(state, admin, layout, draft), fields(admin = %admin.id))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    layout: Layout,
    Path(id): Path<String>,
    Form(draft): Form<ProductDraft>,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    match draft.validate() {
        Ok(fields) => {
            if state.local_products_mut()?.update(id, fields).is_none() {
                return Err(AppError::NotFound(format!("product {id}")));
            }
            tracing::info!(product_id = %id, "Local product updated");
            Ok(Redirect::to(PRODUCTS_TAB).into_response())
        }
        Err(errors) => {
            let form = ProductFormView::edit(id.as_i32(), draft, &errors);
            invalid_product_form(&state, layout, form)
        }
    }
}

/// Delete a local product.
#[instrument(skip(state, admin), fields(admin = %admin.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_product_id(&id)?;
    if !state.local_products_mut()?.delete(id) {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    tracing::info!(product_id = %id, "Local product deleted");
    Ok(Redirect::to(PRODUCTS_TAB))
}

fn invalid_product_form(
    state: &AppState,
    layout: Layout,
    form: ProductFormView,
) -> Result<Response> {
    let page = dashboard_page(state, layout, &DashboardQuery::default(), Some(form))?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}
