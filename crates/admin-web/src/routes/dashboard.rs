//! Dashboard routes.

use askama::Template;
use axum::extract::{Query, State};
use axum::Json;
use database::{query, Contact, DailyCount};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Number of contacts shown in the dashboard table.
const RECENT_LIMIT: i64 = 50;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub stats: Stats,
    /// Contacts added per day over the default window.
    pub daily: Vec<DailyCount>,
    /// Active category filter, empty for all.
    pub filter: String,
    pub contacts: Vec<ContactRow>,
}

/// Dashboard statistics.
#[derive(Clone, Serialize)]
pub struct Stats {
    pub contact_count: i64,
    pub target_city: String,
    pub target_region: String,
    pub target_city_count: i64,
    pub region_other_count: i64,
    pub other_count: i64,
    pub categories: Vec<CategoryStats>,
}

/// Statistics for a single category.
#[derive(Clone, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub contact_count: i64,
    /// Share of all contacts, in percent.
    pub percent: f64,
}

/// One row of the dashboard table.
#[derive(Clone)]
pub struct ContactRow {
    pub phone: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub category: String,
    pub updated_at: String,
}

impl From<Contact> for ContactRow {
    fn from(c: Contact) -> Self {
        Self {
            phone: c.phone,
            name: c.name.unwrap_or_default(),
            city: c.city.unwrap_or_default(),
            state: c.state.unwrap_or_default(),
            category: c.category,
            updated_at: c.updated_at,
        }
    }
}

/// Dashboard filter parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub category: Option<String>,
}

/// Daily-added query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DailyParams {
    /// Lookback window in days, 30 when absent.
    pub days: Option<u32>,
}

/// Render the dashboard page.
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<DashboardTemplate> {
    let stats = get_stats(&state).await?;
    let pool = state.db.pool();
    let daily = query::count_daily_added(pool, query::DEFAULT_DAILY_DAYS).await?;

    let filter = params
        .category
        .map(|c| c.trim().to_string())
        .unwrap_or_default();
    let contacts = if filter.is_empty() {
        query::list_contacts(pool, Some(RECENT_LIMIT)).await?
    } else {
        query::list_by_category(pool, &filter, Some(RECENT_LIMIT)).await?
    };

    Ok(DashboardTemplate {
        stats,
        daily,
        filter,
        contacts: contacts.into_iter().map(ContactRow::from).collect(),
    })
}

/// Get dashboard statistics as JSON.
pub async fn stats_api(State(state): State<AppState>) -> Result<Json<Stats>> {
    let stats = get_stats(&state).await?;
    Ok(Json(stats))
}

/// Get contacts added per day as JSON.
pub async fn daily_api(
    State(state): State<AppState>,
    Query(params): Query<DailyParams>,
) -> Result<Json<Vec<DailyCount>>> {
    let days = params.days.unwrap_or(query::DEFAULT_DAILY_DAYS);
    let daily = query::count_daily_added(state.db.pool(), days).await?;
    Ok(Json(daily))
}

/// Fetch statistics from the database.
async fn get_stats(state: &AppState) -> Result<Stats> {
    let pool = state.db.pool();

    let contact_count = database::contact::count_contacts(pool).await?;
    let counts = query::count_by_category(pool).await?;

    let city_label = state.target.city_label();
    let region_label = state.target.region_label();
    let count_of = |label: &str| {
        counts
            .iter()
            .find(|c| c.category == label)
            .map(|c| c.count)
            .unwrap_or(0)
    };
    let target_city_count = count_of(&city_label);
    let region_other_count = count_of(&region_label);

    let categories = counts
        .iter()
        .map(|c| CategoryStats {
            category: c.category.clone(),
            contact_count: c.count,
            percent: percent(c.count, contact_count),
        })
        .collect();

    Ok(Stats {
        contact_count,
        target_city: state.target.city.clone(),
        target_region: state.target.region.clone(),
        target_city_count,
        region_other_count,
        other_count: contact_count - target_city_count - region_other_count,
        categories,
    })
}

fn percent(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}
