//! Contact listing routes.
//!
//! `limit` follows the listing convention: absent means 100, zero or
//! negative means no limit.

use axum::extract::{Query, State};
use axum::Json;
use database::{query, Contact};
use serde::Deserialize;

use crate::error::{AdminError, Result};
use crate::state::AppState;

/// Query parameters for the general listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Only contacts with this category label.
    pub category: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for the target listings.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// List contacts, optionally filtered by category.
pub async fn list_api(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>> {
    let pool = state.db.pool();

    let rows = match params.category.as_deref() {
        Some(category) if category.trim().is_empty() => {
            return Err(AdminError::BadRequest("category cannot be empty".to_string()));
        }
        Some(category) => query::list_by_category(pool, category.trim(), params.limit).await?,
        None => query::list_contacts(pool, params.limit).await?,
    };

    Ok(Json(rows))
}

/// List contacts in the target city.
pub async fn target_city_api(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<Contact>>> {
    let rows = query::list_target_city(state.db.pool(), params.limit).await?;
    Ok(Json(rows))
}

/// List contacts anywhere in the target region.
pub async fn target_region_api(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<Contact>>> {
    let rows =
        query::list_target_region(state.db.pool(), &state.target.region, params.limit).await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{contact, Database, NewContact};
    use pipeline::TargetRegion;

    async fn test_state() -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        for (phone, state, category) in [
            ("9000000001", "maharashtra", "Pune"),
            ("9000000002", "maharashtra", "Maharashtra_Other"),
            ("9000000003", "delhi", "Other_State"),
        ] {
            let record = NewContact {
                phone: phone.to_string(),
                state: Some(state.to_string()),
                is_target: category == "Pune",
                category: category.to_string(),
                raw_json: "{}".to_string(),
                ..Default::default()
            };
            contact::upsert_contact(db.pool(), &record).await.unwrap();
        }

        AppState::new(db, TargetRegion::default())
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let state = test_state().await;
        let params = ListParams {
            category: Some("Other_State".to_string()),
            limit: None,
        };

        let Json(rows) = list_api(State(state), Query(params)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].phone, "9000000003");
    }

    #[tokio::test]
    async fn test_list_rejects_blank_category() {
        let state = test_state().await;
        let params = ListParams {
            category: Some(" ".to_string()),
            limit: None,
        };

        let result = list_api(State(state), Query(params)).await;
        assert!(matches!(result, Err(AdminError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_target_listings() {
        let state = test_state().await;

        let Json(city) = target_city_api(State(state.clone()), Query(LimitParams::default()))
            .await
            .unwrap();
        assert_eq!(city.len(), 1);

        let Json(region) = target_region_api(State(state.clone()), Query(LimitParams { limit: Some(0) }))
            .await
            .unwrap();
        assert_eq!(region.len(), 2);

        let Json(limited) = target_region_api(State(state), Query(LimitParams { limit: Some(1) }))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }
}
