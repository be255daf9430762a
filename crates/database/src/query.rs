//! Read-side queries for the dashboard and listing API.
//!
//! All listings are ordered by most recently written first, then by name.

use sqlx::SqlitePool;

use crate::models::{CategoryCount, Contact, DailyCount};
use crate::Result;

/// Row limit used when the caller does not provide one.
pub const DEFAULT_LIMIT: i64 = 100;

/// Lookback window for the daily-added series when none is given.
pub const DEFAULT_DAILY_DAYS: u32 = 30;

/// Longest daily-added window served.
pub const MAX_DAILY_DAYS: u32 = 366;

/// Resolve a caller-supplied limit into a SQLite `LIMIT` value.
///
/// `None` falls back to [`DEFAULT_LIMIT`]; zero or negative means no limit,
/// which SQLite spells as `LIMIT -1`.
pub fn effective_limit(limit: Option<i64>) -> i64 {
    match limit {
        None => DEFAULT_LIMIT,
        Some(n) if n <= 0 => -1,
        Some(n) => n,
    }
}

/// List all contacts.
pub async fn list_contacts(pool: &SqlitePool, limit: Option<i64>) -> Result<Vec<Contact>> {
    let rows = sqlx::query_as::<_, Contact>(
        r#"
        SELECT *
        FROM contacts
        ORDER BY updated_at DESC, name
        LIMIT ?
        "#,
    )
    .bind(effective_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List contacts flagged as being in the target city.
pub async fn list_target_city(pool: &SqlitePool, limit: Option<i64>) -> Result<Vec<Contact>> {
    let rows = sqlx::query_as::<_, Contact>(
        r#"
        SELECT *
        FROM contacts
        WHERE is_target = 1
        ORDER BY updated_at DESC, name
        LIMIT ?
        "#,
    )
    .bind(effective_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List contacts anywhere in the target region, target city included.
pub async fn list_target_region(
    pool: &SqlitePool,
    region: &str,
    limit: Option<i64>,
) -> Result<Vec<Contact>> {
    let rows = sqlx::query_as::<_, Contact>(
        r#"
        SELECT *
        FROM contacts
        WHERE is_target = 1 OR lower(state) = lower(?)
        ORDER BY updated_at DESC, name
        LIMIT ?
        "#,
    )
    .bind(region.trim())
    .bind(effective_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List contacts carrying a category label.
pub async fn list_by_category(
    pool: &SqlitePool,
    category: &str,
    limit: Option<i64>,
) -> Result<Vec<Contact>> {
    let rows = sqlx::query_as::<_, Contact>(
        r#"
        SELECT *
        FROM contacts
        WHERE category = ?
        ORDER BY updated_at DESC, name
        LIMIT ?
        "#,
    )
    .bind(category)
    .bind(effective_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count contacts grouped by category label.
pub async fn count_by_category(pool: &SqlitePool) -> Result<Vec<CategoryCount>> {
    let rows = sqlx::query_as::<_, CategoryCount>(
        r#"
        SELECT category, COUNT(*) as count
        FROM contacts
        GROUP BY category
        ORDER BY count DESC, category
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count contacts by the day they were first stored, over the last `days`
/// days ending today.
///
/// Every day in the window is present, oldest first; days with no new
/// contacts count zero. `days` is clamped to `1..=MAX_DAILY_DAYS`.
pub async fn count_daily_added(pool: &SqlitePool, days: u32) -> Result<Vec<DailyCount>> {
    let days = days.clamp(1, MAX_DAILY_DAYS);
    let start = format!("-{} days", days - 1);

    let rows = sqlx::query_as::<_, DailyCount>(
        r#"
        WITH RECURSIVE window_days(day) AS (
            SELECT date('now', ?)
            UNION ALL
            SELECT date(day, '+1 day') FROM window_days WHERE day < date('now')
        )
        SELECT window_days.day AS day, COUNT(contacts.id) AS count
        FROM window_days
        LEFT JOIN contacts ON date(contacts.created_at) = window_days.day
        GROUP BY window_days.day
        ORDER BY window_days.day
        "#,
    )
    .bind(start)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{contact, Database, NewContact};

    async fn insert_created_days_ago(db: &Database, phone: &str, days_ago: u32) {
        let record = NewContact {
            phone: phone.to_string(),
            category: "Other_State".to_string(),
            raw_json: "{}".to_string(),
            ..Default::default()
        };
        contact::upsert_contact(db.pool(), &record).await.unwrap();

        sqlx::query(
            "UPDATE contacts SET created_at = strftime('%Y-%m-%d %H:%M:%f', 'now', ?) WHERE phone = ?",
        )
        .bind(format!("-{} days", days_ago))
        .bind(phone)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_count_daily_added_fills_missing_days() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        insert_created_days_ago(&db, "9000000001", 0).await;
        insert_created_days_ago(&db, "9000000002", 2).await;
        insert_created_days_ago(&db, "9000000003", 2).await;
        insert_created_days_ago(&db, "9000000004", 40).await;

        let daily = count_daily_added(db.pool(), 7).await.unwrap();
        let counts: Vec<i64> = daily.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 2, 0, 1]);

        let days: Vec<&str> = daily.iter().map(|d| d.day.as_str()).collect();
        let mut sorted = days.clone();
        sorted.sort();
        assert_eq!(days, sorted);

        // Out-of-range windows are clamped rather than rejected.
        assert_eq!(count_daily_added(db.pool(), 0).await.unwrap().len(), 1);
        assert_eq!(
            count_daily_added(db.pool(), 10_000).await.unwrap().len(),
            MAX_DAILY_DAYS as usize
        );
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None), 100);
        assert_eq!(effective_limit(Some(25)), 25);
        assert_eq!(effective_limit(Some(0)), -1);
        assert_eq!(effective_limit(Some(-5)), -1);
    }
}
