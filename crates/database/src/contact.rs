//! Contact writes and point lookups.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Contact, NewContact};
use crate::validation::{validate_category, validate_phone_key};

/// Insert a contact, or overwrite the existing row with the same phone.
///
/// Runs as a single `INSERT .. ON CONFLICT` statement so concurrent writers
/// racing on one phone cannot produce duplicates. Every column except `id`
/// and `created_at` is replaced by the incoming values.
pub async fn upsert_contact(pool: &SqlitePool, contact: &NewContact) -> Result<()> {
    validate_phone_key(&contact.phone)?;
    validate_category(&contact.category)?;

    sqlx::query(
        r#"
        INSERT INTO contacts (
            phone, e164_phone, timestamp_ms, batch_id, uid,
            lookup_success, lookup_confidence, lookup_latency_ms,
            name, operator, phone_type, website,
            address, result_loc, belong_area,
            city, state, country, is_target, category, raw_json
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(phone) DO UPDATE SET
            e164_phone = excluded.e164_phone,
            timestamp_ms = excluded.timestamp_ms,
            batch_id = excluded.batch_id,
            uid = excluded.uid,
            lookup_success = excluded.lookup_success,
            lookup_confidence = excluded.lookup_confidence,
            lookup_latency_ms = excluded.lookup_latency_ms,
            name = excluded.name,
            operator = excluded.operator,
            phone_type = excluded.phone_type,
            website = excluded.website,
            address = excluded.address,
            result_loc = excluded.result_loc,
            belong_area = excluded.belong_area,
            city = excluded.city,
            state = excluded.state,
            country = excluded.country,
            is_target = excluded.is_target,
            category = excluded.category,
            raw_json = excluded.raw_json,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        "#,
    )
    .bind(contact.phone.trim())
    .bind(&contact.e164_phone)
    .bind(contact.timestamp_ms)
    .bind(&contact.batch_id)
    .bind(&contact.uid)
    .bind(contact.lookup_success)
    .bind(contact.lookup_confidence)
    .bind(contact.lookup_latency_ms)
    .bind(&contact.name)
    .bind(&contact.operator)
    .bind(&contact.phone_type)
    .bind(&contact.website)
    .bind(&contact.address)
    .bind(&contact.result_loc)
    .bind(&contact.belong_area)
    .bind(&contact.city)
    .bind(&contact.state)
    .bind(&contact.country)
    .bind(contact.is_target)
    .bind(&contact.category)
    .bind(&contact.raw_json)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_write("Contact", e))?;

    Ok(())
}

/// Get a contact by its phone key.
pub async fn get_contact(pool: &SqlitePool, phone: &str) -> Result<Contact> {
    sqlx::query_as::<_, Contact>(
        r#"
        SELECT *
        FROM contacts
        WHERE phone = ?
        "#,
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Contact",
        id: phone.to_string(),
    })
}

/// Count total contacts.
pub async fn count_contacts(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM contacts
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
