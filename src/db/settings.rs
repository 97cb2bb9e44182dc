use sqlx::sqlite::SqlitePool;

/// Key under which the last observed contract transaction count is kept
pub const TRANSACTION_COUNT_KEY: &str = "transactionCount";

/// Insert or replace a setting
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a setting by key
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String,)>("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(value,)| value))
}

/// Persist the mirrored transaction count (string-encoded)
pub async fn store_transaction_count(pool: &SqlitePool, count: u64) -> Result<(), sqlx::Error> {
    set_setting(pool, TRANSACTION_COUNT_KEY, &count.to_string()).await
}

/// Last persisted transaction count; an unparsable value counts as absent
pub async fn load_transaction_count(pool: &SqlitePool) -> Result<Option<u64>, sqlx::Error> {
    let value = get_setting(pool, TRANSACTION_COUNT_KEY).await?;
    Ok(value.and_then(|v| v.trim().parse().ok()))
}
