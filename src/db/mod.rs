use std::{path::Path, str::FromStr, time::Duration};

use anyhow::Result;
use sqlx::{
    query,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};

pub mod emails;
mod seed;

pub async fn init_pool(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    query(
        r#"
        CREATE TABLE IF NOT EXISTS emails (
            id TEXT PRIMARY KEY,
            subject TEXT NOT NULL,
            sender_name TEXT NOT NULL,
            sender_email TEXT NOT NULL,
            recipient TEXT NOT NULL,
            content TEXT NOT NULL,
            date DATETIME NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,
            is_spam INTEGER NOT NULL DEFAULT 0,
            spam_score INTEGER NOT NULL DEFAULT 0,
            folder TEXT NOT NULL DEFAULT 'inbox',
            has_attachment INTEGER NOT NULL DEFAULT 0,
            attachment_type TEXT,
            attachment_url TEXT
        )
        "#,
    )
    .execute(&pool)
    .await?;

    query(r#"CREATE INDEX IF NOT EXISTS idx_emails_folder ON emails (folder, date)"#)
        .execute(&pool)
        .await?;

    Ok(pool)
}
