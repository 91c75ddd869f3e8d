use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::{
    FromRow, Row, query, query_as,
    sqlite::{SqlitePool, SqliteRow},
};

use crate::domain::{
    analytics::{keyword_frequency, score_distribution},
    AttachmentType, Email, EmailUpdate, Folder, NewEmail, Sender, SpamAnalytics, SpamStatistics,
};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

const SELECT_COLUMNS: &str = r#"SELECT id, subject, sender_name, sender_email, recipient, content, date,
    is_read, is_spam, spam_score, folder, has_attachment, attachment_type, attachment_url
    FROM emails"#;

/// Folder-partitioned mail store.
#[derive(Clone)]
pub struct EmailRepository {
    pool: SqlitePool,
}

impl EmailRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn list_all(&self) -> Result<Vec<Email>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY date DESC");
        let rows = query_as::<_, EmailRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Email::from).collect())
    }

    pub async fn list_by_folder(&self, folder: Folder) -> Result<Vec<Email>> {
        let sql = format!("{SELECT_COLUMNS} WHERE folder = ?1 ORDER BY date DESC");
        let rows = query_as::<_, EmailRow>(&sql)
            .bind(folder.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Email::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Email>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = query_as::<_, EmailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Email::from))
    }

    pub async fn insert(&self, email: NewEmail) -> Result<Email> {
        self.insert_dated(email, Utc::now()).await
    }

    pub(crate) async fn insert_dated(&self, email: NewEmail, date: DateTime<Utc>) -> Result<Email> {
        let email = email.into_email(generate_id(), date);
        query(
            r#"INSERT INTO emails (id, subject, sender_name, sender_email, recipient, content, date,
                is_read, is_spam, spam_score, folder, has_attachment, attachment_type, attachment_url)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"#,
        )
        .bind(&email.id)
        .bind(&email.subject)
        .bind(&email.sender.name)
        .bind(&email.sender.email)
        .bind(&email.recipient)
        .bind(&email.content)
        .bind(email.date)
        .bind(email.is_read)
        .bind(email.is_spam)
        .bind(i64::from(email.spam_score))
        .bind(email.folder.as_str())
        .bind(email.has_attachment)
        .bind(email.attachment_type.map(|kind| kind.as_str()))
        .bind(email.attachment_url.as_deref())
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            target: "db",
            id = %email.id,
            folder = %email.folder,
            spam_score = email.spam_score,
            "email stored"
        );
        Ok(email)
    }

    /// Applies the set fields of `update`. Returns the updated email, or `None`
    /// when no email has this id.
    pub async fn update(&self, id: &str, update: EmailUpdate) -> Result<Option<Email>> {
        let (sender_name, sender_email) = match update.sender {
            Some(sender) => (Some(sender.name), Some(sender.email)),
            None => (None, None),
        };

        let affected = query(
            r#"UPDATE emails SET
                subject = COALESCE(?2, subject),
                sender_name = COALESCE(?3, sender_name),
                sender_email = COALESCE(?4, sender_email),
                recipient = COALESCE(?5, recipient),
                content = COALESCE(?6, content),
                is_read = COALESCE(?7, is_read),
                is_spam = COALESCE(?8, is_spam),
                spam_score = COALESCE(?9, spam_score),
                folder = COALESCE(?10, folder),
                has_attachment = COALESCE(?11, has_attachment),
                attachment_type = COALESCE(?12, attachment_type),
                attachment_url = COALESCE(?13, attachment_url)
                WHERE id = ?1"#,
        )
        .bind(id)
        .bind(update.subject)
        .bind(sender_name)
        .bind(sender_email)
        .bind(update.recipient)
        .bind(update.content)
        .bind(update.is_read)
        .bind(update.is_spam)
        .bind(update.spam_score.map(i64::from))
        .bind(update.folder.map(|folder| folder.as_str()))
        .bind(update.has_attachment)
        .bind(update.attachment_type.map(|kind| kind.as_str()))
        .bind(update.attachment_url)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Flags or clears spam and moves the email to the matching folder.
    pub async fn mark_spam(&self, id: &str, is_spam: bool) -> Result<Option<Email>> {
        self.update(
            id,
            EmailUpdate {
                is_spam: Some(is_spam),
                folder: Some(Folder::for_verdict(is_spam)),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn mark_read(&self, id: &str, is_read: bool) -> Result<Option<Email>> {
        self.update(
            id,
            EmailUpdate {
                is_read: Some(is_read),
                ..Default::default()
            },
        )
        .await
    }

    /// Moves the email to the trash folder.
    pub async fn soft_delete(&self, id: &str) -> Result<Option<Email>> {
        self.update(
            id,
            EmailUpdate {
                folder: Some(Folder::Trash),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn purge(&self, id: &str) -> Result<bool> {
        let affected = query(r#"DELETE FROM emails WHERE id = ?1"#)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = query_as(r#"SELECT COUNT(*) FROM emails"#)
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    pub async fn statistics(&self) -> Result<SpamStatistics> {
        let (total, spam): (i64, i64) =
            query_as(r#"SELECT COUNT(*), COALESCE(SUM(is_spam), 0) FROM emails"#)
                .fetch_one(&self.pool)
                .await?;
        Ok(SpamStatistics::from_counts(
            u64::try_from(total).unwrap_or(0),
            u64::try_from(spam).unwrap_or(0),
        ))
    }

    pub async fn unread_count(&self, folder: Folder) -> Result<u64> {
        let (count,): (i64,) =
            query_as(r#"SELECT COUNT(*) FROM emails WHERE folder = ?1 AND is_read = 0"#)
                .bind(folder.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Totals plus unread inbox count, score buckets over every email and the
    /// most frequent spam terms in the spam folder.
    pub async fn analytics(&self) -> Result<SpamAnalytics> {
        let statistics = self.statistics().await?;
        let unread_inbox = self.unread_count(Folder::Inbox).await?;

        let scores: Vec<(i64,)> = query_as(r#"SELECT spam_score FROM emails"#)
            .fetch_all(&self.pool)
            .await?;
        let score_distribution = score_distribution(
            scores
                .into_iter()
                .map(|(score,)| u32::try_from(score).unwrap_or(0)),
        );

        let spam: Vec<(String, String)> = query_as(
            r#"SELECT subject, content FROM emails WHERE folder = ?1 ORDER BY date DESC"#,
        )
        .bind(Folder::Spam.as_str())
        .fetch_all(&self.pool)
        .await?;
        let texts: Vec<String> = spam
            .into_iter()
            .map(|(subject, content)| format!("{subject} {content}"))
            .collect();
        let top_spam_keywords = keyword_frequency(texts.iter().map(String::as_str));

        Ok(SpamAnalytics {
            statistics,
            unread_inbox,
            score_distribution,
            top_spam_keywords,
        })
    }
}

fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

struct EmailRow(Email);

impl From<EmailRow> for Email {
    fn from(row: EmailRow) -> Self {
        row.0
    }
}

impl<'r> FromRow<'r, SqliteRow> for EmailRow {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let folder: String = row.try_get("folder")?;
        let folder = folder
            .parse::<Folder>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let attachment_type = row
            .try_get::<Option<String>, _>("attachment_type")?
            .map(|kind| kind.parse::<AttachmentType>())
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let spam_score: i64 = row.try_get("spam_score")?;

        Ok(Self(Email {
            id: row.try_get("id")?,
            subject: row.try_get("subject")?,
            sender: Sender {
                name: row.try_get("sender_name")?,
                email: row.try_get("sender_email")?,
            },
            recipient: row.try_get("recipient")?,
            content: row.try_get("content")?,
            date: row.try_get("date")?,
            is_read: row.try_get("is_read")?,
            is_spam: row.try_get("is_spam")?,
            spam_score: u32::try_from(spam_score).unwrap_or(0),
            folder,
            has_attachment: row.try_get("has_attachment")?,
            attachment_type,
            attachment_url: row.try_get("attachment_url")?,
        }))
    }
}
