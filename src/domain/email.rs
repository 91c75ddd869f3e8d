use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    Inbox,
    Spam,
    Trash,
}

impl Folder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Inbox => "inbox",
            Folder::Spam => "spam",
            Folder::Trash => "trash",
        }
    }

    pub fn for_verdict(is_spam: bool) -> Self {
        if is_spam {
            Folder::Spam
        } else {
            Folder::Inbox
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseKindError {
    kind: &'static str,
    value: String,
}

impl FromStr for Folder {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inbox" => Ok(Folder::Inbox),
            "spam" => Ok(Folder::Spam),
            "trash" => Ok(Folder::Trash),
            _ => Err(ParseKindError {
                kind: "folder",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    Image,
    Document,
    Other,
}

impl AttachmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentType::Image => "image",
            AttachmentType::Document => "document",
            AttachmentType::Other => "other",
        }
    }
}

impl FromStr for AttachmentType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(AttachmentType::Image),
            "document" => Ok(AttachmentType::Document),
            "other" => Ok(AttachmentType::Other),
            _ => Err(ParseKindError {
                kind: "attachment type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    pub subject: String,
    pub sender: Sender,
    pub recipient: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub is_read: bool,
    pub is_spam: bool,
    pub spam_score: u32,
    pub folder: Folder,
    pub has_attachment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_type: Option<AttachmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

/// An email before the store assigns its id and date.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmail {
    pub subject: String,
    pub sender: Sender,
    pub recipient: String,
    pub content: String,
    pub is_read: bool,
    pub is_spam: bool,
    pub spam_score: u32,
    pub folder: Folder,
    pub has_attachment: bool,
    pub attachment_type: Option<AttachmentType>,
    pub attachment_url: Option<String>,
}

impl NewEmail {
    pub fn into_email(self, id: String, date: DateTime<Utc>) -> Email {
        Email {
            id,
            subject: self.subject,
            sender: self.sender,
            recipient: self.recipient,
            content: self.content,
            date,
            is_read: self.is_read,
            is_spam: self.is_spam,
            spam_score: self.spam_score,
            folder: self.folder,
            has_attachment: self.has_attachment,
            attachment_type: self.attachment_type,
            attachment_url: self.attachment_url,
        }
    }
}

/// Incoming message that has not been scored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailDraft {
    pub subject: String,
    pub sender: Sender,
    pub recipient: String,
    pub content: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub kind: AttachmentType,
    pub url: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailUpdate {
    pub subject: Option<String>,
    pub sender: Option<Sender>,
    pub recipient: Option<String>,
    pub content: Option<String>,
    pub is_read: Option<bool>,
    pub is_spam: Option<bool>,
    pub spam_score: Option<u32>,
    pub folder: Option<Folder>,
    pub has_attachment: Option<bool>,
    pub attachment_type: Option<AttachmentType>,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamStatistics {
    pub total_emails: u64,
    pub spam_emails: u64,
    pub regular_emails: u64,
    /// Rounded to one decimal place.
    pub spam_percentage: f64,
}

impl SpamStatistics {
    pub fn from_counts(total_emails: u64, spam_emails: u64) -> Self {
        let spam_percentage = if total_emails > 0 {
            (spam_emails as f64 / total_emails as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            total_emails,
            spam_emails,
            regular_emails: total_emails.saturating_sub(spam_emails),
            spam_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_parses_case_insensitively() {
        assert_eq!("Inbox".parse::<Folder>().ok(), Some(Folder::Inbox));
        assert_eq!(" spam ".parse::<Folder>().ok(), Some(Folder::Spam));
        assert!("archive".parse::<Folder>().is_err());
        assert_eq!(Folder::for_verdict(true), Folder::Spam);
    }

    #[test]
    fn statistics_round_to_one_decimal() {
        let stats = SpamStatistics::from_counts(3, 1);
        assert_eq!(stats.regular_emails, 2);
        assert_eq!(stats.spam_percentage, 33.3);
        assert_eq!(SpamStatistics::from_counts(0, 0).spam_percentage, 0.0);
        assert_eq!(SpamStatistics::from_counts(7, 3).spam_percentage, 42.9);
    }
}
