use anyhow::Result;
use chrono::{Duration, Utc};

use super::emails::EmailRepository;
use crate::{
    detection,
    domain::{AttachmentType, Folder, NewEmail, Sender},
};

struct Sample {
    subject: &'static str,
    sender_name: &'static str,
    sender_email: &'static str,
    content: &'static str,
    hours_ago: i64,
    is_read: bool,
    attachment: Option<AttachmentType>,
}

const SAMPLES: &[Sample] = &[
    Sample {
        subject: "Weekly status meeting moved to Thursday",
        sender_name: "Sarah Johnson",
        sender_email: "sarah.j@company.example",
        content: "Hi team, a reminder that our weekly status meeting is on Thursday at 3pm in room B. \
                  Bring your project updates. Thanks!",
        hours_ago: 1,
        is_read: false,
        attachment: None,
    },
    Sample {
        subject: "Your order 45692 has shipped",
        sender_name: "Shop Express",
        sender_email: "orders@shopexpress.example",
        content: "Thanks for your purchase! Order 45692 has shipped and should arrive within 3-5 \
                  business days. Tracking number: TRK928374655.",
        hours_ago: 8,
        is_read: true,
        attachment: None,
    },
    Sample {
        subject: "Birthday gathering on Saturday",
        sender_name: "Alex Chen",
        sender_email: "alex.c@friends.example",
        content: "Hey! I'm having a small birthday gathering next Saturday at my place from 7pm. \
                  Would love to see you there for food, drinks and games.",
        hours_ago: 28,
        is_read: true,
        attachment: Some(AttachmentType::Image),
    },
    Sample {
        subject: "You have been selected!",
        sender_name: "Prize Department",
        sender_email: "prizes@winnersdraw.example",
        content: "CONGRATULATIONS!!! You are our lucky winner of a free iPhone. Click here to claim \
                  your prize now - limited time only. Call 555-123-4567.",
        hours_ago: 2,
        is_read: false,
        attachment: None,
    },
    Sample {
        subject: "Action required on your account",
        sender_name: "Account Service",
        sender_email: "security@accounts-verify.example",
        content: "URGENT: account suspended notice. Verify your account number and reset password \
                  immediately at http://secure-login.example.com or your bank account will be closed!!!",
        hours_ago: 5,
        is_read: false,
        attachment: None,
    },
    Sample {
        subject: "Work from home opportunity",
        sender_name: "Business Opportunity",
        sender_email: "wealth@richquick.example",
        content: "Make money fast and work from home! Earn cash with this investment opportunity - \
                  no risk, guaranteed success, double your income. Act now, spots are limited!!",
        hours_ago: 24,
        is_read: true,
        attachment: Some(AttachmentType::Image),
    },
];

impl EmailRepository {
    /// Fills an empty store with demo messages, scored by the detector.
    /// Returns how many were inserted.
    pub async fn seed_samples(&self) -> Result<usize> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        let now = Utc::now();
        for sample in SAMPLES {
            let analysis = detection::analyze(sample.content);
            let email = NewEmail {
                subject: sample.subject.to_string(),
                sender: Sender {
                    name: sample.sender_name.to_string(),
                    email: sample.sender_email.to_string(),
                },
                recipient: "user@example.com".to_string(),
                content: sample.content.to_string(),
                is_read: sample.is_read,
                is_spam: analysis.is_spam,
                spam_score: analysis.score,
                folder: Folder::for_verdict(analysis.is_spam),
                has_attachment: sample.attachment.is_some(),
                attachment_type: sample.attachment,
                attachment_url: sample.attachment.map(|_| "/placeholder.svg".to_string()),
            };
            self.insert_dated(email, now - Duration::hours(sample.hours_ago))
                .await?;
        }

        tracing::info!(target: "db", count = SAMPLES.len(), "seeded sample emails");
        Ok(SAMPLES.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_pool;

    #[tokio::test]
    async fn seeds_once_and_routes_by_score() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = EmailRepository::new(init_pool(&dir.path().join("mail.db")).await.expect("pool"));

        assert_eq!(repo.seed_samples().await.expect("seed"), SAMPLES.len());
        assert_eq!(repo.seed_samples().await.expect("seed"), 0);

        let spam = repo.list_by_folder(Folder::Spam).await.expect("list");
        let inbox = repo.list_by_folder(Folder::Inbox).await.expect("list");
        assert_eq!(spam.len(), 3);
        assert_eq!(inbox.len(), 3);
        assert!(inbox.iter().all(|email| email.spam_score == 0));
        assert!(spam.iter().all(|email| email.spam_score >= 70));
    }

    #[tokio::test]
    async fn analytics_over_seeded_mailbox() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = EmailRepository::new(init_pool(&dir.path().join("mail.db")).await.expect("pool"));
        repo.seed_samples().await.expect("seed");

        let analytics = repo.analytics().await.expect("analytics");
        assert_eq!(analytics.statistics.total_emails, 6);
        assert_eq!(analytics.statistics.spam_percentage, 50.0);
        assert_eq!(analytics.unread_inbox, 1);

        let buckets: Vec<_> = analytics
            .score_distribution
            .iter()
            .map(|bucket| (bucket.label, bucket.count))
            .collect();
        assert_eq!(
            buckets,
            vec![("0-20", 3), ("21-40", 0), ("41-60", 0), ("61-80", 0), ("81-100", 3)]
        );

        let keywords: Vec<_> = analytics
            .top_spam_keywords
            .iter()
            .map(|entry| (entry.keyword, entry.count))
            .collect();
        assert_eq!(
            keywords,
            vec![
                ("account", 4),
                ("limited", 2),
                ("free", 1),
                ("congratulations", 1),
                ("prize", 1),
                ("click", 1),
            ]
        );
    }
}
