use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::io::AsyncReadExt;

use crate::{
    cli::Command,
    config::AppConfig,
    db::{self, emails::EmailRepository},
    detection::Marker,
    domain::{Attachment, AttachmentType, Email, EmailDraft, Folder, ScanReport, Sender, SpamAnalytics},
    infrastructure::directories::ResolvedPaths,
    ocr::{ImageUpload, OcrClient},
    pipeline::{self, Scanner},
};

pub struct SpamLensApp {
    config: Arc<AppConfig>,
    repo: EmailRepository,
    ocr: OcrClient,
}

impl SpamLensApp {
    pub async fn initialize(config: AppConfig, paths: &ResolvedPaths) -> Result<Self> {
        let config = Arc::new(config);
        let pool = db::init_pool(&paths.db_path)
            .await
            .with_context(|| format!("failed to open {}", paths.db_path.display()))?;
        tracing::debug!(target: "db", path = %paths.db_path.display(), "mail store opened");
        let repo = EmailRepository::new(pool);
        if config.seed_samples {
            repo.seed_samples().await?;
        }

        let http_client = Client::builder()
            .user_agent(format!("spamlens/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let ocr = OcrClient::new(http_client, config.ocr.clone());

        Ok(Self {
            config,
            repo,
            ocr,
        })
    }

    pub async fn run(self, command: Command) -> Result<()> {
        let result = self.dispatch(command).await;
        self.repo.close().await;
        result
    }

    fn scanner(&self, json: bool) -> Scanner<OcrClient> {
        let marker = if json { Marker::HTML } else { Marker::ANSI };
        Scanner::new(self.ocr.clone(), self.config.ocr.concurrency).with_marker(marker)
    }

    async fn dispatch(&self, command: Command) -> Result<()> {
        match command {
            Command::Analyze { text, file, json } => {
                let text = read_input(text, file.as_deref()).await?;
                let report = self.scanner(json).scan_text(&text);
                print_report(None, &report, json)
            }
            Command::ScanImage { paths, json } => self.scan_images(&paths, json).await,
            Command::Ingest {
                subject,
                from_name,
                from_email,
                to,
                content,
                content_file,
                image,
            } => {
                let content = read_input(content, content_file.as_deref()).await?;
                let (attachment, attachment_text) = match image {
                    Some(path) => {
                        let text = self.extract_attachment(&path).await?;
                        let attachment = Attachment {
                            kind: AttachmentType::Image,
                            url: path.display().to_string(),
                        };
                        (Some(attachment), Some(text))
                    }
                    None => (None, None),
                };
                let draft = EmailDraft {
                    subject,
                    sender: Sender {
                        name: from_name,
                        email: from_email,
                    },
                    recipient: to,
                    content,
                    attachment,
                };
                let email = pipeline::file_email(&self.repo, draft, attachment_text.as_deref()).await?;
                println!(
                    "{} filed to {} (score {}/100)",
                    email.id, email.folder, email.spam_score
                );
                Ok(())
            }
            Command::List { folder, json } => {
                let emails = match folder {
                    Some(folder) => self.repo.list_by_folder(folder).await?,
                    None => self.repo.list_all().await?,
                };
                if json {
                    return print_json(&emails);
                }
                if emails.is_empty() {
                    println!("no messages");
                }
                for email in &emails {
                    println!("{}", self.summary_line(email));
                }
                Ok(())
            }
            Command::Show { id, json } => {
                let email = self
                    .repo
                    .mark_read(&id, true)
                    .await?
                    .with_context(|| format!("no email with id {id}"))?;
                if json {
                    return print_json(&email);
                }
                self.print_email(&email);
                Ok(())
            }
            Command::MarkSpam { id, not_spam } => {
                let email = require(self.repo.mark_spam(&id, !not_spam).await?, &id)?;
                println!("{} moved to {}", email.id, email.folder);
                Ok(())
            }
            Command::MarkRead { id, unread } => {
                let email = require(self.repo.mark_read(&id, !unread).await?, &id)?;
                let state = if email.is_read { "read" } else { "unread" };
                println!("{} marked {state}", email.id);
                Ok(())
            }
            Command::Delete { id } => {
                let email = require(self.repo.soft_delete(&id).await?, &id)?;
                println!("{} moved to {}", email.id, Folder::Trash);
                Ok(())
            }
            Command::Purge { id } => {
                if !self.repo.purge(&id).await? {
                    bail!("no email with id {id}");
                }
                println!("{id} deleted permanently");
                Ok(())
            }
            Command::Stats { json } => {
                let analytics = self.repo.analytics().await?;
                if json {
                    return print_json(&analytics);
                }
                print_statistics(&analytics);
                Ok(())
            }
        }
    }

    async fn scan_images(&self, paths: &[PathBuf], json: bool) -> Result<()> {
        let mut uploads = Vec::with_capacity(paths.len());
        let mut failures = 0usize;
        for path in paths {
            match ImageUpload::from_path(path, self.config.ocr.max_image_bytes).await {
                Ok(upload) => uploads.push(upload),
                Err(err) => {
                    failures += 1;
                    eprintln!("{}: {err}", path.display());
                }
            }
        }

        let scanner = self.scanner(json);
        let results = scanner.scan_images(&uploads).await;
        for (upload, result) in uploads.iter().zip(results) {
            match result {
                Ok(report) => print_report(Some(&upload.file_name), &report, json)?,
                Err(err) => {
                    failures += 1;
                    eprintln!("{err}");
                }
            }
        }

        if failures > 0 {
            bail!("{failures} of {} images could not be scanned", paths.len());
        }
        Ok(())
    }

    async fn extract_attachment(&self, path: &Path) -> Result<String> {
        let upload = ImageUpload::from_path(path, self.config.ocr.max_image_bytes).await?;
        let output = self
            .ocr
            .recognize(&upload)
            .await
            .with_context(|| format!("failed to extract text from image {}", upload.file_name))?;
        Ok(output.text)
    }

    fn summary_line(&self, email: &Email) -> String {
        let date = email.date.with_timezone(&self.config.timezone);
        let unread = if email.is_read { ' ' } else { '*' };
        let attachment = if email.has_attachment { " [att]" } else { "" };
        format!(
            "{unread} {}  {:<5}  {}  {:>3}  {:<24}  {}{attachment}",
            email.id,
            email.folder.as_str(),
            date.format("%Y-%m-%d %H:%M"),
            email.spam_score,
            truncate(&email.sender.name, 24),
            email.subject,
        )
    }

    fn print_email(&self, email: &Email) {
        let date = email.date.with_timezone(&self.config.timezone);
        println!("Subject: {}", email.subject);
        println!("From:    {} <{}>", email.sender.name, email.sender.email);
        println!("To:      {}", email.recipient);
        println!("Date:    {}", date.format("%Y-%m-%d %H:%M:%S %Z"));
        println!(
            "Folder:  {} (spam score {}/100)",
            email.folder, email.spam_score
        );
        if let (Some(kind), Some(url)) = (email.attachment_type, email.attachment_url.as_deref()) {
            println!("Attach:  {} {url}", kind.as_str());
        }
        println!();
        println!("{}", email.content);
    }
}

fn require(email: Option<Email>, id: &str) -> Result<Email> {
    email.with_context(|| format!("no email with id {id}"))
}

async fn read_input(inline: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = inline {
        return Ok(text);
    }
    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("failed to read stdin")?;
    Ok(text)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_report(label: Option<&str>, report: &ScanReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    if let Some(label) = label {
        println!("== {label}");
    }
    println!(
        "Verdict:  {} (score {}/100)",
        report.verdict, report.analysis.score
    );
    if let Some(confidence) = report.ocr_confidence {
        println!("OCR:      {confidence:.1}% confidence");
    }
    if !report.analysis.keywords.is_empty() {
        println!("Keywords: {}", report.analysis.keywords.join(", "));
    }
    if !report.analysis.highlighted_text.is_empty() {
        println!();
        println!("{}", report.analysis.highlighted_text);
    }
    Ok(())
}

fn print_statistics(analytics: &SpamAnalytics) {
    let stats = &analytics.statistics;
    println!("Total:   {}", stats.total_emails);
    println!("Spam:    {} ({:.1}%)", stats.spam_emails, stats.spam_percentage);
    println!("Regular: {}", stats.regular_emails);
    println!("Unread:  {} in inbox", analytics.unread_inbox);

    println!();
    println!("Score distribution");
    for bucket in &analytics.score_distribution {
        println!("  {:>6}  {}", bucket.label, bucket.count);
    }

    if !analytics.top_spam_keywords.is_empty() {
        println!();
        println!("Common spam keywords");
        for entry in &analytics.top_spam_keywords {
            println!("  {:<16}{}", entry.keyword, entry.count);
        }
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("Prize Department International", 10), "Prize Dep…");
    }

    #[test]
    fn require_reports_missing_id() {
        let err = require(None, "abc123xyz").expect_err("missing");
        assert_eq!(err.to_string(), "no email with id abc123xyz");
    }

    #[tokio::test]
    async fn file_input_is_read_when_no_inline_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("message.txt");
        std::fs::write(&path, "act now").expect("write");
        let text = read_input(None, Some(&path)).await.expect("file text");
        assert_eq!(text, "act now");
    }

    #[tokio::test]
    async fn inline_input_wins_over_file() {
        let text = read_input(Some("hello".into()), Some(Path::new("/nonexistent")))
            .await
            .expect("inline text");
        assert_eq!(text, "hello");
    }
}
