use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Folder;

#[derive(Debug, Parser)]
#[command(
    name = "spamlens",
    version,
    about = "Lexical spam scoring for text, screenshots and stored mail"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score text given as an argument, read from a file, or piped on stdin
    Analyze {
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Extract text from images through the OCR service and score it
    ScanImage {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Score an incoming message and file it into inbox or spam
    Ingest {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        from_name: String,
        #[arg(long)]
        from_email: String,
        #[arg(long, default_value = "user@example.com")]
        to: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Image attachment; its text is extracted and scored with the message
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List stored messages, optionally only one folder (inbox, spam, trash)
    List {
        folder: Option<Folder>,
        #[arg(long)]
        json: bool,
    },
    /// Print one message and mark it read
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    MarkSpam {
        id: String,
        #[arg(long)]
        not_spam: bool,
    },
    MarkRead {
        id: String,
        #[arg(long)]
        unread: bool,
    },
    /// Move a message to trash
    Delete { id: String },
    /// Remove a message permanently
    Purge { id: String },
    Stats {
        #[arg(long)]
        json: bool,
    },
}
