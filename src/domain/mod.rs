pub mod analysis;
pub mod analytics;
pub mod email;

pub use analysis::{AnalysisResult, ScanReport, ScanSource};
pub use analytics::SpamAnalytics;
pub use email::{
    Attachment, AttachmentType, Email, EmailDraft, EmailUpdate, Folder, NewEmail, Sender,
    SpamStatistics,
};
