use chrono::{DateTime, Utc};

/// Fallback download name when the stored document has none
pub const DEFAULT_SIGNED_FILENAME: &str = "signed-document.pdf";

/// A tenant-owned document that may go through an e-signature flow
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub tenant_id: String,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// File name for the signed copy
    pub fn signed_filename(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_SIGNED_FILENAME)
    }
}
