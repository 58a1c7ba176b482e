use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one persisted record that lets a session survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub pdf_path: PathBuf,
    pub page_num: u32,
    pub end_time: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(pdf_path: impl Into<PathBuf>, page_num: u32, end_time: DateTime<Utc>) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            page_num,
            end_time,
        }
    }

    pub fn pdf_path(&self) -> &Path {
        &self.pdf_path
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_time <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_serializes_with_flat_field_names() {
        let end_time = Utc.with_ymd_and_hms(2026, 10, 18, 14, 0, 0).unwrap();
        let record = SessionRecord::new("/books/rust.pdf", 3, end_time);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["pdf_path"], "/books/rust.pdf");
        assert_eq!(value["page_num"], 3);
        assert_eq!(value["end_time"], "2026-10-18T14:00:00Z");
    }

    #[test]
    fn record_rejects_negative_page_numbers() {
        let raw = r#"{"pdf_path":"/a.pdf","page_num":-1,"end_time":"2026-10-18T14:00:00Z"}"#;
        assert!(serde_json::from_str::<SessionRecord>(raw).is_err());
    }

    #[test]
    fn record_expires_at_its_end_time() {
        let end_time = Utc.with_ymd_and_hms(2026, 10, 18, 14, 0, 0).unwrap();
        let record = SessionRecord::new("/a.pdf", 0, end_time);

        assert!(!record.is_expired(end_time - chrono::Duration::seconds(1)));
        assert!(record.is_expired(end_time));
        assert!(record.is_expired(end_time + chrono::Duration::seconds(1)));
    }
}
