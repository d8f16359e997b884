// ============================================================
// FILE SOURCE
// ============================================================
// A file handed over by the picker / drop zone, and the pre-parse filter

use std::path::Path;

use crate::domain::error::{AppError, Result};

pub const ACCEPTED_EXTENSION: &str = "csv";
pub const ACCEPTED_MIME: &str = "text/csv";

/// Raw file as received at the input boundary
#[derive(Debug, Clone)]
pub struct FileSource {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Accept `.csv` files or anything declared as `text/csv`
    pub fn is_accepted(&self) -> bool {
        let extension_ok = Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(ACCEPTED_EXTENSION))
            .unwrap_or(false);

        let mime_ok = self
            .mime
            .as_deref()
            .and_then(|mime| mime.split(';').next())
            .map(|essence| essence.trim().eq_ignore_ascii_case(ACCEPTED_MIME))
            .unwrap_or(false);

        extension_ok || mime_ok
    }

    pub fn ensure_accepted(&self) -> Result<()> {
        if self.is_accepted() {
            Ok(())
        } else {
            Err(AppError::UnsupportedFileType(self.name.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_csv_extension_any_case() {
        assert!(FileSource::new("data.csv", vec![]).is_accepted());
        assert!(FileSource::new("DATA.CSV", vec![]).is_accepted());
    }

    #[test]
    fn test_accepts_csv_mime_with_parameters() {
        let file = FileSource::new("export", vec![]).with_mime("text/csv; charset=utf-8");
        assert!(file.is_accepted());
    }

    #[test]
    fn test_rejects_other_files() {
        let file = FileSource::new("sheet.xlsx", vec![1, 2, 3]).with_mime("application/zip");
        assert_eq!(
            file.ensure_accepted(),
            Err(AppError::UnsupportedFileType("sheet.xlsx".to_string()))
        );
        assert!(!FileSource::new("csv", vec![]).is_accepted());
    }
}
