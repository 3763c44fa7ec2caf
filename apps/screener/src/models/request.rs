use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

pub const PDF_MIME: &str = "application/pdf";

/// The resume blob as picked by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Reads a resume from disk, keeping only the final path component as its name.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read resume file: {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Resume path has no usable file name: {}", path.display()))?
            .to_string();

        Ok(Self::new(file_name, content))
    }

    /// The Analyzer only accepts PDF uploads; the extension is the only hint a client has.
    pub fn is_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A validated submission, ready to hand to the Analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub resume: ResumeFile,
    pub job_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_case_insensitive() {
        assert!(ResumeFile::new("cv.pdf", "x").is_pdf());
        assert!(ResumeFile::new("CV.PDF", "x").is_pdf());
        assert!(!ResumeFile::new("cv.docx", "x").is_pdf());
        assert!(!ResumeFile::new("pdf", "x").is_pdf());
    }

    #[tokio::test]
    async fn test_from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jane_doe.pdf");
        std::fs::write(&path, b"%PDF-1.7 body").unwrap();

        let file = ResumeFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "jane_doe.pdf");
        assert_eq!(&file.content[..], b"%PDF-1.7 body");
    }

    #[tokio::test]
    async fn test_from_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResumeFile::from_path(&dir.path().join("nope.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read resume file"));
    }
}
