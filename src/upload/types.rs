use reqwest::StatusCode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A validated user-chosen file, from selection until reset or replacement.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub media_type: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = media_type_for(path).to_string();
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Self {
            path: path.to_path_buf(),
            name,
            media_type,
            size,
        }
    }

    pub fn display_size(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[0])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }
}

// The tag a browser would put in File.type, reconstructed from the extension.
fn media_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return "application/octet-stream";
    };

    match ext.to_lowercase().as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "txt" | "md" | "log" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Extracted,
    Translated,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Extracted => "extracted",
            ArtifactKind::Translated => "translated",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadUrls {
    pub extracted: String,
    pub translated: String,
}

/// Successful processing payload. The service also returns `job_id` and
/// `status` fields; the client has no use for them.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessOutcome {
    pub sections_count: usize,
    pub translated_count: usize,
    pub download_urls: DownloadUrls,
}

impl ProcessOutcome {
    pub fn locator(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Extracted => &self.download_urls.extracted,
            ArtifactKind::Translated => &self.download_urls.translated,
        }
    }

    pub fn stats_line(&self) -> String {
        format!(
            "{} sections extracted, {} translated",
            self.sections_count, self.translated_count
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

/// Everything that can go wrong with the one in-flight submission. The
/// Display text is exactly what the presentation layer shows: a structured
/// `detail` from the response body wins, then transport-level text, then the
/// generic fallback for failures that carry no useful text of their own.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{detail}")]
    Rejected { detail: String },

    #[error("Upload failed with status: {0}")]
    Status(StatusCode),

    #[error("Failed to send request: {0}")]
    Transport(String),

    #[error("Failed to parse upload response: {0}")]
    Malformed(String),

    #[error("Failed to read file: {0}")]
    File(#[from] std::io::Error),

    #[error("Upload failed")]
    Interrupted,
}

pub type SubmitOutcome = Result<ProcessOutcome, SubmitError>;
