mod client;
mod types;

pub use client::{ProcessClient, DEFAULT_BASE_URL};
pub use types::{
    ArtifactKind, DownloadUrls, ProcessOutcome, SelectedFile, SubmitError, SubmitOutcome,
    PDF_MEDIA_TYPE,
};
