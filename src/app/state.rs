use crate::app::ticker::MessageTicker;
use crate::upload::{ProcessOutcome, SelectedFile, SubmitError, SubmitOutcome, PDF_MEDIA_TYPE};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

pub const SELECTION_ERROR: &str = "Please select a PDF file";

pub const LOADING_MESSAGES: [&str; 3] = [
    "Processing your PDF",
    "Will take 1-2 minutes",
    "OpenAI translating each section",
];

const MESSAGE_INTERVAL: Duration = Duration::from_millis(2000);

/// The five processing phases. Each variant carries only its own data, so a
/// result can never coexist with an error and the loading cursor cannot
/// outlive the upload it belongs to.
#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Idle,
    Selected {
        file: SelectedFile,
    },
    Uploading {
        file: SelectedFile,
        cursor: usize,
    },
    Succeeded {
        file: SelectedFile,
        outcome: ProcessOutcome,
    },
    Failed {
        file: Option<SelectedFile>,
        message: String,
    },
}

pub struct UploadState {
    phase: Phase,
    pub is_dragging: bool,
    message_interval: Duration,
    ticker: Option<MessageTicker>,
    outcome_receiver: Option<Receiver<SubmitOutcome>>,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            is_dragging: false,
            message_interval: MESSAGE_INTERVAL,
            ticker: None,
            outcome_receiver: None,
        }
    }
}

impl UploadState {
    #[cfg(test)]
    fn with_message_interval(interval: Duration) -> Self {
        Self {
            message_interval: interval,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, Phase::Uploading { .. })
    }

    pub fn can_submit(&self) -> bool {
        matches!(
            self.phase,
            Phase::Selected { .. } | Phase::Failed { file: Some(_), .. }
        )
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Selected { file } => Some(file),
            Phase::Uploading { file, .. } => Some(file),
            Phase::Succeeded { file, .. } => Some(file),
            Phase::Failed { file, .. } => file.as_ref(),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&ProcessOutcome> {
        match &self.phase {
            Phase::Succeeded { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    pub fn loading_message(&self) -> Option<&'static str> {
        match &self.phase {
            Phase::Uploading { cursor, .. } => Some(LOADING_MESSAGES[*cursor]),
            _ => None,
        }
    }

    /// The single validation routine behind both the picker and the drop
    /// target. Accepting or rejecting a candidate replaces the phase, so any
    /// prior result or error is gone either way.
    pub fn select_candidate(&mut self, candidate: SelectedFile) -> bool {
        if let Some(ticker) = self.ticker.take() {
            ticker.disarm();
        }
        self.outcome_receiver = None;

        if candidate.media_type == PDF_MEDIA_TYPE {
            self.phase = Phase::Selected { file: candidate };
            true
        } else {
            self.phase = Phase::Failed {
                file: None,
                message: SELECTION_ERROR.to_string(),
            };
            false
        }
    }

    /// Enter `Uploading` and arm the message ticker. Returns the file the
    /// caller must submit; `None` when nothing is submittable, which is what
    /// keeps a second submission impossible while one is in flight.
    pub fn begin_upload(&mut self) -> Option<SelectedFile> {
        let file = match &self.phase {
            Phase::Selected { file } => file.clone(),
            Phase::Failed {
                file: Some(file), ..
            } => file.clone(),
            _ => return None,
        };

        self.phase = Phase::Uploading {
            file: file.clone(),
            cursor: 0,
        };
        self.ticker = Some(MessageTicker::arm(self.message_interval));
        Some(file)
    }

    pub fn attach_submission(&mut self, receiver: Receiver<SubmitOutcome>) {
        self.outcome_receiver = Some(receiver);
    }

    pub fn advance_loading_message(&mut self) {
        if let Phase::Uploading { cursor, .. } = &mut self.phase {
            *cursor = (*cursor + 1) % LOADING_MESSAGES.len();
        }
    }

    /// Leave `Uploading` for a terminal phase. A completion that arrives in
    /// any other phase is stale (a reset raced the worker) and is ignored.
    pub fn finish_upload(&mut self, outcome: SubmitOutcome) {
        let file = match std::mem::take(&mut self.phase) {
            Phase::Uploading { file, .. } => file,
            other => {
                self.phase = other;
                return;
            }
        };

        if let Some(ticker) = self.ticker.take() {
            ticker.disarm();
        }
        self.outcome_receiver = None;

        self.phase = match outcome {
            Ok(outcome) => Phase::Succeeded { file, outcome },
            Err(err) => Phase::Failed {
                file: Some(file),
                message: err.to_string(),
            },
        };
    }

    /// Drain the ticker and worker channels; called once per frame. Returns
    /// true when anything changed so the caller can request a repaint.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        let ticks = self.ticker.as_ref().map(|t| t.drain()).unwrap_or(0);
        for _ in 0..ticks {
            self.advance_loading_message();
            changed = true;
        }

        let outcome = match &self.outcome_receiver {
            Some(receiver) => match receiver.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                // Worker died without reporting; fail the attempt instead of
                // staying in Uploading forever.
                Err(TryRecvError::Disconnected) => Some(Err(SubmitError::Interrupted)),
            },
            None => None,
        };
        if let Some(outcome) = outcome {
            self.outcome_receiver = None;
            self.finish_upload(outcome);
            changed = true;
        }

        changed
    }

    /// Back to `Idle` from anywhere: drops the file, result, error, ticker
    /// and any pending completion.
    pub fn reset(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.disarm();
        }
        self.outcome_receiver = None;
        self.phase = Phase::Idle;
        self.is_dragging = false;
    }
}
