use crate::catalog::{CatalogError, UploadFile};

/// Notice shown while the server ingests the file.
pub const PROCESSING_NOTICE: &str =
    "Uploading and processing file... (this may take several minutes for large files)";

const SUCCESS_FALLBACK: &str = "File uploaded successfully!";
const FAILURE_FALLBACK: &str = "Failed to upload the file";
const CONNECTION_HINT: &str =
    "Connection error. The server may still be processing the file.";

/// Coarse status for observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    InProgress,
    Succeeded,
    Failed,
}

/// Tri-state upload session as a tagged variant, so impossible combinations
/// (uploading with no file, success with a stale file) cannot be represented.
///
/// `Failed` keeps the file so the user can retry without reselecting.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadSession {
    #[default]
    Idle,
    Pending(UploadFile),
    InProgress(UploadFile),
    Succeeded {
        message: String,
    },
    Failed {
        file: UploadFile,
        message: String,
    },
}

impl UploadSession {
    /// Stage a file for upload. Refused while an upload is in flight.
    pub fn select(&mut self, file: UploadFile) -> bool {
        if matches!(self, UploadSession::InProgress(_)) {
            return false;
        }
        *self = UploadSession::Pending(file);
        true
    }

    /// Begin the upload, returning the file to send. `None` means no-op:
    /// nothing staged, or an upload is already in flight (single-flight).
    pub fn start(&mut self) -> Option<UploadFile> {
        match std::mem::take(self) {
            UploadSession::Pending(file) | UploadSession::Failed { file, .. } => {
                *self = UploadSession::InProgress(file.clone());
                Some(file)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Terminal success transition. The file is dropped; the banner auto-reset
    /// timer is driven by the engine.
    pub fn succeed(&mut self, server_message: Option<String>) {
        if !matches!(self, UploadSession::InProgress(_)) {
            return;
        }
        let text = server_message.unwrap_or_else(|| SUCCESS_FALLBACK.to_string());
        *self = UploadSession::Succeeded {
            message: format!("\u{2713} {text}"),
        };
    }

    /// Terminal failure transition; keeps the file for a retry.
    pub fn fail(&mut self, err: &CatalogError) {
        match std::mem::take(self) {
            UploadSession::InProgress(file) => {
                *self = UploadSession::Failed {
                    file,
                    message: format!("\u{2717} Error: {}", classify(err)),
                };
            }
            other => *self = other,
        }
    }

    /// Expire the success banner back to an idle session.
    pub fn reset_banner(&mut self) {
        if matches!(self, UploadSession::Succeeded { .. }) {
            *self = UploadSession::Idle;
        }
    }

    pub fn status(&self) -> UploadStatus {
        match self {
            UploadSession::Idle | UploadSession::Pending(_) => UploadStatus::Idle,
            UploadSession::InProgress(_) => UploadStatus::InProgress,
            UploadSession::Succeeded { .. } => UploadStatus::Succeeded,
            UploadSession::Failed { .. } => UploadStatus::Failed,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            UploadSession::Idle | UploadSession::Pending(_) => "",
            UploadSession::InProgress(_) => PROCESSING_NOTICE,
            UploadSession::Succeeded { message } => message,
            UploadSession::Failed { message, .. } => message,
        }
    }

    pub fn file(&self) -> Option<&UploadFile> {
        match self {
            UploadSession::Pending(file)
            | UploadSession::InProgress(file)
            | UploadSession::Failed { file, .. } => Some(file),
            _ => None,
        }
    }
}

/// Map a backend failure to the user-facing string.
///
/// No server response gets the connection hint: with the long upload timeout
/// the server may well still be ingesting the file after a client-side drop.
fn classify(err: &CatalogError) -> String {
    if err.is_no_response() {
        return CONNECTION_HINT.to_string();
    }
    match err {
        CatalogError::Application {
            message: Some(message),
            ..
        } => message.clone(),
        _ => FAILURE_FALLBACK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv() -> UploadFile {
        UploadFile::new("products.csv", b"sku,title\n".to_vec())
    }

    #[test]
    fn start_without_a_file_is_a_no_op() {
        let mut session = UploadSession::Idle;
        assert!(session.start().is_none());
        assert_eq!(session.status(), UploadStatus::Idle);
    }

    #[test]
    fn second_start_while_in_progress_is_a_no_op() {
        let mut session = UploadSession::Idle;
        session.select(csv());
        assert!(session.start().is_some());
        assert!(session.start().is_none());
        assert_eq!(session.status(), UploadStatus::InProgress);
    }

    #[test]
    fn select_is_refused_while_in_progress() {
        let mut session = UploadSession::Idle;
        session.select(csv());
        session.start();
        assert!(!session.select(UploadFile::new("other.csv", vec![])));
        assert_eq!(session.file().unwrap().name, "products.csv");
    }

    #[test]
    fn success_drops_the_file_and_marks_the_message() {
        let mut session = UploadSession::Idle;
        session.select(csv());
        session.start();
        session.succeed(Some("12000 rows indexed".to_string()));
        assert_eq!(session.status(), UploadStatus::Succeeded);
        assert_eq!(session.message(), "\u{2713} 12000 rows indexed");
        assert!(session.file().is_none());
        session.reset_banner();
        assert_eq!(session.status(), UploadStatus::Idle);
        assert_eq!(session.message(), "");
    }

    #[test]
    fn transport_failure_keeps_the_file_and_hints_at_processing() {
        let mut session = UploadSession::Idle;
        session.select(csv());
        session.start();
        session.fail(&CatalogError::Transport("connection refused".into()));
        assert_eq!(session.status(), UploadStatus::Failed);
        assert_eq!(
            session.message(),
            "\u{2717} Error: Connection error. The server may still be processing the file."
        );
        assert_eq!(session.file().unwrap().name, "products.csv");
        // Retry without reselecting.
        assert!(session.start().is_some());
    }

    #[test]
    fn application_failure_surfaces_the_server_message() {
        let mut session = UploadSession::Idle;
        session.select(csv());
        session.start();
        session.fail(&CatalogError::Application {
            status: Some(422),
            message: Some("malformed CSV header".to_string()),
        });
        assert_eq!(session.message(), "\u{2717} Error: malformed CSV header");
    }

    #[test]
    fn reset_banner_leaves_non_success_states_alone() {
        let mut session = UploadSession::Idle;
        session.select(csv());
        session.reset_banner();
        assert!(session.file().is_some());
    }
}
