use thiserror::Error;

pub type DspResult<T> = Result<T, DspError>;

#[derive(Error, Debug)]
pub enum DspError {
    /// Token acquisition was rejected by the auth endpoint.
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Non-success response from the advertising API.
    #[error("API request failed ({status}): {body}")]
    Api { status: u16, body: String },

    /// A campaign was created but line-item submission stopped early.
    #[error("Submission stopped after {created} of {planned} line items for campaign {campaign_id}: {cause}")]
    Submission {
        campaign_id: String,
        created: usize,
        planned: usize,
        #[source]
        cause: Box<DspError>,
    },

    /// The draft cannot be planned or submitted as given.
    #[error("Invalid campaign draft: {0}")]
    InvalidDraft(String),

    #[error("Report {report_id} failed on the remote side")]
    ReportFailed { report_id: String },

    #[error("Report still pending after {attempts} status checks")]
    ReportTimeout { attempts: u32 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DspError {
    /// Stable machine-readable code, used by the REST layer and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            DspError::Auth { .. } => "auth_failed",
            DspError::Api { .. } => "api_error",
            DspError::Submission { .. } => "submission_partial",
            DspError::InvalidDraft(_) => "invalid_draft",
            DspError::ReportFailed { .. } => "report_failed",
            DspError::ReportTimeout { .. } => "report_timeout",
            DspError::Cancelled => "cancelled",
            DspError::Transport(_) => "transport_error",
            DspError::Decode(_) => "decode_error",
            DspError::Config(_) => "config_error",
            DspError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status reported by the remote side, if any.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            DspError::Auth { status, .. } | DspError::Api { status, .. } => Some(*status),
            DspError::Submission { cause, .. } => cause.remote_status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_error_reports_progress() {
        let err = DspError::Submission {
            campaign_id: "cmp-1".into(),
            created: 2,
            planned: 5,
            cause: Box::new(DspError::Api {
                status: 500,
                body: "boom".into(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("2 of 5"));
        assert!(msg.contains("cmp-1"));
        assert_eq!(err.code(), "submission_partial");
        assert_eq!(err.remote_status(), Some(500));
    }

    #[test]
    fn test_timeout_and_failure_are_distinct() {
        let timeout = DspError::ReportTimeout { attempts: 30 };
        let failed = DspError::ReportFailed {
            report_id: "r-1".into(),
        };
        assert_ne!(timeout.code(), failed.code());
        assert!(timeout.to_string().contains("30"));
        assert_eq!(timeout.remote_status(), None);
    }

    #[test]
    fn test_invalid_draft_has_no_remote_status() {
        let err = DspError::InvalidDraft("flight too long".into());
        assert_eq!(err.code(), "invalid_draft");
        assert_eq!(err.remote_status(), None);
        assert!(err.to_string().contains("flight too long"));
    }
}
