use reqwest::StatusCode;

/// Failure talking to the content provider. Contained by the fetcher,
/// which turns it into an empty article list.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to reach The Guardian API: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Guardian API returned error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse Guardian API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid Guardian API url: {0}")]
    InvalidUrl(String),
}

/// Failure talking to the summarization provider. Contained by the
/// summarizer, which turns it into a placeholder summary.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("{status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure delivering a message to the chat endpoint.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Failed to reach Telegram: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Telegram returned error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Telegram rejected the message: {0}")]
    Rejected(String),
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid briefing time '{0}', expected HH:MM (e.g. 07:30)")]
pub struct TriggerTimeError(pub String);
