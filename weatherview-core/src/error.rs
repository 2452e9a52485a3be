use reqwest::StatusCode;

/// Why no device position could be obtained.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location access denied: {0}")]
    Denied(String),
    #[error("Location service unavailable: {0}")]
    Unavailable(String),
}

/// Why a weather fetch produced no reading.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather request failed with status {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
