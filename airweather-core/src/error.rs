use thiserror::Error;

/// Why an upstream fetch produced no body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Top-level payload could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of stations, got {0}")]
    NotAnArray(&'static str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("unknown province '{0}'")]
    UnknownProvince(String),

    #[error("unknown city '{city}'{}", province_hint(.province))]
    UnknownCity {
        city: String,
        province: Option<String>,
    },

    #[error("location is unavailable: {0}")]
    Unavailable(String),
}

fn province_hint(province: &Option<String>) -> String {
    match province {
        Some(p) => format!(" in province '{p}'"),
        None => String::new(),
    }
}
