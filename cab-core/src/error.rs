use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid srcdb for semester lookup: {0}")]
    UnknownTerm(String),

    #[error("course {code} (CRN {crn}): invalid srcdb for semester lookup: {srcdb}")]
    UnknownCourseTerm {
        code: String,
        crn: String,
        srcdb: String,
    },

    #[error("unknown registration demographic code: {0}")]
    UnknownDemographic(String),

    #[error("course {0} has no CRN")]
    MissingCrn(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
