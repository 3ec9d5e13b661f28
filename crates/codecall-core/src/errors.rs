/// Core error type for the service.
///
/// Adapter crates should map their specific errors into this type so the
/// scheduler and callback handlers can log failures consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered with a non-success status and an error body.
    #[error("provider rejected request ({status}, code {code:?}): {message}")]
    Provider {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
