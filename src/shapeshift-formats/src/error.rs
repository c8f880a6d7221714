/// Errors of the text encoders.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Malformed or unrepresentable JSON.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The engine rejected the conversion.
    #[error(transparent)]
    Engine(#[from] shapeshift::Error),
}
