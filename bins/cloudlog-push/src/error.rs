#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("{0}")]
    CloudLog(#[from] cloudlog::CloudLogError),

    #[error("invalid JSON event on line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },

    #[error("stdin: {0}")]
    Stdin(#[from] std::io::Error),
}
