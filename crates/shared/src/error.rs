use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("malformed script line {line}: {source}")]
    MalformedLine {
        line: usize,
        source: serde_json::Error,
    },
    #[error("unknown pointer release policy '{0}', expected 'implicit' or 'explicit'")]
    UnknownReleasePolicy(String),
}
