use thiserror::Error;

/// Errors surfaced by a performance source
///
/// The collector never propagates these to its caller; a source that fails
/// to subscribe turns the collector into a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectorError {
    #[error("Performance observation not supported: {0}")]
    Unsupported(String),

    #[error("Performance source already has a subscriber")]
    AlreadySubscribed,

    #[error("Performance source disconnected")]
    Disconnected,
}
