use thiserror::Error;

/// Errors produced while moving a payload across the byte boundary.
///
/// Version regressions are deliberately *not* errors: stale or duplicate
/// delivery is expected coherence traffic and is ignored silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
  /// The payload could not be represented as bytes.
  #[error("payload could not be encoded: {0}")]
  Encode(String),

  /// The bytes could not be decoded into a payload.
  #[error("payload bytes could not be decoded: {0}")]
  Decode(String),
}

/// A specialized `Result` type for codec-facing operations.
pub type Result<T, E = CodecError> = std::result::Result<T, E>;
