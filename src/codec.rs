use crate::error::{CodecError, Result};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes and decodes a typed payload to and from bytes.
///
/// The codec is consulted by [`DistributedRef`](crate::DistributedRef) on
/// every accepted update and on every persistence call. Implementations must
/// be cheap to share across threads; they are held behind an `Arc` by every
/// proxy and by the registry.
pub trait Codec<T>: Send + Sync {
  /// Encodes `value` into a fresh byte buffer.
  fn encode(&self, value: &T) -> Result<Vec<u8>>;

  /// Decodes a payload from `bytes`.
  ///
  /// Must either return a fully-constructed value or an error; partial
  /// decoding into shared state is not possible through this interface,
  /// which is what keeps a corrupt update from ever becoming visible.
  fn decode(&self, bytes: &[u8]) -> Result<T>;
}

/// The default codec: `bincode` over any `serde`-capable payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeCodec;

impl<T> Codec<T> for BincodeCodec
where
  T: Serialize + DeserializeOwned,
{
  fn encode(&self, value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
  }

  fn decode(&self, bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
  }
}
