use crate::error::Result;

/// The byte-buffer persistence contract: how an entry's payload is written
/// into, and restored from, an external buffer.
///
/// `size` and `write` form a pair. The intended call pattern is `size()` to
/// reserve room, then `write()` with no payload mutation in between; `size`
/// primes a transient encoding that `write` consumes. Neither call is safe
/// under concurrent payload mutation — callers are expected to hold whatever
/// external lock serializes access to the entry for transmission.
pub trait Persistable {
  /// Returns the encoded length of the current payload, or 0 when no
  /// payload is resident. Primes the transient encoding consumed by
  /// [`write`](Persistable::write).
  fn size(&self) -> Result<usize>;

  /// Appends the encoded payload to `buf` and discards the transient
  /// encoding. Works without a preceding [`size`](Persistable::size) call
  /// (the encoding is recomputed), but then forfeits the reuse. Appends
  /// nothing when no payload is resident.
  fn write(&self, buf: &mut Vec<u8>) -> Result<()>;

  /// Decodes `bytes` and overwrites the payload unconditionally, bypassing
  /// version arbitration. This is the bulk-load path for reconstructing
  /// state from a durable source that is trusted to be authoritative.
  fn read(&self, bytes: &[u8]) -> Result<()>;
}
