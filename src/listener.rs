/// The coherence callback surface delivered by the grid engine.
///
/// The engine fires these from its own I/O or network threads, concurrently
/// with application threads using the proxy; no return value is expected and
/// implementations must not block. Delivery may be duplicated or arrive out
/// of order — implementations are responsible for discarding stale traffic.
pub trait CacheListener: Send + Sync {
  /// A remote writer has invalidated this entry.
  ///
  /// The default implementation does nothing: the payload stays resident
  /// until an explicit eviction or a newer update arrives. Override for
  /// eager invalidation behavior.
  fn invalidated(&self, _id: u64) {}

  /// The engine has reclaimed local cache space for this entry.
  fn evicted(&self, id: u64);

  /// The engine delivers the result of a read or update, tagged with the
  /// version it reflects.
  fn received(&self, id: u64, version: i64, data: &[u8]);
}
