use crate::codec::Codec;
use crate::error::Result;
use crate::listener::CacheListener;
use crate::persist::Persistable;
use crate::token::RefToken;

use core::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

/// Sentinel version of a proxy that has not yet adopted any remote update.
/// Below every valid version, so the first delivered update always wins.
pub const VERSION_UNSET: i64 = -1;

/// A typed proxy for a single entry in the distributed object cache.
///
/// The proxy owns the current local payload and the version it reflects. The
/// grid engine drives it through the [`CacheListener`] callbacks; application
/// code reads through [`get`](DistributedRef::get) and writes locally through
/// [`set`](DistributedRef::set); the [`Persistable`] pair moves the payload
/// into and out of external byte buffers.
///
/// Only the `id` is durable. The payload, version, and the transient encoding
/// cache never leave the process with the proxy's identity — see
/// [`RefToken`] and [`RefRegistry`](crate::RefRegistry) for how a proxy
/// crosses a serialization boundary without producing a detached copy.
pub struct DistributedRef<T> {
  id: u64,
  payload: RwLock<Option<Arc<T>>>,
  version: AtomicI64,
  /// Encoding primed by `size()` and consumed by the next `write()`.
  /// Dropped whenever the payload changes.
  encoded: Mutex<Option<Vec<u8>>>,
  codec: Arc<dyn Codec<T>>,
}

impl<T> DistributedRef<T> {
  /// Creates a proxy with an initial local payload and an unset version.
  ///
  /// Used for direct local construction of an object that has not yet gone
  /// through the coherence protocol.
  pub fn new(id: u64, value: T, codec: Arc<dyn Codec<T>>) -> Self {
    Self {
      id,
      payload: RwLock::new(Some(Arc::new(value))),
      version: AtomicI64::new(VERSION_UNSET),
      encoded: Mutex::new(None),
      codec,
    }
  }

  /// Creates a payload-less shell for `id`, version unset.
  ///
  /// This is the form the registry creates on first resolution of an id;
  /// the payload is reconstructed from the coherence layer afterwards.
  pub fn vacant(id: u64, codec: Arc<dyn Codec<T>>) -> Self {
    Self {
      id,
      payload: RwLock::new(None),
      version: AtomicI64::new(VERSION_UNSET),
      encoded: Mutex::new(None),
      codec,
    }
  }

  /// The stable, globally unique id of the distributed object.
  #[inline]
  pub fn id(&self) -> u64 {
    self.id
  }

  /// The version of the last adopted remote update, or [`VERSION_UNSET`].
  #[inline]
  pub fn version(&self) -> i64 {
    self.version.load(Ordering::Acquire)
  }

  /// Returns the current payload, if resident.
  ///
  /// Hands out the shared `Arc` without cloning the payload itself. The
  /// returned value reflects the last completed write; callers needing a
  /// stable snapshot across further coherence traffic keep the `Arc`.
  /// Mutating through the `Arc` is a contract violation.
  pub fn get(&self) -> Option<Arc<T>> {
    self.payload.read().clone()
  }

  /// Overwrites the payload unconditionally with a local write that has not
  /// gone through the coherence protocol. The version is left untouched.
  ///
  /// Known hazard, preserved deliberately: a `set` immediately followed by a
  /// delivered update whose version was in flight before the write will
  /// overwrite the local value, because arbitration in
  /// [`receive`](DistributedRef::receive) is purely version-based.
  pub fn set(&self, value: T) {
    let mut payload = self.payload.write();
    *payload = Some(Arc::new(value));
    self.encoded.lock().take();
  }

  /// Adopts a delivered update iff `version` is strictly newer than the
  /// current version; otherwise discards it silently.
  ///
  /// Returns `Ok(true)` when the update was adopted. Duplicate and
  /// out-of-order delivery is normal traffic, so rejection is observable
  /// only as `Ok(false)`, never as an error. The bytes are decoded in full
  /// before the payload is touched; a malformed update leaves the prior
  /// payload and version visible.
  pub fn receive(&self, version: i64, bytes: &[u8]) -> Result<bool> {
    // Cheap rejection before paying the codec cost.
    let current = self.version.load(Ordering::Acquire);
    if version <= current {
      trace!(id = self.id, version, current, "discarding stale update");
      return Ok(false);
    }

    let value = self.codec.decode(bytes)?;

    let mut payload = self.payload.write();
    // Re-check under the lock: a racing delivery may have advanced the
    // version past this one. The version can only advance here, never
    // regress.
    let current = self.version.load(Ordering::Acquire);
    if version <= current {
      trace!(id = self.id, version, current, "lost delivery race, discarding");
      return Ok(false);
    }
    self.version.store(version, Ordering::Release);
    *payload = Some(Arc::new(value));
    self.encoded.lock().take();
    trace!(id = self.id, version, "adopted update");
    Ok(true)
  }

  /// Drops the payload, keeping id and version so arbitration remains
  /// correct for the empty entry. Idempotent.
  pub fn evict(&self) {
    let mut payload = self.payload.write();
    if payload.take().is_some() {
      debug!(id = self.id, version = self.version(), "payload evicted");
    }
    self.encoded.lock().take();
  }

  /// The lightweight form of this proxy that crosses serialization
  /// boundaries: the id alone.
  pub fn token(&self) -> RefToken {
    RefToken::new(self.id)
  }
}

impl<T> Persistable for DistributedRef<T> {
  fn size(&self) -> Result<usize> {
    let payload = self.payload.read().clone();
    let Some(value) = payload else {
      self.encoded.lock().take();
      return Ok(0);
    };
    let bytes = self.codec.encode(&value)?;
    let len = bytes.len();
    *self.encoded.lock() = Some(bytes);
    Ok(len)
  }

  fn write(&self, buf: &mut Vec<u8>) -> Result<()> {
    let primed = self.encoded.lock().take();
    if let Some(bytes) = primed {
      buf.extend_from_slice(&bytes);
      return Ok(());
    }
    // `size()` was not called first; encode on the spot.
    if let Some(value) = self.payload.read().clone() {
      let bytes = self.codec.encode(&value)?;
      buf.extend_from_slice(&bytes);
    }
    Ok(())
  }

  fn read(&self, bytes: &[u8]) -> Result<()> {
    let value = self.codec.decode(bytes)?;
    let mut payload = self.payload.write();
    *payload = Some(Arc::new(value));
    self.encoded.lock().take();
    Ok(())
  }
}

impl<T: Send + Sync> CacheListener for DistributedRef<T> {
  fn evicted(&self, _id: u64) {
    self.evict();
  }

  fn received(&self, _id: u64, version: i64, data: &[u8]) {
    // The engine surface is fire-and-forget; an undecodable payload is
    // dropped and logged, leaving the prior state in place.
    if let Err(err) = self.receive(version, data) {
      warn!(id = self.id, version, %err, "dropping undecodable update");
    }
  }
}

impl<T> fmt::Debug for DistributedRef<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let resident = self.payload.read().is_some();
    write!(
      f,
      "DistributedRef[{:x} ({}): {}]",
      self.id,
      self.version(),
      if resident { "resident" } else { "vacant" }
    )
  }
}
