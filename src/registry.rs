use crate::codec::Codec;
use crate::reference::DistributedRef;
use crate::token::RefToken;

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

/// The per-process map from object id to the one canonical proxy instance.
///
/// All identity-preserving deserialization routes through here: resolving an
/// id that is not yet known creates a vacant proxy for it, and any number of
/// concurrent resolutions of the same id observe exactly one surviving
/// instance. Bypassing the registry would leave multiple independent proxies
/// tracking divergent versions for the same object.
pub struct RefRegistry<T> {
  refs: RwLock<HashMap<u64, Arc<DistributedRef<T>>, ahash::RandomState>>,
  codec: Arc<dyn Codec<T>>,
}

impl<T> RefRegistry<T> {
  /// Creates an empty registry whose proxies decode through `codec`.
  pub fn new(codec: Arc<dyn Codec<T>>) -> Self {
    Self {
      refs: RwLock::new(HashMap::default()),
      codec,
    }
  }

  /// Returns the canonical proxy for `id`, creating a vacant one (no
  /// payload, version unset) if none exists yet.
  ///
  /// Safe to call concurrently for the same id from any number of threads;
  /// the get-or-create is atomic under the map's write lock, so a
  /// miss-then-create race never surfaces.
  pub fn resolve(&self, id: u64) -> Arc<DistributedRef<T>> {
    if let Some(existing) = self.refs.read().get(&id) {
      return existing.clone();
    }
    let mut refs = self.refs.write();
    refs
      .entry(id)
      .or_insert_with(|| {
        trace!(id, "creating vacant proxy on first resolution");
        Arc::new(DistributedRef::vacant(id, self.codec.clone()))
      })
      .clone()
  }

  /// Resolves a boundary-crossing token back into the canonical proxy.
  pub fn resolve_token(&self, token: RefToken) -> Arc<DistributedRef<T>> {
    self.resolve(token.id())
  }

  /// Adopts a locally-constructed proxy as the canonical instance for its
  /// id. If one is already registered, the existing instance wins and is
  /// returned; the caller should discard its own in that case.
  pub fn register(&self, reference: Arc<DistributedRef<T>>) -> Arc<DistributedRef<T>> {
    let mut refs = self.refs.write();
    refs.entry(reference.id()).or_insert(reference).clone()
  }

  /// Returns the proxy for `id` without creating one.
  pub fn get(&self, id: u64) -> Option<Arc<DistributedRef<T>>> {
    self.refs.read().get(&id).cloned()
  }

  /// The number of ids currently resolved in this process.
  pub fn len(&self) -> usize {
    self.refs.read().len()
  }

  /// Whether no ids have been resolved yet.
  pub fn is_empty(&self) -> bool {
    self.refs.read().is_empty()
  }
}

impl<T> fmt::Debug for RefRegistry<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RefRegistry")
      .field("refs", &self.len())
      .finish()
  }
}
