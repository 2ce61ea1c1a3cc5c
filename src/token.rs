use serde::{Deserialize, Serialize};

/// The serializable stand-in for a [`DistributedRef`](crate::DistributedRef).
///
/// A proxy never serializes itself — only this token, which carries the id
/// and nothing else. The receiving side must resolve the token through its
/// [`RefRegistry`](crate::RefRegistry), which yields the one canonical proxy
/// for the id in that process. Two tokens for the same id therefore always
/// resolve to the same instance, and coherence traffic stays visible to every
/// holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefToken {
  id: u64,
}

impl RefToken {
  /// Wraps an object id in its boundary-crossing form.
  pub fn new(id: u64) -> Self {
    Self { id }
  }

  /// The id of the distributed object this token refers to.
  #[inline]
  pub fn id(&self) -> u64 {
    self.id
  }
}
