//! Client-side proxies for entries in a distributed, replicated object cache.
//!
//! A [`DistributedRef`] stands in for a remotely-shared object. It owns the
//! current local payload and a monotonic version counter, receives coherence
//! events (invalidate, evict, receive) from an external grid engine via the
//! [`CacheListener`] surface, and persists its payload into byte buffers
//! through the [`Persistable`] contract.
//!
//! # Features
//! - **Version arbitration**: out-of-order and duplicate update delivery is
//!   safe; an update is adopted only when its version is strictly newer.
//! - **Lock-free reads**: version is an atomic, payload reads take only a
//!   short read lock and hand out a shared `Arc`.
//! - **Pluggable codecs**: payloads cross the wire through the [`Codec`]
//!   trait; [`BincodeCodec`] is provided for any `serde` payload.
//! - **Identity preservation**: a proxy never serializes itself. Only a
//!   [`RefToken`] (the id) crosses a boundary, and resolving it through the
//!   [`RefRegistry`] always yields the one canonical in-process instance.

pub mod codec;
pub mod error;
pub mod listener;
pub mod persist;
pub mod reference;
pub mod registry;
pub mod token;

pub use codec::{BincodeCodec, Codec};
pub use error::CodecError;
pub use listener::CacheListener;
pub use persist::Persistable;
pub use reference::{DistributedRef, VERSION_UNSET};
pub use registry::RefRegistry;
pub use token::RefToken;
