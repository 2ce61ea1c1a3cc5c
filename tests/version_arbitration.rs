use gridref::{BincodeCodec, CacheListener, Codec, DistributedRef, VERSION_UNSET};
use std::sync::Arc;

fn codec() -> Arc<dyn Codec<String>> {
  Arc::new(BincodeCodec)
}

fn bytes_for(s: &str) -> Vec<u8> {
  BincodeCodec.encode(&s.to_string()).unwrap()
}

#[test]
fn test_first_update_adopted() {
  let entry = DistributedRef::vacant(7, codec());
  assert_eq!(entry.version(), VERSION_UNSET);
  assert!(entry.get().is_none());

  let adopted = entry.receive(1, &bytes_for("a")).unwrap();
  assert!(adopted);
  assert_eq!(entry.version(), 1);
  assert_eq!(*entry.get().unwrap(), "a");
}

#[test]
fn test_stale_and_duplicate_updates_ignored() {
  let entry = DistributedRef::vacant(7, codec());
  assert!(entry.receive(5, &bytes_for("a")).unwrap());
  let before = entry.get().unwrap();

  // Duplicate delivery of the same version.
  assert!(!entry.receive(5, &bytes_for("b")).unwrap());
  // Older version.
  assert!(!entry.receive(3, &bytes_for("c")).unwrap());

  assert_eq!(entry.version(), 5);
  let after = entry.get().unwrap();
  assert!(
    Arc::ptr_eq(&before, &after),
    "rejected updates must not touch the payload"
  );
}

#[test]
fn test_out_of_order_delivery_keeps_max_version() {
  let entry = DistributedRef::vacant(7, codec());
  for v in [4i64, 1, 9, 2, 9, 6, 3] {
    let _ = entry.receive(v, &bytes_for(&format!("payload-{v}"))).unwrap();
  }
  assert_eq!(entry.version(), 9);
  assert_eq!(*entry.get().unwrap(), "payload-9");
}

#[test]
fn test_eviction_preserves_version() {
  let entry = DistributedRef::vacant(7, codec());
  assert!(entry.receive(4, &bytes_for("a")).unwrap());

  entry.evict();
  assert!(entry.get().is_none());
  assert_eq!(entry.version(), 4, "eviction must not roll the version back");

  // Equal version is still rejected even with no resident payload.
  assert!(!entry.receive(4, &bytes_for("b")).unwrap());
  assert!(entry.get().is_none());

  // A strictly newer one repopulates the entry.
  assert!(entry.receive(5, &bytes_for("c")).unwrap());
  assert_eq!(*entry.get().unwrap(), "c");
  assert_eq!(entry.version(), 5);
}

#[test]
fn test_eviction_is_idempotent() {
  let entry: DistributedRef<String> = DistributedRef::vacant(7, codec());
  entry.evict();
  entry.evict();
  assert!(entry.get().is_none());
  assert_eq!(entry.version(), VERSION_UNSET);
}

#[test]
fn test_undecodable_update_leaves_prior_state() {
  let entry = DistributedRef::vacant(7, codec());
  assert!(entry.receive(1, &bytes_for("a")).unwrap());

  let err = entry.receive(2, b"\xff\xff\xff").unwrap_err();
  assert!(matches!(err, gridref::CodecError::Decode(_)));
  assert_eq!(entry.version(), 1, "a corrupt update must not advance the version");
  assert_eq!(*entry.get().unwrap(), "a");
}

#[test]
fn test_listener_surface_delegates() {
  let entry = DistributedRef::vacant(42, codec());

  entry.received(42, 1, &bytes_for("a"));
  assert_eq!(*entry.get().unwrap(), "a");

  // Invalidation is informational only; the payload stays resident.
  entry.invalidated(42);
  assert_eq!(*entry.get().unwrap(), "a");

  // An undecodable delivery is dropped, not propagated.
  entry.received(42, 2, b"\xff\xff\xff");
  assert_eq!(entry.version(), 1);
  assert_eq!(*entry.get().unwrap(), "a");

  entry.evicted(42);
  assert!(entry.get().is_none());
}

// Known scenario, asserted as-is rather than prevented: arbitration in
// `receive` is purely version-based, so a local `set` can be overwritten by
// an update whose version was already in flight before the write.
#[test]
fn test_local_set_overwritten_by_in_flight_update() {
  let entry = DistributedRef::vacant(7, codec());
  assert!(entry.receive(1, &bytes_for("remote-1")).unwrap());

  entry.set("local".to_string());
  assert_eq!(*entry.get().unwrap(), "local");
  assert_eq!(entry.version(), 1, "a local set does not touch the version");

  // Version 2 was requested before the set and arrives just after it.
  assert!(entry.receive(2, &bytes_for("remote-2")).unwrap());
  assert_eq!(*entry.get().unwrap(), "remote-2");
}

// The worked example: id 42, version starts unset.
#[test]
fn test_delivery_scenario() {
  let entry = DistributedRef::vacant(42, codec());
  assert_eq!(entry.version(), VERSION_UNSET);

  assert!(entry.receive(1, &bytes_for("a")).unwrap());
  assert_eq!(*entry.get().unwrap(), "a");
  assert_eq!(entry.version(), 1);

  assert!(!entry.receive(1, &bytes_for("b")).unwrap());
  assert_eq!(*entry.get().unwrap(), "a");

  assert!(entry.receive(2, &bytes_for("b")).unwrap());
  assert_eq!(*entry.get().unwrap(), "b");
  assert_eq!(entry.version(), 2);

  entry.evict();
  assert!(entry.get().is_none());
  assert_eq!(entry.version(), 2);

  assert!(!entry.receive(2, &bytes_for("c")).unwrap());
  assert!(entry.get().is_none());
}

#[test]
fn test_concurrent_delivery_never_regresses() {
  let entry = Arc::new(DistributedRef::vacant(7, codec()));
  let max = 64i64;

  let handles: Vec<_> = (0..8)
    .map(|t| {
      let entry = entry.clone();
      std::thread::spawn(move || {
        // Each thread delivers an interleaved slice of versions.
        let mut v = 1 + t;
        while v <= max {
          let _ = entry.receive(v, &BincodeCodec.encode(&format!("payload-{v}")).unwrap());
          v += 8;
        }
      })
    })
    .collect();
  for h in handles {
    h.join().unwrap();
  }

  assert_eq!(entry.version(), max);
  assert_eq!(*entry.get().unwrap(), format!("payload-{max}"));
}
