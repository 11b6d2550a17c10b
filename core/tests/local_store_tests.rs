// tests/local_store_tests.rs
mod common; // Reference the common module

use common::*;
use korb::{JsonFileStore, LocalStore};

#[test]
fn test_json_file_store_round_trips_snapshot() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let store = JsonFileStore::new(dir.path().join("cart.json"));

  let items = vec![
    bare_item("p1", 10_000, 3_000, 2),
    option_item("p2", 0, 2_500, &[("o1", 4_000, 1)]),
  ];
  store.save(&items);

  let restored = store.load();
  assert_eq!(restored, items);

  // The on-disk shape is the camelCase wire format.
  let raw = std::fs::read_to_string(store.path()).unwrap();
  assert!(raw.contains("\"optionRequired\""));
  assert!(raw.contains("\"cartLineId\""));
}

#[test]
fn test_json_file_store_missing_file_loads_empty() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let store = JsonFileStore::new(dir.path().join("never-written.json"));
  assert!(store.load().is_empty());
}

#[test]
fn test_json_file_store_corrupt_file_degrades_to_empty() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cart.json");
  std::fs::write(&path, "{not json!").unwrap();

  let store = JsonFileStore::new(&path);
  // A broken snapshot must not take the cart down with it.
  assert!(store.load().is_empty());

  // And the store keeps working afterwards.
  store.save(&[bare_item("p1", 10_000, 3_000, 1)]);
  assert_eq!(store.load().len(), 1);
}

#[test]
fn test_json_file_store_survives_process_restart_shape() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cart.json");

  {
    let store = JsonFileStore::new(&path);
    store.save(&[bare_item("p1", 10_000, 3_000, 4)]);
  }
  // A fresh store over the same path sees the same snapshot.
  let store = JsonFileStore::new(&path);
  let restored = store.load();
  assert_eq!(restored.len(), 1);
  assert_eq!(restored[0].quantity, 4);
}
