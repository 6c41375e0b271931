//! RemoteSet Tests
//!
//! Typed set scenarios over the in-memory transport.
//!
//! These tests verify:
//! - Add/remove counts excluding duplicates and absentees
//! - Cardinality, membership, and bulk member reads
//! - Server-side set algebra across two names on one handle
//! - clear() draining the whole set
//! - The decode-skip policy on foreign members

mod common;

use std::collections::HashSet;

use remora::RemoteSet;

fn string_set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// =============================================================================
// Add/Remove Count Tests
// =============================================================================

#[test]
fn test_add_excludes_duplicates() {
    let handle = common::mem_handle();
    let set: RemoteSet<String> = RemoteSet::new(handle, "tags");

    assert_eq!(set.add(&"Hello".to_string()).unwrap(), 1);
    assert_eq!(set.add(&"Hello".to_string()).unwrap(), 0);

    // Duplicates within one call count once.
    let batch = ["how".to_string(), "are".to_string(), "how".to_string()];
    assert_eq!(set.add_all(batch.iter()).unwrap(), 2);

    // Members already present do not increase the count.
    let batch = ["are".to_string(), "you".to_string()];
    assert_eq!(set.add_all(batch.iter()).unwrap(), 1);

    assert_eq!(set.cardinality().unwrap(), 4);
}

#[test]
fn test_remove_counts_actual_removals() {
    let handle = common::mem_handle();
    let set: RemoteSet<u32> = RemoteSet::new(handle, "numbers");

    set.add_all([1, 2, 77].iter()).unwrap();

    assert_eq!(set.remove(&2).unwrap(), 1);
    assert_eq!(set.remove(&2).unwrap(), 0);
    assert_eq!(set.remove_all([1, 77, 100].iter()).unwrap(), 2);
    assert_eq!(set.cardinality().unwrap(), 0);
}

#[test]
fn test_empty_batches_issue_no_command() {
    let handle = common::mem_handle();
    let set: RemoteSet<u32> = RemoteSet::new(handle, "numbers");

    assert_eq!(set.add_all([].iter()).unwrap(), 0);
    assert_eq!(set.remove_all([].iter()).unwrap(), 0);
    assert_eq!(set.cardinality().unwrap(), 0);
}

// =============================================================================
// Membership Tests
// =============================================================================

#[test]
fn test_cardinality_after_distinct_adds() {
    let handle = common::mem_handle();
    let set: RemoteSet<u32> = RemoteSet::new(handle, "numbers");

    for n in 0..5u32 {
        set.add(&n).unwrap();
    }

    assert_eq!(set.cardinality().unwrap(), 5);
}

#[test]
fn test_contains() {
    let handle = common::mem_handle();
    let set: RemoteSet<String> = RemoteSet::new(handle, "tags");

    set.add(&"Hello".to_string()).unwrap();

    assert!(set.contains(&"Hello".to_string()).unwrap());
    assert!(!set.contains(&"you".to_string()).unwrap());
}

#[test]
fn test_members() {
    let handle = common::mem_handle();
    let set: RemoteSet<String> = RemoteSet::new(handle, "tags");

    let values = string_set(&["Hello", "how", "are", "you"]);
    set.add_all(values.iter()).unwrap();

    assert_eq!(set.members().unwrap(), values);
}

// =============================================================================
// Clear Tests
// =============================================================================

#[test]
fn test_clear_then_empty() {
    let handle = common::mem_handle();
    let set: RemoteSet<String> = RemoteSet::new(handle, "tags");

    set.add_all(string_set(&["Hello", "how", "are", "you"]).iter())
        .unwrap();

    assert_eq!(set.clear().unwrap(), 4);
    assert_eq!(set.cardinality().unwrap(), 0);
    assert!(set.members().unwrap().is_empty());
}

#[test]
fn test_clear_empty_set() {
    let handle = common::mem_handle();
    let set: RemoteSet<String> = RemoteSet::new(handle, "tags");

    assert_eq!(set.clear().unwrap(), 0);
}

// =============================================================================
// Set Algebra Tests
// =============================================================================

#[test]
fn test_set_algebra() {
    let handle = common::mem_handle();
    let a: RemoteSet<String> = RemoteSet::new(handle.clone(), "a");
    let b: RemoteSet<String> = RemoteSet::new(handle, "b");

    a.add_all(string_set(&["Hello", "how", "are", "you"]).iter())
        .unwrap();
    b.add_all(string_set(&["how", "are", "these?"]).iter())
        .unwrap();

    assert_eq!(a.difference(&b).unwrap(), string_set(&["Hello", "you"]));
    assert_eq!(a.intersection(&b).unwrap(), string_set(&["how", "are"]));
    assert_eq!(
        a.union(&b).unwrap(),
        string_set(&["Hello", "how", "are", "you", "these?"])
    );
    assert_eq!(a.union(&b).unwrap().len(), 5);
}

#[test]
fn test_algebra_with_missing_other_set() {
    let handle = common::mem_handle();
    let a: RemoteSet<String> = RemoteSet::new(handle.clone(), "a");
    let ghost: RemoteSet<String> = RemoteSet::new(handle, "ghost");

    let values = string_set(&["Hello", "you"]);
    a.add_all(values.iter()).unwrap();

    assert_eq!(a.difference(&ghost).unwrap(), values);
    assert!(a.intersection(&ghost).unwrap().is_empty());
    assert_eq!(a.union(&ghost).unwrap(), values);
}

// =============================================================================
// Decode-Skip Policy Tests
// =============================================================================

#[test]
fn test_undecodable_members_are_skipped() {
    let handle = common::mem_handle();
    let typed: RemoteSet<u32> = RemoteSet::new(handle.clone(), "mixed");
    let foreign: RemoteSet<String> = RemoteSet::new(handle, "mixed");

    typed.add(&7).unwrap();
    foreign.add(&"seven".to_string()).unwrap();

    // Both members exist remotely; only the decodable one is visible.
    assert_eq!(typed.cardinality().unwrap(), 2);
    assert_eq!(typed.members().unwrap(), [7].into_iter().collect());
}
