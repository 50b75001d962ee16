//! Cart persistence against the file-backed medium.
//!
//! Covers the lifecycle of a cart across separate store instances sharing one
//! data directory: lazy creation, legacy upgrade, whole-value overwrite and
//! clearing.

use std::fs;

use tempfile::tempdir;
use testresult::TestResult;

use aevra::prelude::*;

#[test]
fn cart_survives_across_store_instances() -> TestResult {
    let dir = tempdir()?;

    {
        let mut store = CartStore::new(FileStorage::new(dir.path()));
        store.add("p1", "M")?;
        store.add("p2", "L")?;
        store.add("p1", "L")?;
    }

    let store = CartStore::new(FileStorage::new(dir.path()));
    let cart = store.load();

    assert_eq!(cart.get("p1"), Some(&CartEntry::new(2, "M")));
    assert_eq!(cart.get("p2"), Some(&CartEntry::new(1, "L")));
    assert_eq!(store.total_item_count(), 3);

    Ok(())
}

#[test]
fn legacy_file_is_upgraded_then_rewritten() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join(format!("{CART_KEY}.json"));
    fs::write(&path, r#"{"p1": 3, "p4": {"qty": 2}}"#)?;

    let mut store = CartStore::new(FileStorage::new(dir.path()));

    let cart = store.load();
    assert_eq!(cart.get("p1"), Some(&CartEntry::new(3, "")));
    assert_eq!(cart.get("p4"), Some(&CartEntry::new(2, "")));
    assert_eq!(
        fs::read_to_string(&path)?,
        r#"{"p1": 3, "p4": {"qty": 2}}"#,
        "loading alone must not rewrite stored data"
    );

    store.set_quantity("p4", 1);

    assert_eq!(
        fs::read_to_string(&path)?,
        r#"{"p1":{"qty":3,"size":""},"p4":{"qty":1,"size":""}}"#
    );

    Ok(())
}

#[test]
fn one_bad_entry_does_not_wipe_the_cart() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join(format!("{CART_KEY}.json"));
    fs::write(&path, r#"{"p1": {"qty": 2, "size": "M"}, "p2": 1.0, "p3": "lots"}"#)?;

    let mut store = CartStore::new(FileStorage::new(dir.path()));
    assert_eq!(store.total_item_count(), 3);

    store.add("p1", "M")?;

    assert_eq!(
        fs::read_to_string(&path)?,
        r#"{"p1":{"qty":3,"size":"M"},"p2":{"qty":1,"size":""}}"#
    );

    Ok(())
}

#[test]
fn corrupted_file_reads_as_empty_and_is_replaced() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join(format!("{CART_KEY}.json"));
    fs::write(&path, "\u{0}\u{0}garbage")?;

    let mut store = CartStore::new(FileStorage::new(dir.path()));
    assert!(store.load().is_empty());

    store.add("p3", "M")?;

    assert_eq!(
        fs::read_to_string(&path)?,
        r#"{"p3":{"qty":1,"size":"M"}}"#
    );

    Ok(())
}

#[test]
fn save_of_load_round_trips() -> TestResult {
    let dir = tempdir()?;
    let mut store = CartStore::new(FileStorage::new(dir.path()));
    store.add("p2", "L")?;
    store.add("p1", "M")?;
    store.set_quantity("p2", 7);

    let path = dir.path().join(format!("{CART_KEY}.json"));
    let before = fs::read_to_string(&path)?;

    let cart = store.load();
    store.save(&cart);

    assert_eq!(fs::read_to_string(&path)?, before);
    assert_eq!(store.load(), cart);

    Ok(())
}

#[test]
fn clear_removes_the_file() -> TestResult {
    let dir = tempdir()?;
    let mut store = CartStore::new(FileStorage::new(dir.path()));
    store.add("p1", "M")?;

    store.clear();

    assert!(!dir.path().join(format!("{CART_KEY}.json")).exists());
    assert!(store.load().is_empty());

    Ok(())
}

#[test]
fn unwritable_directory_degrades_to_empty_cart() -> TestResult {
    let dir = tempdir()?;
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "")?;

    let mut store = CartStore::new(FileStorage::new(&blocker));

    store.add("p1", "M")?;

    assert!(store.load().is_empty());
    assert_eq!(store.total_item_count(), 0);

    Ok(())
}
