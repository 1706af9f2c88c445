//! End-to-end persistence through the JSON file backend.
#![cfg(feature = "storage-file")]

use std::fs;

use profitool::clock::FixedClock;
use profitool::ledger::{Ledger, restore};
use profitool::models::{DeliveryMethod, DraftInput, NaiveDate, Record};
use profitool::storage::{FileStorage, RecordStorage};

fn clock() -> FixedClock {
    FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 1_710_460_800_000)
}

fn open(dir: &std::path::Path) -> Ledger<FileStorage, FixedClock> {
    Ledger::with_clock(FileStorage::new(dir.to_path_buf()).unwrap(), clock())
}

fn lamp() -> DraftInput {
    DraftInput::new()
        .item("Lamp")
        .quantity("1")
        .original_price("20")
        .selling_price("35")
        .buyer("Ann")
        .method(DeliveryMethod::Shipped)
        .shipping_cost("5")
        .remark("fragile")
        .date("2024-03-10")
        .image("lamp.png")
}

#[test]
fn records_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let before = {
        let mut ledger = open(dir.path());
        let _mug = ledger
            .commit(DraftInput::new().item("Mug").quantity("2").original_price("5").selling_price("12"))
            .unwrap();
        let _lamp = ledger.commit(lamp()).unwrap();
        ledger.list().to_vec()
    };

    let after = open(dir.path());
    assert_eq!(after.len(), 2);
    for (restored, original) in after.list().iter().zip(&before) {
        assert_eq!(restored.id(), original.id());
        assert_eq!(restored.item(), original.item());
        assert_eq!(restored.quantity(), original.quantity());
        assert_eq!(restored.original_price(), original.original_price());
        assert_eq!(restored.selling_price(), original.selling_price());
        assert_eq!(restored.buyer(), original.buyer());
        assert_eq!(restored.method(), original.method());
        assert_eq!(restored.shipping_cost(), original.shipping_cost());
        assert_eq!(restored.remark(), original.remark());
        assert_eq!(restored.date(), original.date());
        assert_eq!(restored.profit(), original.profit());
        assert!(restored.image().is_none());
    }
}

#[test]
fn removal_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let kept = {
        let mut ledger = open(dir.path());
        let doomed = ledger.commit(lamp()).unwrap();
        let kept = ledger.commit(DraftInput::new().item("Vase")).unwrap();
        assert!(ledger.remove(doomed.id()).unwrap());
        kept
    };

    let after = open(dir.path());
    let items: Vec<&str> = after.list().iter().map(Record::item).collect();
    assert_eq!(items, vec![kept.item()]);
}

#[test]
fn ids_keep_increasing_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let first = open(dir.path()).commit(lamp()).unwrap();
    let second = open(dir.path()).commit(lamp()).unwrap();
    assert!(second.id() > first.id());
}

#[test]
fn corrupt_file_restores_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
    fs::write(storage.records_path(), "[{\"id\": \"not a number\"").unwrap();

    assert!(storage.load().is_err());
    assert!(restore(&storage).is_empty());

    let mut ledger = Ledger::with_clock(storage, clock());
    assert!(ledger.is_empty());
    let _fresh = ledger.commit(lamp()).unwrap();
    assert_eq!(ledger.storage().load().unwrap().len(), 1);
}

#[test]
fn stored_file_uses_camel_case_and_string_amounts() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = open(dir.path());
    let record = ledger.commit(lamp()).unwrap();

    let contents = fs::read_to_string(ledger.storage().records_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let stored = &value[0];

    assert_eq!(stored["id"], record.id().into_inner());
    assert_eq!(stored["item"], "Lamp");
    assert_eq!(stored["quantity"], 1);
    assert_eq!(stored["originalPrice"], "20.00");
    assert_eq!(stored["sellingPrice"], "35.00");
    assert_eq!(stored["buyer"], "Ann");
    assert_eq!(stored["method"], "Ship");
    assert_eq!(stored["shippingCost"], "5.00");
    assert_eq!(stored["remark"], "fragile");
    assert_eq!(stored["date"], "2024-03-10");
    assert_eq!(stored["profit"], "10.00");
    assert!(stored.get("image").is_none());
}
