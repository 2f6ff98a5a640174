#![cfg(feature = "snapshot")]

use chrono::NaiveDate;
use fatura::core::*;
use fatura::snapshot::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ledger() -> Ledger {
    let mut ledger = Ledger::with_default_catalog(LedgerConfig::default()).unwrap();
    ledger
        .create_customer("Ana Silva", "123456789", "Madeira")
        .unwrap();
    ledger
        .create_customer("Rui Sousa", "987654321", "Continente")
        .unwrap();
    ledger
        .create_invoice("123456789", date(2024, 6, 15), &[1, 2])
        .unwrap();
    ledger
        .create_invoice("987654321", date(2024, 6, 16), &[3])
        .unwrap();
    ledger
}

#[test]
fn save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    let original = ledger();
    save_snapshot(&original, &path).unwrap();

    let restored = load_snapshot(&path, LedgerConfig::default()).unwrap();
    assert_eq!(restored.customers(), original.customers());
    assert_eq!(restored.products(), original.products());
    assert_eq!(restored.invoices(), original.invoices());
    assert_eq!(restored.statistics().unwrap(), original.statistics().unwrap());
}

#[test]
fn counters_resume_above_loaded_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    save_snapshot(&ledger(), &path).unwrap();

    let mut restored = load_snapshot(&path, LedgerConfig::default()).unwrap();
    assert_eq!(restored.next_invoice_id(), 3);
    let id = restored
        .create_invoice("987654321", date(2024, 7, 1), &[4])
        .unwrap();
    assert_eq!(id, 3);
    let code = restored
        .add_product(ProductBuilder::new(
            "Água",
            ProductKind::ReducedRateFood {
                organic: false,
                certifications: vec![],
            },
        ))
        .unwrap();
    assert_eq!(code, 6);
}

#[test]
fn loaded_ledger_keeps_enforcing_unique_tax_ids() {
    let json = to_json(&ledger()).unwrap();
    let mut restored = from_json(&json, LedgerConfig::default()).unwrap();
    assert!(
        restored
            .create_customer("Outra Pessoa", "123456789", "Açores")
            .is_err()
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_snapshot(dir.path().join("none.json"), LedgerConfig::default()).unwrap_err();
    assert!(matches!(err, FaturaError::Io(_)));
}

#[test]
fn corrupt_file_is_snapshot_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, b"\x00\x01 not a snapshot").unwrap();
    let err = load_snapshot(&path, LedgerConfig::default()).unwrap_err();
    assert!(matches!(err, FaturaError::Snapshot(_)));
}

#[test]
fn duplicate_invoice_numbers_rejected() {
    let json = to_json(&ledger()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let invoices = value["invoices"].as_array_mut().unwrap();
    invoices[1]["id"] = serde_json::json!(1);

    let err = from_json(&value.to_string(), LedgerConfig::default()).unwrap_err();
    assert!(matches!(err, FaturaError::Snapshot(_)));
    assert!(err.to_string().contains("duplicate invoice number 1"));
}

#[test]
fn amounts_are_stored_as_strings() {
    let json = to_json(&ledger()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], SNAPSHOT_VERSION);
    assert_eq!(value["products"][0]["unit_price"], "1.20");
}
