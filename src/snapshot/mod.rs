//! JSON persistence of a whole [`Ledger`](crate::core::Ledger).
//!
//! A snapshot holds customers, the product catalog and invoices. Loading
//! rebuilds the ledger so product codes and invoice numbers continue above
//! the highest ones stored.
//!
//! ```no_run
//! use fatura::core::*;
//! use fatura::snapshot::*;
//!
//! let ledger = Ledger::with_default_catalog(LedgerConfig::default()).unwrap();
//! save_snapshot(&ledger, "fatura.json").unwrap();
//! let restored = load_snapshot("fatura.json", LedgerConfig::default()).unwrap();
//! assert_eq!(restored.products().len(), 5);
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{Customer, FaturaError, Invoice, Ledger, LedgerConfig, Product};

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    customers: &'a [Customer],
    products: &'a [Product],
    invoices: &'a [Invoice],
}

#[derive(Deserialize)]
struct SnapshotData {
    version: u32,
    customers: Vec<Customer>,
    products: Vec<Product>,
    invoices: Vec<Invoice>,
}

/// Serialize a ledger to a JSON string.
pub fn to_json(ledger: &Ledger) -> Result<String, FaturaError> {
    serde_json::to_string_pretty(&snapshot_of(ledger))
        .map_err(|e| FaturaError::Snapshot(e.to_string()))
}

/// Rebuild a ledger from a JSON snapshot.
pub fn from_json(json: &str, config: LedgerConfig) -> Result<Ledger, FaturaError> {
    let data: SnapshotData =
        serde_json::from_str(json).map_err(|e| FaturaError::Snapshot(e.to_string()))?;
    into_ledger(data, config)
}

/// Write a snapshot file, replacing any existing one.
pub fn save_snapshot(ledger: &Ledger, path: impl AsRef<Path>) -> Result<(), FaturaError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &snapshot_of(ledger))
        .map_err(|e| FaturaError::Snapshot(e.to_string()))?;
    writer.flush()?;
    info!(
        path = %path.display(),
        customers = ledger.customers().len(),
        invoices = ledger.invoices().len(),
        "Saved snapshot"
    );
    Ok(())
}

/// Load a snapshot file written by [`save_snapshot`].
pub fn load_snapshot(path: impl AsRef<Path>, config: LedgerConfig) -> Result<Ledger, FaturaError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let data: SnapshotData =
        serde_json::from_reader(reader).map_err(|e| FaturaError::Snapshot(e.to_string()))?;
    let ledger = into_ledger(data, config)?;
    info!(
        path = %path.display(),
        customers = ledger.customers().len(),
        invoices = ledger.invoices().len(),
        next_invoice = ledger.next_invoice_id(),
        "Loaded snapshot"
    );
    Ok(ledger)
}

fn snapshot_of(ledger: &Ledger) -> SnapshotRef<'_> {
    SnapshotRef {
        version: SNAPSHOT_VERSION,
        customers: ledger.customers(),
        products: ledger.products(),
        invoices: ledger.invoices(),
    }
}

fn into_ledger(data: SnapshotData, config: LedgerConfig) -> Result<Ledger, FaturaError> {
    if data.version != SNAPSHOT_VERSION {
        return Err(FaturaError::Snapshot(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            data.version
        )));
    }

    let mut tax_ids = HashSet::new();
    for customer in &data.customers {
        if !tax_ids.insert(customer.tax_id.clone()) {
            return Err(FaturaError::Snapshot(format!(
                "duplicate customer tax id {}",
                customer.tax_id
            )));
        }
    }
    let mut invoice_ids = HashSet::new();
    for invoice in &data.invoices {
        if !invoice_ids.insert(invoice.id) {
            return Err(FaturaError::Snapshot(format!(
                "duplicate invoice number {}",
                invoice.id
            )));
        }
        if invoice.is_empty() {
            return Err(FaturaError::Snapshot(format!(
                "invoice {} has no products",
                invoice.id
            )));
        }
    }

    Ok(Ledger::from_parts(
        config,
        data.customers,
        data.products,
        data.invoices,
    ))
}
