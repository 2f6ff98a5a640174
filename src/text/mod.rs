//! Line-oriented text export/import of invoices.
//!
//! One record per invoice, terminated by `---`:
//!
//! ```text
//! Número da Fatura: 1
//! Data: 15/06/2024
//! Cliente: Ana Silva, 123456789, Continente
//! Produtos:
//! Tipo: Taxa Normal, Código: 3, Nome: Refrigerante, Descrição: Lata, Quantidade: 30, Valor Unitário Sem IVA: 1.00, Biológico: false
//! ---
//! ```
//!
//! Rate tables are not written; imported products get the configured default
//! table for their kind and a fresh product code. Import recovers line by line
//! and reports everything it skipped or substituted in an [`ImportReport`].
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use fatura::core::*;
//! use fatura::text::*;
//!
//! let mut source = Ledger::with_default_catalog(LedgerConfig::default()).unwrap();
//! source.create_customer("Ana Silva", "123456789", "Madeira").unwrap();
//! source
//!     .create_invoice("123456789", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(), &[1, 2])
//!     .unwrap();
//!
//! let text = export_invoices(source.invoices()).unwrap();
//!
//! let mut target = Ledger::default();
//! let report = import_invoices(&mut target, &text, &ImportOptions::default());
//! assert!(report.is_clean());
//! assert_eq!(target.invoices().len(), 1);
//! ```

mod export;
mod file;
mod import;
mod product_line;

pub use export::{export_invoices, write_invoices};
pub use file::{check_extension, export_to_file, import_file};
pub use import::{
    ImportIssue, ImportOptions, ImportReport, IssueAction, import_from_reader, import_invoices,
};
pub use product_line::parse_product_line;

pub(crate) const INVOICE_NUMBER_LABEL: &str = "Número da Fatura:";
pub(crate) const DATE_LABEL: &str = "Data:";
pub(crate) const CUSTOMER_LABEL: &str = "Cliente:";
pub(crate) const PRODUCTS_HEADER: &str = "Produtos:";
pub(crate) const PRODUCT_LABEL: &str = "Tipo:";
pub(crate) const RECORD_SEPARATOR: &str = "---";
