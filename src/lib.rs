//! # fatura
//!
//! Invoice management for a Portuguese-style VAT system with three regions
//! (Continente, Madeira, Açores): customers, a product catalog, invoices and
//! per-product tax computation, plus a line-oriented text import/export.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Rates are percentages; a product's effective rate is its regional rate
//! adjusted by product kind (organic discount, wine surcharge, and so on).
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fatura::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = Ledger::with_default_catalog(LedgerConfig::default()).unwrap();
//! ledger.create_customer("Ana Silva", "123456789", "Madeira").unwrap();
//!
//! // Refrigerante: 30 × 1.00 at the Madeira normal rate (22%)
//! let id = ledger
//!     .create_invoice("123456789", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(), &[3])
//!     .unwrap();
//!
//! let invoice = ledger.invoice(id).unwrap();
//! assert_eq!(invoice.total_excluding_tax().unwrap(), dec!(30));
//! assert_eq!(invoice.total_including_tax().unwrap(), dec!(36.6));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Customers, products, invoices, rates, ledger |
//! | `text` | Line-oriented `.txt` invoice import/export |
//! | `snapshot` | JSON persistence of a whole ledger |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "text")]
pub mod text;

#[cfg(feature = "snapshot")]
pub mod snapshot;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
