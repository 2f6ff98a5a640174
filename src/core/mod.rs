//! Core types: customers, products, invoices, VAT rates and the ledger.
//!
//! Rates are looked up per customer region and then adjusted by product kind.
//! Everything a front end needs to manage invoices lives on [`Ledger`].

mod date;
mod error;
mod invoice;
mod ledger;
mod numbering;
mod product;
mod rates;
mod region;
mod summary;
mod types;
mod validation;

pub use date::*;
pub use error::*;
pub use invoice::*;
pub use ledger::*;
pub use numbering::*;
pub use product::*;
pub use rates::*;
pub use region::*;
pub use summary::*;
pub use types::*;
pub use validation::*;
