//! Read-only views over invoices: per-product breakdown, per-invoice summary
//! and ledger-wide statistics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FaturaError;
use super::invoice::{Invoice, checked_sum};

/// Tax breakdown of one product line on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub product_id: u64,
    pub name: String,
    pub tag: String,
    pub excluding_tax: Decimal,
    /// Effective VAT percentage after kind adjustments.
    pub rate: Decimal,
    pub tax: Decimal,
    pub including_tax: Decimal,
}

/// One row of an invoice listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub id: u64,
    pub customer_name: String,
    pub region: String,
    pub product_count: usize,
    pub excluding_tax: Decimal,
    pub including_tax: Decimal,
}

/// Aggregates over every invoice in a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStatistics {
    pub invoice_count: usize,
    pub product_count: usize,
    pub excluding_tax: Decimal,
    pub tax: Decimal,
    pub including_tax: Decimal,
}

/// Per-product tax breakdown of an invoice, in product order.
pub fn breakdown(invoice: &Invoice) -> Result<Vec<LineBreakdown>, FaturaError> {
    invoice
        .products()
        .iter()
        .map(|p| {
            let excluding_tax = p.price_excluding_tax()?;
            let including_tax = p.price_including_tax(&invoice.customer)?;
            Ok(LineBreakdown {
                product_id: p.id,
                name: p.name.clone(),
                tag: p.kind.tag().to_string(),
                excluding_tax,
                rate: p.effective_rate(&invoice.customer)?,
                tax: including_tax - excluding_tax,
                including_tax,
            })
        })
        .collect()
}

/// Listing row for an invoice.
pub fn summarize(invoice: &Invoice) -> Result<InvoiceSummary, FaturaError> {
    Ok(InvoiceSummary {
        id: invoice.id,
        customer_name: invoice.customer.name.clone(),
        region: invoice.customer.region.clone(),
        product_count: invoice.products().len(),
        excluding_tax: invoice.total_excluding_tax()?,
        including_tax: invoice.total_including_tax()?,
    })
}

/// Statistics over a set of invoices.
pub fn statistics<'a, I>(invoices: I) -> Result<LedgerStatistics, FaturaError>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut stats = LedgerStatistics::default();
    for invoice in invoices {
        let excluding_tax = invoice.total_excluding_tax()?;
        let including_tax = invoice.total_including_tax()?;
        let what = || "ledger totals".to_string();

        stats.invoice_count += 1;
        stats.product_count += invoice.products().len();
        stats.excluding_tax = checked_sum(stats.excluding_tax, excluding_tax, what)?;
        stats.tax = checked_sum(stats.tax, including_tax - excluding_tax, what)?;
        stats.including_tax = checked_sum(stats.including_tax, including_tax, what)?;
    }
    Ok(stats)
}
