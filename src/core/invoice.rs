use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FaturaError;
use super::product::Product;
use super::types::Customer;

/// An invoice (fatura): one customer, an issue date and an ordered product list.
///
/// Totals are computed on demand from the products, always against the
/// customer bound to the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number, unique within a ledger.
    pub id: u64,
    pub customer: Customer,
    pub issue_date: NaiveDate,
    products: Vec<Product>,
}

impl Invoice {
    /// Create an invoice with no products yet.
    pub fn new(id: u64, customer: Customer, issue_date: NaiveDate) -> Self {
        Self {
            id,
            customer,
            issue_date,
            products: Vec::new(),
        }
    }

    /// Products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_mut(&mut self, id: u64) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    pub fn contains_product(&self, id: u64) -> bool {
        self.product(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Append a product. A product code already on the invoice is rejected.
    pub fn add_product(&mut self, product: Product) -> Result<(), FaturaError> {
        if self.contains_product(product.id) {
            return Err(FaturaError::Validation(format!(
                "product {} is already on invoice {}",
                product.id, self.id
            )));
        }
        self.products.push(product);
        Ok(())
    }

    /// Remove a product by code and return it.
    ///
    /// The last remaining product can't be removed; the invoice is left
    /// unchanged in that case.
    pub fn remove_product(&mut self, id: u64) -> Result<Product, FaturaError> {
        let pos = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| {
                FaturaError::Lookup(format!("product {id} is not on invoice {}", self.id))
            })?;
        if self.products.len() == 1 {
            return Err(FaturaError::Validation(format!(
                "invoice {} must keep at least one product",
                self.id
            )));
        }
        Ok(self.products.remove(pos))
    }

    /// Rebind the invoice to another customer. Affects later totals only.
    pub fn set_customer(&mut self, customer: Customer) {
        self.customer = customer;
    }

    pub fn set_issue_date(&mut self, date: NaiveDate) {
        self.issue_date = date;
    }

    /// Sum of `price_excluding_tax` over all products.
    pub fn total_excluding_tax(&self) -> Result<Decimal, FaturaError> {
        self.checked_total(Product::price_excluding_tax)
    }

    /// Sum of `price_including_tax` over all products, for the bound customer.
    pub fn total_including_tax(&self) -> Result<Decimal, FaturaError> {
        self.checked_total(|p| p.price_including_tax(&self.customer))
    }

    fn checked_total<F>(&self, price: F) -> Result<Decimal, FaturaError>
    where
        F: Fn(&Product) -> Result<Decimal, FaturaError>,
    {
        self.products.iter().try_fold(Decimal::ZERO, |total, p| {
            checked_sum(total, price(p)?, || format!("total of invoice {}", self.id))
        })
    }

    /// Same as [`total_including_tax`](Self::total_including_tax).
    ///
    /// The argument is accepted for callers that pass a customer explicitly,
    /// but the total is still computed for the invoice's own customer.
    pub fn total_including_tax_for(&self, _customer: &Customer) -> Result<Decimal, FaturaError> {
        self.total_including_tax()
    }

    /// Total VAT: `total_including_tax - total_excluding_tax`.
    pub fn total_tax(&self) -> Result<Decimal, FaturaError> {
        Ok(self.total_including_tax()? - self.total_excluding_tax()?)
    }
}

/// `a + b`, or an [`FaturaError::Arithmetic`] naming what was being summed.
pub(crate) fn checked_sum(
    a: Decimal,
    b: Decimal,
    what: impl FnOnce() -> String,
) -> Result<Decimal, FaturaError> {
    a.checked_add(b)
        .ok_or_else(|| FaturaError::Arithmetic(format!("{} overflows", what())))
}
