use chrono::{Datelike, NaiveDate};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{FaturaError, ensure_valid};
use super::invoice::Invoice;
use super::numbering::IdSequence;
use super::product::{Product, ProductBuilder, ProductKind};
use super::rates::TaxConfig;
use super::summary::{self, InvoiceSummary, LedgerStatistics, LineBreakdown};
use super::types::Customer;
use super::validation;

/// Ledger-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Default rate tables per product kind.
    pub rates: TaxConfig,
    /// Earliest issue year accepted when an invoice date is edited.
    pub earliest_year: i32,
    /// Latest issue year accepted when an invoice date is edited.
    /// `None` means the current year.
    pub latest_year: Option<i32>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rates: TaxConfig::default(),
            earliest_year: 1900,
            latest_year: None,
        }
    }
}

impl LedgerConfig {
    fn latest_year(&self) -> i32 {
        self.latest_year
            .unwrap_or_else(|| chrono::Local::now().date_naive().year())
    }
}

/// In-memory owner of customers, the product catalog and saved invoices,
/// plus the product and invoice id sequences.
#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
    customers: Vec<Customer>,
    products: Vec<Product>,
    invoices: Vec<Invoice>,
    product_ids: IdSequence,
    invoice_ids: IdSequence,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl Ledger {
    /// An empty ledger.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            customers: Vec::new(),
            products: Vec::new(),
            invoices: Vec::new(),
            product_ids: IdSequence::new(),
            invoice_ids: IdSequence::new(),
        }
    }

    /// A ledger whose catalog holds the five sample products, one per kind.
    pub fn with_default_catalog(config: LedgerConfig) -> Result<Self, FaturaError> {
        let mut ledger = Self::new(config);
        let samples = [
            ProductBuilder::new("Maçã", ProductKind::ReducedRateFood {
                organic: true,
                certifications: vec!["ISO22000".into(), "HACCP".into()],
            })
            .description("Biológica")
            .quantity(10)
            .unit_price(dec!(1.20)),
            ProductBuilder::new("Vinho Tinto", ProductKind::IntermediateRateFood {
                organic: false,
                category: "vinho".into(),
            })
            .description("Caixa de 5 litros")
            .quantity(5)
            .unit_price(dec!(10.00)),
            ProductBuilder::new("Refrigerante", ProductKind::NormalRateFood { organic: false })
                .description("Lata de refrigerante")
                .quantity(30)
                .unit_price(dec!(1.00)),
            ProductBuilder::new("Brufen", ProductKind::PrescriptionPharmacy {
                doctor: "Rita".into(),
            })
            .description("5mg")
            .quantity(10)
            .unit_price(dec!(2.00)),
            ProductBuilder::new("Mucus", ProductKind::NonPrescriptionPharmacy {
                category: "animais".into(),
            })
            .description("50g")
            .quantity(5)
            .unit_price(dec!(1.50)),
        ];
        for builder in samples {
            ledger.add_product(builder)?;
        }
        Ok(ledger)
    }

    /// Rebuild a ledger from persisted collections.
    ///
    /// Both id sequences resume above the highest id found, counting products
    /// on invoices as well as the catalog.
    pub fn from_parts(
        config: LedgerConfig,
        customers: Vec<Customer>,
        products: Vec<Product>,
        invoices: Vec<Invoice>,
    ) -> Self {
        let product_ids = IdSequence::after(
            products
                .iter()
                .chain(invoices.iter().flat_map(|i| i.products()))
                .map(|p| p.id),
        );
        let invoice_ids = IdSequence::after(invoices.iter().map(|i| i.id));
        Self {
            config,
            customers,
            products,
            invoices,
            product_ids,
            invoice_ids,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn tax_config(&self) -> &TaxConfig {
        &self.config.rates
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The product catalog.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Saved invoices, in insertion order.
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    /// Next invoice number that [`draft_invoice`](Self::draft_invoice) will hand out.
    pub fn next_invoice_id(&self) -> u64 {
        self.invoice_ids.peek()
    }

    /// Next product code that will be auto-assigned.
    pub fn next_product_id(&self) -> u64 {
        self.product_ids.peek()
    }

    // --- Customers ---

    /// Register a new customer after validating name, tax id and region.
    ///
    /// A tax id already in the ledger is rejected.
    pub fn create_customer(
        &mut self,
        name: &str,
        tax_id: &str,
        region: &str,
    ) -> Result<&Customer, FaturaError> {
        let (name, tax_id, region) = (name.trim(), tax_id.trim(), region.trim());
        ensure_valid(validation::validate_customer(name, tax_id, region))?;
        if self.find_customer(tax_id).is_some() {
            return Err(FaturaError::Validation(format!(
                "customer.tax_id: {tax_id} is already assigned to another customer"
            )));
        }

        debug!(tax_id = %tax_id, region = %region, "Creating customer");
        self.customers.push(Customer::new(name, tax_id, region));
        Ok(&self.customers[self.customers.len() - 1])
    }

    pub fn find_customer(&self, tax_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.tax_id == tax_id)
    }

    /// Customer by tax id.
    pub fn customer(&self, tax_id: &str) -> Result<&Customer, FaturaError> {
        self.find_customer(tax_id)
            .ok_or_else(|| FaturaError::Lookup(format!("no customer with tax id {tax_id}")))
    }

    /// Change a customer's name and/or region.
    ///
    /// `None` keeps the current value. The change is carried over to every
    /// invoice bound to the customer.
    pub fn update_customer(
        &mut self,
        tax_id: &str,
        name: Option<&str>,
        region: Option<&str>,
    ) -> Result<(), FaturaError> {
        let current = self.customer(tax_id)?.clone();
        let name = name.map(str::trim).unwrap_or(&current.name).to_string();
        let region = region.map(str::trim).unwrap_or(&current.region).to_string();
        ensure_valid(validation::validate_customer(&name, tax_id, &region))?;

        let updated = Customer::new(name, tax_id, region);
        debug!(tax_id = %tax_id, "Updating customer");
        for customer in self.customers.iter_mut().filter(|c| c.tax_id == tax_id) {
            *customer = updated.clone();
        }
        for invoice in self
            .invoices
            .iter_mut()
            .filter(|i| i.customer.tax_id == tax_id)
        {
            invoice.set_customer(updated.clone());
        }
        Ok(())
    }

    // --- Products ---

    /// Add a product to the catalog and return its code.
    pub fn add_product(&mut self, builder: ProductBuilder) -> Result<u64, FaturaError> {
        let product = builder.build(&mut self.product_ids, &self.config.rates)?;
        if self.products.iter().any(|p| p.id == product.id) {
            return Err(FaturaError::Validation(format!(
                "product code {} is already in the catalog",
                product.id
            )));
        }
        debug!(id = product.id, tag = product.kind.tag(), "Adding catalog product");
        let id = product.id;
        self.products.push(product);
        Ok(id)
    }

    /// Build a product numbered by this ledger without adding it to the catalog.
    pub fn issue_product(&mut self, builder: ProductBuilder) -> Result<Product, FaturaError> {
        builder.build(&mut self.product_ids, &self.config.rates)
    }

    /// Catalog product by code.
    pub fn product(&self, id: u64) -> Result<&Product, FaturaError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| FaturaError::Lookup(format!("no product with code {id}")))
    }

    // --- Invoices ---

    /// Start a new, empty invoice for a registered customer.
    ///
    /// The invoice takes the next number but isn't stored until
    /// [`save_invoice`](Self::save_invoice) accepts it.
    pub fn draft_invoice(
        &mut self,
        tax_id: &str,
        issue_date: NaiveDate,
    ) -> Result<Invoice, FaturaError> {
        let customer = self.customer(tax_id)?.clone();
        Ok(Invoice::new(self.invoice_ids.next_id(), customer, issue_date))
    }

    /// Store an invoice. It must hold at least one product and its number
    /// must not be in use.
    pub fn save_invoice(&mut self, invoice: Invoice) -> Result<u64, FaturaError> {
        if invoice.is_empty() {
            return Err(FaturaError::Validation(format!(
                "invoice {} must contain at least one product",
                invoice.id
            )));
        }
        if self.contains_invoice(invoice.id) {
            return Err(FaturaError::Validation(format!(
                "invoice number {} already exists",
                invoice.id
            )));
        }
        invoice.customer.region_index()?;

        self.invoice_ids.observe(invoice.id);
        for product in invoice.products() {
            self.product_ids.observe(product.id);
        }
        debug!(id = invoice.id, products = invoice.products().len(), "Saving invoice");
        let id = invoice.id;
        self.invoices.push(invoice);
        Ok(id)
    }

    /// Draft, fill from the catalog and save an invoice in one step.
    pub fn create_invoice(
        &mut self,
        tax_id: &str,
        issue_date: NaiveDate,
        product_ids: &[u64],
    ) -> Result<u64, FaturaError> {
        // The number is only taken once the invoice is saved, so a failed
        // attempt doesn't burn one.
        let customer = self.customer(tax_id)?.clone();
        let products = product_ids
            .iter()
            .map(|id| self.product(*id).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        if products.is_empty() {
            return Err(FaturaError::Validation(
                "an invoice must contain at least one product".into(),
            ));
        }

        let mut invoice = Invoice::new(self.invoice_ids.peek(), customer, issue_date);
        for product in products {
            invoice.add_product(product)?;
        }
        self.save_invoice(invoice)
    }

    pub fn contains_invoice(&self, id: u64) -> bool {
        self.invoices.iter().any(|i| i.id == id)
    }

    /// Saved invoice by number.
    pub fn invoice(&self, id: u64) -> Result<&Invoice, FaturaError> {
        self.invoices
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| FaturaError::Lookup(format!("no invoice with number {id}")))
    }

    fn invoice_mut(&mut self, id: u64) -> Result<&mut Invoice, FaturaError> {
        self.invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| FaturaError::Lookup(format!("no invoice with number {id}")))
    }

    /// Add a catalog product to a saved invoice.
    pub fn add_product_to_invoice(
        &mut self,
        invoice_id: u64,
        product_id: u64,
    ) -> Result<(), FaturaError> {
        let product = self.product(product_id)?.clone();
        self.invoice_mut(invoice_id)?.add_product(product)?;
        debug!(invoice = invoice_id, product = product_id, "Added product to invoice");
        Ok(())
    }

    /// Remove a product from a saved invoice. The last product stays.
    pub fn remove_product_from_invoice(
        &mut self,
        invoice_id: u64,
        product_id: u64,
    ) -> Result<Product, FaturaError> {
        let removed = self.invoice_mut(invoice_id)?.remove_product(product_id)?;
        debug!(invoice = invoice_id, product = product_id, "Removed product from invoice");
        Ok(removed)
    }

    /// Change the quantity of a product on a saved invoice. Must be > 0.
    pub fn set_invoice_product_quantity(
        &mut self,
        invoice_id: u64,
        product_id: u64,
        quantity: u32,
    ) -> Result<(), FaturaError> {
        if quantity == 0 {
            return Err(FaturaError::Validation(
                "quantity must be greater than zero".into(),
            ));
        }
        let invoice = self.invoice_mut(invoice_id)?;
        let product = invoice.product_mut(product_id).ok_or_else(|| {
            FaturaError::Lookup(format!(
                "product {product_id} is not on invoice {invoice_id}"
            ))
        })?;
        product.quantity = quantity;
        Ok(())
    }

    /// Bind a saved invoice to another registered customer.
    pub fn set_invoice_customer(&mut self, invoice_id: u64, tax_id: &str) -> Result<(), FaturaError> {
        let customer = self.customer(tax_id)?.clone();
        self.invoice_mut(invoice_id)?.set_customer(customer);
        Ok(())
    }

    /// Change the issue date of a saved invoice, within the configured year range.
    pub fn set_invoice_date(&mut self, invoice_id: u64, date: NaiveDate) -> Result<(), FaturaError> {
        ensure_valid(validation::validate_issue_year(
            date,
            self.config.earliest_year,
            self.config.latest_year(),
        ))?;
        self.invoice_mut(invoice_id)?.set_issue_date(date);
        Ok(())
    }

    // --- Views ---

    /// Tax breakdown per product of a saved invoice.
    pub fn invoice_breakdown(&self, invoice_id: u64) -> Result<Vec<LineBreakdown>, FaturaError> {
        summary::breakdown(self.invoice(invoice_id)?)
    }

    /// One listing row per saved invoice.
    pub fn invoice_summaries(&self) -> Result<Vec<InvoiceSummary>, FaturaError> {
        self.invoices.iter().map(summary::summarize).collect()
    }

    pub fn statistics(&self) -> Result<LedgerStatistics, FaturaError> {
        summary::statistics(&self.invoices)
    }
}
