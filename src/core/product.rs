//! Taxed products and the per-kind VAT rate rules.
//!
//! Every product shares the same base fields; what differs between kinds is
//! the default rate table and the adjustment applied to the regional rate:
//!
//! | Kind | Adjustment (in this order) |
//! |------|----------------------------|
//! | [`ProductKind::ReducedRateFood`] | −1 point with exactly 4 certifications, then ×0.9 if organic |
//! | [`ProductKind::IntermediateRateFood`] | +1 point for category "vinho", then ×0.9 if organic |
//! | [`ProductKind::NormalRateFood`] | ×0.9 if organic |
//! | [`ProductKind::PrescriptionPharmacy`] | none |
//! | [`ProductKind::NonPrescriptionPharmacy`] | −1 point for category "animais" |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::{FaturaError, ValidationError, ensure_valid};
use super::numbering::IdSequence;
use super::rates::{RateTable, TaxConfig};
use super::region::REGION_COUNT;
use super::types::Customer;

/// Multiplier applied to the rate of organic food.
pub const ORGANIC_RATE_FACTOR: Decimal = dec!(0.9);

/// Certification count that earns reduced-rate food a one point reduction.
pub const CERTIFICATION_BONUS_COUNT: usize = 4;

/// Intermediate-rate food category taxed one point higher.
pub const WINE_CATEGORY: &str = "vinho";

/// Non-prescription pharmacy category taxed one point lower.
pub const ANIMAL_CATEGORY: &str = "animais";

/// The taxation category of a product, with its category-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductKind {
    ReducedRateFood {
        organic: bool,
        certifications: Vec<String>,
    },
    IntermediateRateFood {
        organic: bool,
        category: String,
    },
    NormalRateFood {
        organic: bool,
    },
    PrescriptionPharmacy {
        doctor: String,
    },
    NonPrescriptionPharmacy {
        category: String,
    },
}

impl ProductKind {
    /// Type tag used in the text format (`Tipo: ...`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ReducedRateFood { .. } => "Taxa Reduzida",
            Self::IntermediateRateFood { .. } => "Taxa Intermédia",
            Self::NormalRateFood { .. } => "Taxa Normal",
            Self::PrescriptionPharmacy { .. } => "Farmácia Com Prescrição",
            Self::NonPrescriptionPharmacy { .. } => "Farmácia Sem Prescrição",
        }
    }

    /// System default rate table for this kind.
    pub fn default_rates(&self, config: &TaxConfig) -> RateTable {
        match self {
            Self::ReducedRateFood { .. } => config.reduced_food,
            Self::IntermediateRateFood { .. } => config.intermediate_food,
            Self::NormalRateFood { .. } => config.normal_food,
            Self::PrescriptionPharmacy { .. } => config.prescription,
            Self::NonPrescriptionPharmacy { .. } => config.non_prescription,
        }
    }

    /// Whether this is a food product flagged as organic.
    pub fn is_organic(&self) -> bool {
        match self {
            Self::ReducedRateFood { organic, .. }
            | Self::IntermediateRateFood { organic, .. }
            | Self::NormalRateFood { organic } => *organic,
            Self::PrescriptionPharmacy { .. } | Self::NonPrescriptionPharmacy { .. } => false,
        }
    }

    /// Apply the kind-specific adjustment to a regional base rate.
    ///
    /// Category and certification adjustments come first, the organic
    /// discount second.
    pub fn adjust_rate(&self, base: Decimal) -> Decimal {
        match self {
            Self::ReducedRateFood {
                organic,
                certifications,
            } => {
                let mut rate = base;
                if certifications.len() == CERTIFICATION_BONUS_COUNT {
                    rate -= Decimal::ONE;
                }
                organic_discount(rate, *organic)
            }
            Self::IntermediateRateFood { organic, category } => {
                let mut rate = base;
                if category_is(category, WINE_CATEGORY) {
                    rate += Decimal::ONE;
                }
                organic_discount(rate, *organic)
            }
            Self::NormalRateFood { organic } => organic_discount(base, *organic),
            Self::PrescriptionPharmacy { .. } => base,
            Self::NonPrescriptionPharmacy { category } => {
                if category_is(category, ANIMAL_CATEGORY) {
                    base - Decimal::ONE
                } else {
                    base
                }
            }
        }
    }
}

fn organic_discount(rate: Decimal, organic: bool) -> Decimal {
    if organic {
        rate * ORGANIC_RATE_FACTOR
    } else {
        rate
    }
}

fn category_is(category: &str, expected: &str) -> bool {
    category.trim().to_lowercase() == expected
}

/// A product (produto) from the catalog or on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product code, unique within a ledger.
    pub id: u64,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    /// Unit price without VAT. Never negative.
    pub unit_price: Decimal,
    /// Rates per region this product is taxed at.
    pub rates: RateTable,
    pub kind: ProductKind,
}

impl Product {
    /// `quantity × unit_price`.
    ///
    /// Fails with [`FaturaError::Arithmetic`] if the product overflows.
    pub fn price_excluding_tax(&self) -> Result<Decimal, FaturaError> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)
            .ok_or_else(|| {
                FaturaError::Arithmetic(format!(
                    "price of '{}' overflows: {} x {}",
                    self.name, self.quantity, self.unit_price
                ))
            })
    }

    /// The VAT percentage applied for a customer, after adjustments.
    ///
    /// Fails with [`FaturaError::Lookup`] if the customer's region is unknown.
    pub fn effective_rate(&self, customer: &Customer) -> Result<Decimal, FaturaError> {
        self.rate_at(customer.region_index()?)
    }

    /// `price_excluding_tax × (1 + rate / 100)` for the customer's region.
    pub fn price_including_tax(&self, customer: &Customer) -> Result<Decimal, FaturaError> {
        self.price_including_tax_at(customer.region_index()?)
    }

    fn rate_at(&self, index: usize) -> Result<Decimal, FaturaError> {
        Ok(self.kind.adjust_rate(self.rates.rate(index)?))
    }

    fn price_including_tax_at(&self, index: usize) -> Result<Decimal, FaturaError> {
        let rate = self.rate_at(index)?;
        let excluding = self.price_excluding_tax()?;
        Decimal::ONE
            .checked_add(rate / Decimal::ONE_HUNDRED)
            .and_then(|factor| excluding.checked_mul(factor))
            .ok_or_else(|| {
                FaturaError::Arithmetic(format!(
                    "price of '{}' with {}% VAT overflows",
                    self.name, rate
                ))
            })
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} [{}] {} x {}",
            self.id,
            self.name,
            self.kind.tag(),
            self.quantity,
            self.unit_price
        )
    }
}

/// Builder for [`Product`].
///
/// ```
/// use fatura::core::*;
/// use rust_decimal_macros::dec;
///
/// let mut ids = IdSequence::new();
/// let apple = ProductBuilder::new("Maçã", ProductKind::NormalRateFood { organic: false })
///     .quantity(3)
///     .unit_price(dec!(0.50))
///     .build(&mut ids, &TaxConfig::default())
///     .unwrap();
/// assert_eq!(apple.id, 1);
/// assert_eq!(apple.price_excluding_tax().unwrap(), dec!(1.50));
/// ```
#[derive(Debug, Clone)]
pub struct ProductBuilder {
    id: Option<u64>,
    name: String,
    description: String,
    quantity: u32,
    unit_price: Decimal,
    rates: Option<RateTable>,
    kind: ProductKind,
}

impl ProductBuilder {
    pub fn new(name: impl Into<String>, kind: ProductKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            quantity: 0,
            unit_price: Decimal::ZERO,
            rates: None,
            kind,
        }
    }

    /// Use an explicit product code instead of the next one in sequence.
    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = price;
        self
    }

    /// Override the default rate table for the product kind.
    pub fn rates(mut self, rates: RateTable) -> Self {
        self.rates = Some(rates);
        self
    }

    /// Build the product, drawing its code from `ids` unless one was set.
    ///
    /// An explicit code advances `ids` past it, so later codes stay unique.
    pub fn build(self, ids: &mut IdSequence, config: &TaxConfig) -> Result<Product, FaturaError> {
        if self.unit_price < Decimal::ZERO {
            return Err(FaturaError::Validation(format!(
                "unit price of '{}' must not be negative (got {})",
                self.name, self.unit_price
            )));
        }
        if self.name.trim().is_empty() {
            return Err(FaturaError::Validation(
                "product name must not be empty".into(),
            ));
        }
        ensure_valid(self.text_errors())?;

        let rates = self
            .rates
            .unwrap_or_else(|| self.kind.default_rates(config));
        let mut product = Product {
            id: 0,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            rates,
            kind: self.kind,
        };
        // Reject amounts that cannot be totalled in some region.
        for index in 0..REGION_COUNT {
            product.price_including_tax_at(index).map_err(|_| {
                FaturaError::Validation(format!(
                    "amount of '{}' is too large: {} x {}",
                    product.name, product.quantity, product.unit_price
                ))
            })?;
        }

        product.id = match self.id {
            Some(id) => {
                ids.observe(id);
                id
            }
            None => ids.next_id(),
        };
        Ok(product)
    }

    /// Free-text fields must stay on one line, and certifications must be
    /// non-empty and comma-free so the list survives a text round trip.
    fn text_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        single_line(&mut errors, "product.name", &self.name);
        single_line(&mut errors, "product.description", &self.description);
        match &self.kind {
            ProductKind::IntermediateRateFood { category, .. }
            | ProductKind::NonPrescriptionPharmacy { category } => {
                single_line(&mut errors, "product.category", category)
            }
            ProductKind::PrescriptionPharmacy { doctor } => {
                single_line(&mut errors, "product.doctor", doctor)
            }
            ProductKind::ReducedRateFood { certifications, .. } => {
                for cert in certifications {
                    single_line(&mut errors, "product.certifications", cert);
                    if cert.trim().is_empty() || cert.contains(',') {
                        errors.push(ValidationError::new(
                            "product.certifications",
                            format!("'{cert}' must be non-empty and contain no commas"),
                        ));
                    }
                }
            }
            ProductKind::NormalRateFood { .. } => {}
        }
        errors
    }
}

fn single_line(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.contains(['\n', '\r']) {
        errors.push(ValidationError::new(field, "must not contain line breaks"));
    }
}
