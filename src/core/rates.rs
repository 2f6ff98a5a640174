//! Regional VAT rate tables and the system default tables per product kind.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::FaturaError;
use super::region::{REGION_COUNT, region_index};

/// VAT percentages indexed by region: mainland, Madeira, Açores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable(pub [Decimal; REGION_COUNT]);

impl RateTable {
    pub const fn new(mainland: Decimal, island_a: Decimal, island_b: Decimal) -> Self {
        Self([mainland, island_a, island_b])
    }

    /// Rate (percentage) at a region slot.
    pub fn rate(&self, index: usize) -> Result<Decimal, FaturaError> {
        self.0
            .get(index)
            .copied()
            .ok_or_else(|| FaturaError::Lookup(format!("no rate for region slot {index}")))
    }

    /// Rate (percentage) for a declared region name.
    pub fn rate_for(&self, region: &str) -> Result<Decimal, FaturaError> {
        self.rate(region_index(region)?)
    }
}

impl std::fmt::Display for RateTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0], self.0[1], self.0[2])
    }
}

/// Reduced rate food (taxa reduzida).
pub const REDUCED_FOOD_RATES: RateTable = RateTable::new(dec!(6), dec!(5), dec!(4));
/// Intermediate rate food (taxa intermédia).
pub const INTERMEDIATE_FOOD_RATES: RateTable = RateTable::new(dec!(13), dec!(12), dec!(9));
/// Normal rate food (taxa normal).
pub const NORMAL_FOOD_RATES: RateTable = RateTable::new(dec!(23), dec!(22), dec!(16));
/// Prescription pharmacy products.
pub const PRESCRIPTION_RATES: RateTable = RateTable::new(dec!(6), dec!(5), dec!(4));
/// Non-prescription pharmacy products.
pub const NON_PRESCRIPTION_RATES: RateTable = RateTable::new(dec!(23), dec!(23), dec!(23));

/// Default rate tables handed to products that don't carry their own,
/// including every product rebuilt by the text importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfig {
    pub reduced_food: RateTable,
    pub intermediate_food: RateTable,
    pub normal_food: RateTable,
    pub prescription: RateTable,
    pub non_prescription: RateTable,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            reduced_food: REDUCED_FOOD_RATES,
            intermediate_food: INTERMEDIATE_FOOD_RATES,
            normal_food: NORMAL_FOOD_RATES,
            prescription: PRESCRIPTION_RATES,
            non_prescription: NON_PRESCRIPTION_RATES,
        }
    }
}

/// Builder for [`TaxConfig`].
///
/// # Example
///
/// ```
/// use fatura::{RateTable, TaxConfigBuilder};
/// use rust_decimal_macros::dec;
///
/// let config = TaxConfigBuilder::new()
///     .normal_food(RateTable::new(dec!(23), dec!(22), dec!(18)))
///     .build();
/// assert_eq!(config.normal_food.rate(2).unwrap(), dec!(18));
/// ```
#[derive(Debug, Default)]
pub struct TaxConfigBuilder {
    config: TaxConfig,
}

impl TaxConfigBuilder {
    /// Start from the statutory default tables.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduced_food(mut self, table: RateTable) -> Self {
        self.config.reduced_food = table;
        self
    }

    pub fn intermediate_food(mut self, table: RateTable) -> Self {
        self.config.intermediate_food = table;
        self
    }

    pub fn normal_food(mut self, table: RateTable) -> Self {
        self.config.normal_food = table;
        self
    }

    pub fn prescription(mut self, table: RateTable) -> Self {
        self.config.prescription = table;
        self
    }

    pub fn non_prescription(mut self, table: RateTable) -> Self {
        self.config.non_prescription = table;
        self
    }

    pub fn build(self) -> TaxConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_for_region_names() {
        assert_eq!(NORMAL_FOOD_RATES.rate_for("Continente").unwrap(), dec!(23));
        assert_eq!(NORMAL_FOOD_RATES.rate_for("madeira").unwrap(), dec!(22));
        assert_eq!(NORMAL_FOOD_RATES.rate_for("Acores").unwrap(), dec!(16));
    }

    #[test]
    fn unknown_region_does_not_default_to_mainland() {
        assert!(matches!(
            REDUCED_FOOD_RATES.rate_for("Galiza"),
            Err(FaturaError::Lookup(_))
        ));
    }

    #[test]
    fn out_of_range_slot() {
        assert!(REDUCED_FOOD_RATES.rate(3).is_err());
    }

    #[test]
    fn builder_overrides_single_table() {
        let table = RateTable::new(dec!(1), dec!(2), dec!(3));
        let config = TaxConfigBuilder::new().prescription(table).build();
        assert_eq!(config.prescription, table);
        assert_eq!(config.reduced_food, REDUCED_FOOD_RATES);
    }

    #[test]
    fn display_lists_all_slots() {
        assert_eq!(INTERMEDIATE_FOOD_RATES.to_string(), "[13, 12, 9]");
    }
}
