use serde::{Deserialize, Serialize};

use super::error::FaturaError;
use super::region::{Region, region_index};

/// A customer (cliente) invoices are issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Full name (letters and spaces).
    pub name: String,
    /// Tax id (NIF): exactly 9 digits, unique within a ledger.
    pub tax_id: String,
    /// Declared region, as entered ("Continente", "Madeira", "Açores"/"Acores").
    pub region: String,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        tax_id: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tax_id: tax_id.into(),
            region: region.into(),
        }
    }

    /// Rate-table slot for this customer's declared region.
    pub fn region_index(&self) -> Result<usize, FaturaError> {
        region_index(&self.region)
    }

    /// Resolved region, if the declared name is recognised.
    pub fn resolved_region(&self) -> Option<Region> {
        Region::from_name(&self.region)
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (NIF {}, {})", self.name, self.tax_id, self.region)
    }
}
