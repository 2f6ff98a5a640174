//! Tax regions and the region → rate-slot lookup.

use serde::{Deserialize, Serialize};

use super::error::FaturaError;

/// Number of tax regions, and therefore of slots in every rate table.
pub const REGION_COUNT: usize = 3;

/// One of the three Portuguese VAT jurisdictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Continente — mainland Portugal.
    Mainland,
    /// Madeira.
    IslandGroupA,
    /// Açores.
    IslandGroupB,
}

impl Region {
    pub const ALL: [Region; REGION_COUNT] =
        [Region::Mainland, Region::IslandGroupA, Region::IslandGroupB];

    /// Slot of this region in a [`RateTable`](super::RateTable).
    pub fn index(&self) -> usize {
        match self {
            Self::Mainland => 0,
            Self::IslandGroupA => 1,
            Self::IslandGroupB => 2,
        }
    }

    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainland => "Continente",
            Self::IslandGroupA => "Madeira",
            Self::IslandGroupB => "Açores",
        }
    }

    /// Resolve a declared region name.
    ///
    /// Case-insensitive, surrounding whitespace ignored. "Acores" is accepted
    /// as a synonym for "Açores"; no other aliases exist.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "continente" => Some(Self::Mainland),
            "madeira" => Some(Self::IslandGroupA),
            "açores" | "acores" => Some(Self::IslandGroupB),
            _ => None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a declared region name to its rate-table slot (0, 1 or 2).
///
/// Unknown names are a hard [`FaturaError::Lookup`] failure; there is no
/// fallback to the mainland slot.
pub fn region_index(name: &str) -> Result<usize, FaturaError> {
    Region::from_name(name)
        .map(|r| r.index())
        .ok_or_else(|| FaturaError::Lookup(format!("unknown region '{name}'")))
}
