//! Location-scoped inventory quantities.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named inventory quantity kinds requested from the Admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityName {
    /// Physically present at the location.
    OnHand,
    /// Available to sell.
    Available,
    /// Reserved by unfulfilled orders.
    Committed,
    /// Inbound on transfers or purchase orders.
    Incoming,
}

impl QuantityName {
    /// The Admin API name of this quantity kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnHand => "on_hand",
            Self::Available => "available",
            Self::Committed => "committed",
            Self::Incoming => "incoming",
        }
    }
}

impl fmt::Display for QuantityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a quantity name is not one of the four tracked kinds.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown quantity name: {0}")]
pub struct ParseQuantityNameError(pub String);

impl FromStr for QuantityName {
    type Err = ParseQuantityNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_hand" => Ok(Self::OnHand),
            "available" => Ok(Self::Available),
            "committed" => Ok(Self::Committed),
            "incoming" => Ok(Self::Incoming),
            _ => Err(ParseQuantityNameError(s.to_string())),
        }
    }
}

/// Inventory quantities of one SKU at one location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Quantity on hand.
    pub on_hand: i64,
    /// Quantity available to sell.
    pub available: i64,
    /// Quantity committed to orders.
    pub committed: i64,
    /// Quantity incoming.
    pub incoming: i64,
}

impl InventoryRecord {
    /// The record written for SKUs that neither lookup found.
    pub const ZERO: Self = Self {
        on_hand: 0,
        available: 0,
        committed: 0,
        incoming: 0,
    };

    /// Aggregate `(name, quantity)` entries into a record.
    ///
    /// Entries of the same kind are summed, missing quantities count as zero
    /// and unknown names are ignored. When `on_hand` sums to zero it is
    /// replaced by `available + committed`, because the API omits the
    /// `on_hand` entry entirely for some items. A genuine zero on hand with
    /// stock still available or committed is therefore indistinguishable
    /// from an omitted entry.
    pub fn from_quantities<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<i64>)>,
    {
        let mut record = Self::ZERO;
        for (name, quantity) in entries {
            let Ok(kind) = name.parse::<QuantityName>() else {
                continue;
            };
            let quantity = quantity.unwrap_or(0);
            match kind {
                QuantityName::OnHand => record.on_hand += quantity,
                QuantityName::Available => record.available += quantity,
                QuantityName::Committed => record.committed += quantity,
                QuantityName::Incoming => record.incoming += quantity,
            }
        }
        record.with_on_hand_fallback()
    }

    /// Substitute `available + committed` when `on_hand` is zero.
    #[must_use]
    pub const fn with_on_hand_fallback(mut self) -> Self {
        if self.on_hand == 0 {
            self.on_hand = self.available + self.committed;
        }
        self
    }

    /// Whether every quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.on_hand == 0 && self.available == 0 && self.committed == 0 && self.incoming == 0
    }
}
