//! Stock-keeping unit identifiers.
//!
//! SKUs arrive as free text typed or pasted into a spreadsheet, so they are
//! canonicalized with [`normalize_sku`] before being compared with anything
//! the Admin API returns.

use core::fmt;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Zero-width space, non-joiner, joiner and the byte-order mark.
const INVISIBLE_CHARS: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Canonicalize raw SKU text into a comparable key.
///
/// - Unicode dashes (U+2010..=U+2015) and the minus sign (U+2212) become `-`
/// - zero-width characters and byte-order marks are removed
/// - surrounding whitespace is trimmed and internal runs collapse to one space
///
/// Never fails; the result may be empty. Applying it twice yields the same
/// string as applying it once.
///
/// ```
/// use replenish_core::normalize_sku;
///
/// assert_eq!(normalize_sku("  A\u{2014}B "), "A-B");
/// assert_eq!(normalize_sku("AS \u{200B} 100"), "AS 100");
/// assert_eq!(normalize_sku(""), "");
/// ```
#[must_use]
pub fn normalize_sku(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| !INVISIBLE_CHARS.contains(c))
        .map(|c| if is_dash(c) { '-' } else { c })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

const fn is_dash(c: char) -> bool {
    matches!(c, '\u{2010}'..='\u{2015}' | '\u{2212}')
}

/// A normalized, non-empty SKU.
///
/// Construct with [`Sku::parse`], which applies [`normalize_sku`] and rejects
/// input that is empty afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Normalize raw text into a SKU. Returns `None` when nothing remains.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_sku(raw);
        (!normalized.is_empty()).then_some(Self(normalized))
    }

    /// Get the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::borrow::Borrow<str> for Sku {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Normalize a column of raw values into unique SKUs, keeping first-seen order.
///
/// Values that normalize to the empty string are dropped.
pub fn unique_skus<I, S>(values: I) -> Vec<Sku>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter_map(|v| Sku::parse(v.as_ref()))
        .filter(|sku| seen.insert(sku.clone()))
        .collect()
}
