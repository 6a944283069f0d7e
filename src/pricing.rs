/// Price quoting for listings
///
/// Pure calculation: nights x per-category daily rate x guest count.
/// The currency is a table-driven policy keyed by category, not a locale
/// decision: hotels quote in dollars, every other category in cedis.
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Daily rates per listing category
const DAILY_RATES: &[(&str, i64)] = &[
    ("Student Hostel", 32),
    ("Luxury Apartment", 50),
    ("Hotel", 76),
    ("Student Residence", 40),
    ("Shared House", 27),
    ("Modern Apartment", 93),
    ("Budget Hostel", 22),
    ("Premium Apartment", 140),
    ("Green Hostel", 37),
    ("Studio Apartment", 60),
    ("Study-Focused Hostel", 32),
];

/// Rate used when a category is missing from the table
pub const DEFAULT_DAILY_RATE: i64 = 50;

/// Quote currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "GHS")]
    Cedi,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// Symbol used when formatting amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Cedi => "Ghc",
            Currency::Usd => "$",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Cedi => "GHS",
            Currency::Usd => "USD",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "GHS" => Some(Currency::Cedi),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }
}

/// A priced amount in a single currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    pub currency: Currency,
    pub amount: i64,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.currency.symbol(), self.amount)
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (currency, rest) = if let Some(rest) = s.strip_prefix("Ghc") {
            (Currency::Cedi, rest)
        } else if let Some(rest) = s.strip_prefix('$') {
            (Currency::Usd, rest)
        } else {
            return Err(format!("Unknown currency prefix in price: {}", s));
        };

        let amount = rest
            .parse::<i64>()
            .map_err(|_| format!("Invalid price amount: {}", s))?;

        Ok(Price { currency, amount })
    }
}

// Prices travel over the wire as their formatted string ("Ghc1792")
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Daily rate for a category, falling back to the default for unknown keys
pub fn daily_rate(category: &str) -> i64 {
    DAILY_RATES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, rate)| *rate)
        .unwrap_or(DEFAULT_DAILY_RATE)
}

/// Currency a category quotes in
pub fn currency_for(category: &str) -> Currency {
    if category == "Hotel" {
        Currency::Usd
    } else {
        Currency::Cedi
    }
}

/// Whole nights between two dates; may be zero or negative, date-order
/// validation is the submission flow's responsibility
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// Compute a quote for a stay
pub fn quote(category: &str, check_in: NaiveDate, check_out: NaiveDate, guests: i64) -> Price {
    let nights = nights_between(check_in, check_out);
    Price {
        currency: currency_for(category),
        amount: daily_rate(category) * nights * guests,
    }
}
