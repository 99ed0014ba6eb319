//! ISO 4217 currency table.
//!
//! Maps the commonly used ISO 4217 codes to the number of minor-unit
//! digits each currency carries (EUR has cents, JPY has none, KWD has
//! fils at three digits). Money amounts are always held at that scale.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};

use super::error::PriceError;

/// A currency: ISO 4217 code plus its minor-unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Currency {
    code: &'static str,
    minor_digits: u32,
}

impl Currency {
    /// Look up a currency by its ISO 4217 code (case-insensitive).
    pub fn of(code: &str) -> Result<Self, PriceError> {
        let upper = code.trim().to_ascii_uppercase();
        CURRENCIES
            .binary_search_by(|(c, _)| (*c).cmp(upper.as_str()))
            .map(|idx| {
                let (code, minor_digits) = CURRENCIES[idx];
                Self { code, minor_digits }
            })
            .map_err(|_| PriceError::UnknownCurrency(code.to_string()))
    }

    /// Three-letter ISO 4217 code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Number of decimal digits of the minor unit.
    pub fn minor_digits(&self) -> u32 {
        self.minor_digits
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl TryFrom<String> for Currency {
    type Error = PriceError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::of(&code)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::of(&code).map_err(de::Error::custom)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code.to_string()
    }
}

/// Check whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency_code(code: &str) -> bool {
    CURRENCIES.binary_search_by(|(c, _)| (*c).cmp(code)).is_ok()
}

/// Sorted list of ISO 4217 codes with their minor-unit digits.
/// Sorted for binary search.
static CURRENCIES: &[(&str, u32)] = &[
    ("AED", 2), // UAE Dirham
    ("AMD", 2), // Armenian Dram
    ("AUD", 2), // Australian Dollar
    ("BGN", 2), // Bulgarian Lev
    ("BHD", 3), // Bahraini Dinar
    ("BRL", 2), // Brazilian Real
    ("CAD", 2), // Canadian Dollar
    ("CHF", 2), // Swiss Franc
    ("CLP", 0), // Chilean Peso
    ("CNY", 2), // Chinese Yuan
    ("CZK", 2), // Czech Koruna
    ("DKK", 2), // Danish Krone
    ("EGP", 2), // Egyptian Pound
    ("EUR", 2), // Euro
    ("GBP", 2), // Pound Sterling
    ("GEL", 2), // Georgian Lari
    ("HKD", 2), // Hong Kong Dollar
    ("HUF", 2), // Hungarian Forint
    ("IDR", 2), // Indonesian Rupiah
    ("ILS", 2), // Israeli Shekel
    ("INR", 2), // Indian Rupee
    ("ISK", 0), // Icelandic Krona
    ("JOD", 3), // Jordanian Dinar
    ("JPY", 0), // Japanese Yen
    ("KES", 2), // Kenyan Shilling
    ("KRW", 0), // South Korean Won
    ("KWD", 3), // Kuwaiti Dinar
    ("KZT", 2), // Kazakhstani Tenge
    ("MXN", 2), // Mexican Peso
    ("MYR", 2), // Malaysian Ringgit
    ("NGN", 2), // Nigerian Naira
    ("NOK", 2), // Norwegian Krone
    ("NZD", 2), // New Zealand Dollar
    ("OMR", 3), // Omani Rial
    ("PHP", 2), // Philippine Peso
    ("PLN", 2), // Polish Zloty
    ("RON", 2), // Romanian Leu
    ("RUB", 2), // Russian Ruble
    ("SAR", 2), // Saudi Riyal
    ("SEK", 2), // Swedish Krona
    ("SGD", 2), // Singapore Dollar
    ("THB", 2), // Thai Baht
    ("TND", 3), // Tunisian Dinar
    ("TRY", 2), // Turkish Lira
    ("TWD", 2), // New Taiwan Dollar
    ("UAH", 2), // Ukrainian Hryvnia
    ("USD", 2), // US Dollar
    ("VND", 0), // Vietnamese Dong
    ("ZAR", 2), // South African Rand
];
