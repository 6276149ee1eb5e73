//! [`Price`]-related definitions.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Non-negative amount of money in the single currency the site quotes
/// prices in (US dollars).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`] if the provided `amount` is non-negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then(|| Self(amount.normalize()))
    }

    /// Returns the amount of this [`Price`].
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns this [`Price`] formatted for humans, like `$1,250,000`.
    ///
    /// Cents are shown only when present.
    #[must_use]
    pub fn label(&self) -> String {
        let rounded = self.0.round_dp(2);
        let whole = rounded.trunc();
        let cents = ((rounded - whole) * Decimal::ONE_HUNDRED)
            .to_u8()
            .unwrap_or_default();

        let digits = whole.to_string();
        let mut grouped =
            String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        if cents == 0 {
            format!("${grouped}")
        } else {
            format!("${grouped}.{cents:02}")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error of parsing a [`Price`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Input is not a number.
    #[display("not a number")]
    NotANumber,

    /// Input is a negative number.
    #[display("negative amount")]
    Negative,
}

impl FromStr for Price {
    type Err = ParseError;

    /// Parses a [`Price`] as typed by a human: `$`, `,`, `_` and whitespace
    /// are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
            .collect::<String>();
        if cleaned.is_empty() {
            return Err(ParseError::NotANumber);
        }
        let amount =
            Decimal::from_str(&cleaned).map_err(|_| ParseError::NotANumber)?;
        Self::new(amount).ok_or(ParseError::Negative)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if self.0.is_integer() {
            if let Some(n) = self.0.to_u64() {
                return s.serialize_u64(n);
            }
        }
        s.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        /// [`de::Visitor`] accepting both numbers and strings.
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative price")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                Ok(Price(Decimal::from(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                Price::new(Decimal::from(v))
                    .ok_or_else(|| E::custom(ParseError::Negative))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                Decimal::from_f64(v)
                    .ok_or_else(|| E::custom(ParseError::NotANumber))
                    .and_then(|d| {
                        Price::new(d)
                            .ok_or_else(|| E::custom(ParseError::Negative))
                    })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                v.parse().map_err(E::custom)
            }
        }

        d.deserialize_any(Visitor)
    }
}
