use std::{
    fmt,
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{
    de::{self, Visitor},
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const INR_CURRENCY_CODE: &str = "INR";
pub const PAISE_PER_RUPEE: i64 = 100;

//--------------------------------------        Inr          ---------------------------------------------------------
/// An amount of Indian Rupees, held in the gateway's minor unit (paise).
///
/// On the wire (JSON) amounts are expressed in rupees, e.g. `1180.5`, since that is what clients send and display.
/// In the database and towards the payment gateway the integer paise value is used.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Inr(i64);

op!(binary Inr, Add, add);
op!(binary Inr, Sub, sub);
op!(inplace Inr, AddAssign, add_assign);
op!(inplace Inr, SubAssign, sub_assign);
op!(unary Inr, Neg, neg);

impl Sum for Inr {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Value cannot be represented in paise: {0}")]
pub struct InrConversionError(String);

impl From<i64> for Inr {
    fn from(paise: i64) -> Self {
        Self(paise)
    }
}

impl TryFrom<f64> for Inr {
    type Error = InrConversionError;

    fn try_from(rupees: f64) -> Result<Self, Self::Error> {
        Self::from_rupees(rupees)
    }
}

impl Display for Inr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}₹{}.{:02}", abs / 100, abs % 100)
    }
}

impl Inr {
    pub fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    /// Converts a rupee amount into paise, rounding to the nearest paisa (half away from zero).
    pub fn from_rupees(rupees: f64) -> Result<Self, InrConversionError> {
        if !rupees.is_finite() {
            return Err(InrConversionError(format!("{rupees} is not a finite number")));
        }
        let paise = (rupees * PAISE_PER_RUPEE as f64).round();
        if paise > i64::MAX as f64 || paise < i64::MIN as f64 {
            return Err(InrConversionError(format!("{rupees} is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(paise as i64))
    }

    pub fn paise(&self) -> i64 {
        self.0
    }

    pub fn rupees(&self) -> f64 {
        self.0 as f64 / PAISE_PER_RUPEE as f64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `None` if the sum does not fit in an `i64` number of paise.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Returns `None` if the difference does not fit in an `i64` number of paise.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Serialize for Inr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % PAISE_PER_RUPEE == 0 {
            serializer.serialize_i64(self.0 / PAISE_PER_RUPEE)
        } else {
            serializer.serialize_f64(self.rupees())
        }
    }
}

struct InrVisitor;

impl<'de> Visitor<'de> for InrVisitor {
    type Value = Inr;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a rupee amount, as a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.checked_mul(PAISE_PER_RUPEE).map(Inr).ok_or_else(|| E::custom(format!("{v} rupees is out of range")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(format!("{v} rupees is out of range")))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Inr::from_rupees(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let rupees = v.trim().parse::<f64>().map_err(|e| E::custom(format!("'{v}' is not a rupee amount. {e}")))?;
        self.visit_f64(rupees)
    }
}

impl<'de> Deserialize<'de> for Inr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(InrVisitor)
    }
}
