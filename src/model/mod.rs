mod cart;
mod client;
mod product;

use std::fmt;
use std::str::FromStr;

use serde::de::{Error as DeserializeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AppError, AppErrorCode};

pub use cart::{
    CartLineDetailModel, CartLineModel, CartLineReconcile, CartModel, CartQtyRejection,
    CartStatus, CartSummaryModel,
};
pub use client::ClientModel;
pub use product::{
    GarmentTypeModel, ProductBriefModel, ProductModel, ProductSearchFilter, ProductVariantModel,
    VariantOptionModel, VariantPurchaseModel,
};

/// Cart identifier as accepted on every public surface. The backing store
/// may mint plain serial numbers or UUID-shaped tokens depending on how the
/// cart was created, both forms resolve here once at the boundary and stay
/// typed through the call chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartIdentifier {
    Numeric(i64),
    Opaque(String),
}

impl CartIdentifier {
    fn valid_opaque(s: &str) -> bool {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }
}

impl FromStr for CartIdentifier {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<i64>() {
            Ok(Self::Numeric(n))
        } else if Self::valid_opaque(s) {
            Ok(Self::Opaque(s.to_string()))
        } else {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("cart-id:{}", s)),
            })
        }
    }
}

impl fmt::Display for CartIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{}", n),
            Self::Opaque(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for CartIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Numeric(n) => serializer.serialize_i64(*n),
            Self::Opaque(s) => serializer.serialize_str(s.as_str()),
        }
    }
}

struct CartIdentifierVisitor;

impl Visitor<'_> for CartIdentifierVisitor {
    type Value = CartIdentifier;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or an alphanumeric/hyphen token")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: DeserializeError,
    {
        Ok(CartIdentifier::Numeric(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: DeserializeError,
    {
        i64::try_from(v)
            .map(CartIdentifier::Numeric)
            .map_err(|_e| E::custom("cart-id out of range"))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: DeserializeError,
    {
        CartIdentifier::from_str(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for CartIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CartIdentifierVisitor)
    }
}
