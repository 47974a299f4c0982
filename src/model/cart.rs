use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use super::product::{ProductBriefModel, VariantOptionModel};
use super::CartIdentifier;
use crate::constant::CART_STATUS_ACTIVE;

#[derive(Debug, Clone, PartialEq)]
pub enum CartStatus {
    Active,
    // lifecycle beyond "active" belongs to the backing store, values this
    // service never writes pass through verbatim
    Other(String),
}

impl CartStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => CART_STATUS_ACTIVE,
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for CartStatus {
    fn from(value: &str) -> Self {
        if value == CART_STATUS_ACTIVE {
            Self::Active
        } else {
            Self::Other(value.to_string())
        }
    }
}

pub struct CartModel {
    pub id_: CartIdentifier,
    pub owner: Option<u64>,
    pub status: Option<CartStatus>,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug)]
pub struct CartLineModel {
    pub id_: u64,
    pub cart_id: CartIdentifier,
    pub variant_id: u64,
    pub qty: u32,
}

#[derive(Debug, PartialEq)]
pub enum CartQtyRejection {
    ZeroQuantity,
    InsufficientStock { available: u32 },
}

/// Outcome of reconciling a requested quantity against the line set of one
/// cart. A variant already present merges by incrementing the saved row,
/// an absent variant turns into a fresh row, both validated against the
/// stock level read in the same operation.
#[derive(Debug, PartialEq)]
pub enum CartLineReconcile {
    Insert { qty: u32 },
    Merge { line_id: u64, qty_total: u32 },
}

impl CartLineReconcile {
    // the quantity checked against stock is the post-merge total, never
    // the delta, two sequential adds of one variant cannot exceed the
    // stock observed at each write
    pub fn decide(
        existing: Option<&CartLineModel>,
        stock: u32,
        qty_req: u32,
    ) -> Result<Self, CartQtyRejection> {
        if qty_req == 0 {
            return Err(CartQtyRejection::ZeroQuantity);
        }
        match existing {
            Some(line) => {
                let qty_total = line.qty.saturating_add(qty_req);
                if stock < qty_total {
                    Err(CartQtyRejection::InsufficientStock { available: stock })
                } else {
                    Ok(Self::Merge {
                        line_id: line.id_,
                        qty_total,
                    })
                }
            }
            None => {
                if stock < qty_req {
                    Err(CartQtyRejection::InsufficientStock { available: stock })
                } else {
                    Ok(Self::Insert { qty: qty_req })
                }
            }
        }
    } // end of fn decide

    /// absolute replacement of a saved quantity, the whole new value is
    /// checked against stock rather than any difference from the old one
    pub fn replace(stock: u32, qty_new: u32) -> Result<u32, CartQtyRejection> {
        if qty_new == 0 {
            Err(CartQtyRejection::ZeroQuantity)
        } else if stock < qty_new {
            Err(CartQtyRejection::InsufficientStock { available: stock })
        } else {
            Ok(qty_new)
        }
    }
} // end of impl CartLineReconcile

/// One cart line joined with the variant / product / color / size
/// descriptors, the shape the cart-detail view works on.
pub struct CartLineDetailModel {
    pub line_id: u64,
    pub qty: u32,
    pub variant_id: u64,
    pub stock: u32,
    pub product: ProductBriefModel,
    pub color: Option<VariantOptionModel>,
    pub size: Option<VariantOptionModel>,
}

pub struct CartSummaryModel {
    pub cart: CartModel,
    pub lines: Vec<CartLineDetailModel>,
}

impl CartSummaryModel {
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| l.product.price * Decimal::from(l.qty))
            .sum()
    }

    // number of distinct lines, not the sum of quantities
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }
}
