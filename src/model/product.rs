use rust_decimal::Decimal;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq)]
pub struct VariantOptionModel {
    pub id_: u32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct GarmentTypeModel {
    pub id_: u32,
    pub name: String,
}

impl GarmentTypeModel {
    /// Derive the chat-conversation label for this garment type. Lowercase,
    /// Unicode-decomposed with combining marks dropped, whitespace removed,
    /// restricted to `[a-z0-9_-]`. Returns `None` when nothing survives the
    /// filtering, the caller then skips labeling entirely.
    pub fn conversation_label(&self) -> Option<String> {
        let lowered = self.name.to_lowercase();
        let stripped = lowered
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect::<String>();
        let filtered = stripped
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
            .collect::<String>();
        if filtered.is_empty() {
            None
        } else {
            Some(filtered)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductBriefModel {
    pub id_: u64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

pub struct ProductVariantModel {
    pub id_: u64,
    pub stock: u32,
    pub color: Option<VariantOptionModel>,
    pub size: Option<VariantOptionModel>,
}

pub struct ProductModel {
    pub id_: u64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available: bool,
    pub category: Option<VariantOptionModel>,
    pub garment_type: Option<GarmentTypeModel>,
    pub variants: Vec<ProductVariantModel>,
}

/// Variant joined with the parent-product attributes a cart mutation
/// needs, price and name for the line snapshot, garment type for the
/// conversation-label side effect.
pub struct VariantPurchaseModel {
    pub variant_id: u64,
    pub stock: u32,
    pub product: ProductBriefModel,
    pub garment_type: Option<GarmentTypeModel>,
}

#[derive(Default)]
pub struct ProductSearchFilter {
    // partial-match keywords, both optional
    pub name: Option<String>,
    pub description: Option<String>,
}
