use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{
    CartIdentifier, CartLineDetailModel, CartLineModel, CartModel, CartSummaryModel, ProductModel,
    ProductSearchFilter, ProductVariantModel, VariantOptionModel,
};

// ---- request bodies -------------------------------------------------------
//
// fields arrive as options so an incomplete body still deserializes and the
// use-case layer answers with the proper localized message instead of the
// framework's default rejection

#[derive(Deserialize)]
pub struct CartItemReqDto {
    #[serde(default)]
    pub product_variant_id: Option<u64>,
    #[serde(default)]
    pub qty: Option<i64>,
    // chat conversation to tag with the garment label, optional
    #[serde(default)]
    pub conversation_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct CartItemQtyDto {
    #[serde(default)]
    pub qty: Option<i64>,
}

#[derive(Deserialize)]
pub struct ClientSessionReqDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct ProductSearchQueryDto {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<ProductSearchQueryDto> for ProductSearchFilter {
    fn from(value: ProductSearchQueryDto) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(Deserialize)]
pub struct RequestHumanReqDto {
    #[serde(default)]
    pub conversation_id: Option<u64>,
    #[serde(default)]
    pub reason: Option<String>,
}

// ---- response bodies ------------------------------------------------------

#[derive(Serialize)]
pub struct ErrorRespDto {
    pub error: String,
}

#[derive(Serialize)]
pub struct MessageRespDto {
    pub message: String,
}

#[derive(Serialize)]
pub struct CartDto {
    pub id: CartIdentifier,
    pub client_id: Option<u64>,
    pub status: Option<String>,
    pub created_at: String,
}

impl From<CartModel> for CartDto {
    fn from(value: CartModel) -> Self {
        Self {
            id: value.id_,
            client_id: value.owner,
            status: value.status.map(|s| s.as_str().to_string()),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct CartRespDto {
    pub message: String,
    pub data: CartDto,
}

#[derive(Serialize)]
pub struct CartItemDto {
    pub id: u64,
    pub cart_id: CartIdentifier,
    pub product_variant_id: u64,
    pub qty: u32,
}

impl From<CartLineModel> for CartItemDto {
    fn from(value: CartLineModel) -> Self {
        Self {
            id: value.id_,
            cart_id: value.cart_id,
            product_variant_id: value.variant_id,
            qty: value.qty,
        }
    }
}

#[derive(Serialize)]
pub struct CartItemRespDto {
    pub message: String,
    pub data: CartItemDto,
}

#[derive(Serialize)]
pub struct OptionDto {
    pub id: u32,
    pub name: String,
}

impl From<VariantOptionModel> for OptionDto {
    fn from(value: VariantOptionModel) -> Self {
        Self {
            id: value.id_,
            name: value.name,
        }
    }
}

#[derive(Serialize)]
pub struct ProductBriefDto {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

// nested field names mirror the store's embedded-join aliases so the
// payload keeps the shape front-end clients already consume
#[derive(Serialize)]
pub struct CartLineVariantDto {
    pub id: u64,
    pub stock: u32,
    pub products: ProductBriefDto,
    pub colors: Option<OptionDto>,
    pub sizes: Option<OptionDto>,
}

#[derive(Serialize)]
pub struct CartLineDetailDto {
    pub id: u64,
    pub qty: u32,
    pub product_variants: CartLineVariantDto,
}

impl From<CartLineDetailModel> for CartLineDetailDto {
    fn from(value: CartLineDetailModel) -> Self {
        Self {
            id: value.line_id,
            qty: value.qty,
            product_variants: CartLineVariantDto {
                id: value.variant_id,
                stock: value.stock,
                products: ProductBriefDto {
                    id: value.product.id_,
                    name: value.product.name,
                    description: value.product.description,
                    price: value.product.price,
                },
                colors: value.color.map(OptionDto::from),
                sizes: value.size.map(OptionDto::from),
            },
        }
    }
}

#[derive(Serialize)]
pub struct CartDetailDataDto {
    pub cart: CartDto,
    pub items: Vec<CartLineDetailDto>,
    pub total: Decimal,
    #[serde(rename = "itemCount")]
    pub item_count: usize,
}

impl From<CartSummaryModel> for CartDetailDataDto {
    fn from(value: CartSummaryModel) -> Self {
        let total = value.total();
        let item_count = value.item_count();
        Self {
            cart: value.cart.into(),
            items: value
                .lines
                .into_iter()
                .map(CartLineDetailDto::from)
                .collect(),
            total,
            item_count,
        }
    }
}

#[derive(Serialize)]
pub struct CartDetailRespDto {
    pub data: CartDetailDataDto,
}

#[derive(Serialize)]
pub struct VariantDto {
    pub id: u64,
    pub stock: u32,
    pub colors: Option<OptionDto>,
    pub sizes: Option<OptionDto>,
}

impl From<ProductVariantModel> for VariantDto {
    fn from(value: ProductVariantModel) -> Self {
        Self {
            id: value.id_,
            stock: value.stock,
            colors: value.color.map(OptionDto::from),
            sizes: value.size.map(OptionDto::from),
        }
    }
}

#[derive(Serialize)]
pub struct ProductDto {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<OptionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garment_types: Option<OptionDto>,
    pub product_variants: Vec<VariantDto>,
}

impl From<ProductModel> for ProductDto {
    fn from(value: ProductModel) -> Self {
        Self {
            id: value.id_,
            name: value.name,
            description: value.description,
            price: value.price,
            available: value.available,
            categories: value.category.map(OptionDto::from),
            garment_types: value.garment_type.map(|g| OptionDto {
                id: g.id_,
                name: g.name,
            }),
            product_variants: value.variants.into_iter().map(VariantDto::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct ProductListRespDto {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: Vec<ProductDto>,
}

#[derive(Serialize)]
pub struct ProductDetailRespDto {
    pub data: ProductDto,
}

#[derive(Serialize)]
pub struct ClientSessionRespDto {
    #[serde(rename = "clientId")]
    pub client_id: u64,
    #[serde(rename = "cartId")]
    pub cart_id: CartIdentifier,
    #[serde(rename = "cartStatus")]
    pub cart_status: String,
}

// ---- user-facing text, operating locale of the deployment -----------------

pub(crate) mod msg {
    use super::CartIdentifier;

    pub(crate) const CART_CREATED: &str = "Carrito creado exitosamente";
    pub(crate) const CART_ID_INVALID: &str = "ID de carrito inválido";
    pub(crate) const CART_OR_ITEM_ID_INVALID: &str = "ID de carrito o item inválido";
    pub(crate) const ITEM_BODY_REQUIRED: &str = "Se requiere product_variant_id y qty (mayor a 0)";
    pub(crate) const QTY_REQUIRED: &str = "Se requiere qty (mayor a 0)";
    pub(crate) const ITEM_ADDED: &str = "Producto agregado al carrito exitosamente";
    pub(crate) const ITEM_MERGED: &str = "Cantidad actualizada en el carrito";
    pub(crate) const ITEM_UPDATED: &str = "Cantidad actualizada exitosamente";
    pub(crate) const ITEM_REMOVED: &str = "Producto eliminado del carrito exitosamente";
    pub(crate) const PRODUCT_ID_INVALID: &str = "ID de producto inválido";
    pub(crate) const PRODUCTS_NONE_FOUND: &str =
        "No se encontraron productos con los filtros especificados.";
    pub(crate) const CLIENT_FIELDS_REQUIRED: &str = "Se requiere nombre y email";
    pub(crate) const CONVERSATION_ID_REQUIRED: &str = "Se requiere conversation_id";
    pub(crate) const HANDOFF_REASON_INVALID: &str =
        "Motivo inválido. Debe ser uno de: reembolso, producto_danado, otros";
    pub(crate) const HANDOFF_DONE: &str = "La conversación ha sido transferida a un agente humano. Un miembro de nuestro equipo te atenderá pronto.";
    pub(crate) const BOT_FLAG_UPDATE_FAILED: &str = "Error al actualizar el estado del bot";

    pub(crate) fn cart_not_found(id_: &CartIdentifier) -> String {
        format!("No se encontró ningún carrito con el ID {}", id_)
    }
    pub(crate) fn variant_not_found(id_: u64) -> String {
        format!("No se encontró ninguna variante con el ID {}", id_)
    }
    pub(crate) fn item_not_found(cart_id: &CartIdentifier, item_id: u64) -> String {
        format!("No se encontró el item {} en el carrito {}", item_id, cart_id)
    }
    pub(crate) fn product_not_found(id_: u64) -> String {
        format!("No se encontró ningún producto con el ID {}", id_)
    }
    pub(crate) fn insufficient_stock(available: u32) -> String {
        format!(
            "Stock insuficiente. Solo hay {} unidades disponibles",
            available
        )
    }
    pub(crate) fn products_found(count: usize) -> String {
        format!("Se encontraron {} producto(s)", count)
    }
} // end of inner-mod msg
