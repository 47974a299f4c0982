use std::boxed::Box;
use std::sync::Arc;

use crate::api::web::dto::{CartItemQtyDto, CartItemReqDto};
use crate::error::AppError;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{
    CartIdentifier, CartLineModel, CartLineReconcile, CartModel, CartQtyRejection,
    CartSummaryModel, VariantPurchaseModel,
};
use crate::repository::{AbsCartRepo, AbsProductRepo};
use crate::thirdparty::AbstractChatRelay;

pub struct CreateCartUseCase {
    pub repo: Box<dyn AbsCartRepo>,
}

pub struct AddCartItemUseCase {
    pub c_repo: Box<dyn AbsCartRepo>,
    pub p_repo: Box<dyn AbsProductRepo>,
    pub chat_relay: Option<Arc<Box<dyn AbstractChatRelay>>>,
    pub log_ctx: Arc<AppLogContext>,
}

pub struct RetrieveCartUseCase {
    pub repo: Box<dyn AbsCartRepo>,
}

pub struct UpdateCartItemUseCase {
    pub c_repo: Box<dyn AbsCartRepo>,
    pub p_repo: Box<dyn AbsProductRepo>,
}

pub struct RemoveCartItemUseCase {
    pub repo: Box<dyn AbsCartRepo>,
}

pub enum CreateCartUcResult {
    Success(CartModel),
    ServerError(AppError),
}

pub enum AddCartItemUcResult {
    Created(CartLineModel),
    Updated(CartLineModel),
    CartNotFound(CartIdentifier),
    VariantNotFound(u64),
    InvalidRequest,
    InsufficientStock { available: u32 },
    ServerError(AppError),
}

pub enum RetrieveCartUcResult {
    Success(CartSummaryModel),
    NotFound(CartIdentifier),
    ServerError(AppError),
}

pub enum UpdateCartItemUcResult {
    Success(CartLineModel),
    NotFound,
    InvalidRequest,
    InsufficientStock { available: u32 },
    ServerError(AppError),
}

pub enum RemoveCartItemUcResult {
    Success,
    NotFound,
    ServerError(AppError),
}

fn accept_qty(raw: Option<i64>) -> Option<u32> {
    match raw {
        Some(q) if q > 0 && q <= (u32::MAX as i64) => Some(q as u32),
        _others => None,
    }
}

impl CreateCartUseCase {
    pub async fn execute(self) -> CreateCartUcResult {
        match self.repo.create(None, None).await {
            Ok(m) => CreateCartUcResult::Success(m),
            Err(e) => CreateCartUcResult::ServerError(e),
        }
    }
}

impl AddCartItemUseCase {
    pub async fn execute(self, cart_id: CartIdentifier, data: CartItemReqDto) -> AddCartItemUcResult {
        let cart_found = match self.c_repo.fetch(&cart_id).await {
            Ok(v) => v,
            Err(e) => return AddCartItemUcResult::ServerError(e),
        };
        if cart_found.is_none() {
            return AddCartItemUcResult::CartNotFound(cart_id);
        }
        let (variant_id, qty) = match (data.product_variant_id, accept_qty(data.qty)) {
            (Some(v), Some(q)) => (v, q),
            _others => return AddCartItemUcResult::InvalidRequest,
        };
        let purchase = match self.p_repo.fetch_variant(variant_id).await {
            Ok(Some(v)) => v,
            Ok(None) => return AddCartItemUcResult::VariantNotFound(variant_id),
            Err(e) => return AddCartItemUcResult::ServerError(e),
        };
        // stock gate before looking at the saved lines, a single oversized
        // request never reaches the merge decision
        if purchase.stock < qty {
            return AddCartItemUcResult::InsufficientStock {
                available: purchase.stock,
            };
        }
        let existing = match self.c_repo.fetch_line_by_variant(&cart_id, variant_id).await {
            Ok(v) => v,
            Err(e) => return AddCartItemUcResult::ServerError(e),
        };
        let decision = CartLineReconcile::decide(existing.as_ref(), purchase.stock, qty);
        let out = match decision {
            Ok(CartLineReconcile::Insert { qty }) => {
                match self.c_repo.insert_line(&cart_id, variant_id, qty).await {
                    Ok(line) => {
                        self.notify_garment_label(&purchase, data.conversation_id);
                        AddCartItemUcResult::Created(line)
                    }
                    Err(e) => AddCartItemUcResult::ServerError(e),
                }
            }
            Ok(CartLineReconcile::Merge { line_id, qty_total }) => {
                match self.c_repo.update_line_qty(&cart_id, line_id, qty_total).await {
                    Ok(line) => {
                        self.notify_garment_label(&purchase, data.conversation_id);
                        AddCartItemUcResult::Updated(line)
                    }
                    Err(e) => AddCartItemUcResult::ServerError(e),
                }
            }
            Err(CartQtyRejection::ZeroQuantity) => AddCartItemUcResult::InvalidRequest,
            Err(CartQtyRejection::InsufficientStock { available }) => {
                AddCartItemUcResult::InsufficientStock { available }
            }
        };
        out
    } // end of fn execute

    // fire-and-forget, the cart mutation already committed and a relay
    // glitch must never surface to the customer
    fn notify_garment_label(&self, purchase: &VariantPurchaseModel, conversation_id: Option<u64>) {
        let relay = match self.chat_relay.as_ref() {
            Some(r) => r.clone(),
            None => return,
        };
        let conv_id = match conversation_id {
            Some(c) => c,
            None => return,
        };
        let label = match purchase
            .garment_type
            .as_ref()
            .and_then(|g| g.conversation_label())
        {
            Some(l) => l,
            None => return,
        };
        let logctx = self.log_ctx.clone();
        let _handle = tokio::task::spawn(async move {
            if let Err(e) = relay.add_labels(conv_id, &[label]).await {
                app_log_event!(logctx, AppLogLevel::WARNING, "conversation-label, {:?}", e);
            }
        });
    } // end of fn notify_garment_label
} // end of impl AddCartItemUseCase

impl RetrieveCartUseCase {
    pub async fn execute(self, cart_id: CartIdentifier) -> RetrieveCartUcResult {
        let cart = match self.repo.fetch(&cart_id).await {
            Ok(Some(c)) => c,
            Ok(None) => return RetrieveCartUcResult::NotFound(cart_id),
            Err(e) => return RetrieveCartUcResult::ServerError(e),
        };
        match self.repo.fetch_detail(&cart_id).await {
            Ok(lines) => RetrieveCartUcResult::Success(CartSummaryModel { cart, lines }),
            Err(e) => RetrieveCartUcResult::ServerError(e),
        }
    }
}

impl UpdateCartItemUseCase {
    pub async fn execute(
        self,
        cart_id: CartIdentifier,
        line_id: u64,
        data: CartItemQtyDto,
    ) -> UpdateCartItemUcResult {
        let qty = match accept_qty(data.qty) {
            Some(q) => q,
            None => return UpdateCartItemUcResult::InvalidRequest,
        };
        let line = match self.c_repo.fetch_line(&cart_id, line_id).await {
            Ok(Some(l)) => l,
            Ok(None) => return UpdateCartItemUcResult::NotFound,
            Err(e) => return UpdateCartItemUcResult::ServerError(e),
        };
        let purchase = match self.p_repo.fetch_variant(line.variant_id).await {
            Ok(Some(v)) => v,
            // the saved line points at a variant the store no longer has,
            // treat the row the same as an absent one
            Ok(None) => return UpdateCartItemUcResult::NotFound,
            Err(e) => return UpdateCartItemUcResult::ServerError(e),
        };
        match CartLineReconcile::replace(purchase.stock, qty) {
            Ok(accepted) => match self.c_repo.update_line_qty(&cart_id, line_id, accepted).await {
                Ok(updated) => UpdateCartItemUcResult::Success(updated),
                Err(e) => UpdateCartItemUcResult::ServerError(e),
            },
            Err(CartQtyRejection::ZeroQuantity) => UpdateCartItemUcResult::InvalidRequest,
            Err(CartQtyRejection::InsufficientStock { available }) => {
                UpdateCartItemUcResult::InsufficientStock { available }
            }
        }
    } // end of fn execute
} // end of impl UpdateCartItemUseCase

impl RemoveCartItemUseCase {
    pub async fn execute(self, cart_id: CartIdentifier, line_id: u64) -> RemoveCartItemUcResult {
        let found = match self.repo.fetch_line(&cart_id, line_id).await {
            Ok(v) => v,
            Err(e) => return RemoveCartItemUcResult::ServerError(e),
        };
        if found.is_none() {
            return RemoveCartItemUcResult::NotFound;
        }
        match self.repo.delete_line(&cart_id, line_id).await {
            Ok(_v) => RemoveCartItemUcResult::Success,
            Err(e) => {
                if e.code == crate::error::AppErrorCode::CartItemNotExist {
                    RemoveCartItemUcResult::NotFound
                } else {
                    RemoveCartItemUcResult::ServerError(e)
                }
            }
        }
    }
}
