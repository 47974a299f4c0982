use std::boxed::Box;

use crate::api::web::dto::ClientSessionReqDto;
use crate::error::AppError;
use crate::model::{CartIdentifier, CartStatus, ClientModel};
use crate::repository::{AbsCartRepo, AbsClientRepo};

/// The effective "session start" operation. The client row is keyed by
/// email, the single active cart per client is reused or created, every
/// downstream cart mutation is scoped to the cart identifier returned
/// here.
pub struct GetOrCreateClientUseCase {
    pub cl_repo: Box<dyn AbsClientRepo>,
    pub c_repo: Box<dyn AbsCartRepo>,
}

pub enum ClientSessionUcResult {
    Success {
        client_id: u64,
        cart_id: CartIdentifier,
        cart_status: String,
    },
    InvalidRequest,
    ServerError(AppError),
}

impl GetOrCreateClientUseCase {
    pub async fn execute(self, data: ClientSessionReqDto) -> ClientSessionUcResult {
        let name = data.name.as_deref().unwrap_or("").trim();
        let email = data.email.as_deref().unwrap_or("").trim();
        if name.is_empty() || email.is_empty() {
            return ClientSessionUcResult::InvalidRequest;
        }
        if ClientModel::validate_email(email).is_err() {
            return ClientSessionUcResult::InvalidRequest;
        }
        let phone = data
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        let client_id = match self.resolve_client(name, email, phone).await {
            Ok(v) => v,
            Err(e) => return ClientSessionUcResult::ServerError(e),
        };
        let cart = match self.resolve_active_cart(client_id).await {
            Ok(v) => v,
            Err(e) => return ClientSessionUcResult::ServerError(e),
        };
        let cart_status = cart
            .1
            .map(|s| s.as_str().to_string())
            .unwrap_or(crate::constant::CART_STATUS_ACTIVE.to_string());
        ClientSessionUcResult::Success {
            client_id,
            cart_id: cart.0,
            cart_status,
        }
    } // end of fn execute

    async fn resolve_client(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<u64, AppError> {
        match self.cl_repo.fetch_by_email(email).await? {
            Some(saved) => {
                // keep the saved identity, only refresh the phone when a
                // new non-empty value arrived
                if let Some(p) = phone {
                    self.cl_repo.update_phone(saved.id_, p).await?;
                }
                Ok(saved.id_)
            }
            None => {
                let created = self.cl_repo.create(name, email, phone).await?;
                Ok(created.id_)
            }
        }
    }

    async fn resolve_active_cart(
        &self,
        client_id: u64,
    ) -> Result<(CartIdentifier, Option<CartStatus>), AppError> {
        match self.c_repo.fetch_active_by_client(client_id).await? {
            Some(saved) => Ok((saved.id_, saved.status)),
            None => {
                let created = self
                    .c_repo
                    .create(Some(client_id), Some(CartStatus::Active))
                    .await?;
                Ok((created.id_, created.status))
            }
        }
    }
} // end of impl GetOrCreateClientUseCase
