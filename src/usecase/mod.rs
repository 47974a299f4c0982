mod browse_products;
mod client_session;
mod handoff;
mod manage_cart;

pub use browse_products::{
    ListProductsUcResult, ListProductsUseCase, ProductDetailUcResult, ProductDetailUseCase,
};
pub use client_session::{ClientSessionUcResult, GetOrCreateClientUseCase};
pub use handoff::{HandoffReason, RequestHumanAgentUseCase, RequestHumanUcResult};
pub use manage_cart::{
    AddCartItemUcResult, AddCartItemUseCase, CreateCartUcResult, CreateCartUseCase,
    RemoveCartItemUcResult, RemoveCartItemUseCase, RetrieveCartUcResult, RetrieveCartUseCase,
    UpdateCartItemUcResult, UpdateCartItemUseCase,
};
