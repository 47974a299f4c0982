use serde::Deserialize;
use serde_json::Value as JsnVal;

use crate::api::web::dto::{
    msg, CartDetailDataDto, CartItemDto, CartItemQtyDto, CartItemReqDto, ClientSessionReqDto,
    ProductDto,
};
use crate::model::{CartIdentifier, ProductSearchFilter};
use crate::repository::{app_repo_cart, app_repo_client, app_repo_product};
use crate::thirdparty::ConversationStatus;
use crate::usecase::{
    AddCartItemUcResult, AddCartItemUseCase, ClientSessionUcResult, CreateCartUcResult,
    CreateCartUseCase, GetOrCreateClientUseCase, HandoffReason, ListProductsUcResult,
    ListProductsUseCase, ProductDetailUcResult, ProductDetailUseCase, RemoveCartItemUcResult,
    RemoveCartItemUseCase, RequestHumanAgentUseCase, RequestHumanUcResult, RetrieveCartUcResult,
    RetrieveCartUseCase, UpdateCartItemUcResult, UpdateCartItemUseCase,
};
use crate::AppSharedState;

const RELAY_NOT_CONFIGURED: &str = "integración de chat no configurada";

// every tool answers plain text, failures carry the same localized
// message the REST surface would return, prefixed the way the original
// agent promptings expect
fn err_text(detail: impl std::fmt::Display) -> (String, bool) {
    (format!("Error: {}", detail), true)
}

fn ok_text(text: String) -> (String, bool) {
    (text, false)
}

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or("null".to_string())
}

pub(super) fn descriptors() -> JsnVal {
    serde_json::json!([
        {
            "name": "list_products",
            "description": "Lista los productos disponibles, con filtros opcionales por nombre y descripción (búsqueda parcial)",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Filtro por nombre del producto (búsqueda parcial)" },
                    "description": { "type": "string", "description": "Filtro por descripción del producto (búsqueda parcial)" }
                }
            }
        },
        {
            "name": "get_product_details",
            "description": "Obtiene los detalles de un producto específico por ID",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "productId": { "type": "number", "description": "ID del producto a consultar" }
                },
                "required": ["productId"]
            }
        },
        {
            "name": "create_cart",
            "description": "Crea un nuevo carrito vacío",
            "inputSchema": { "type": "object", "properties": {} }
        },
        {
            "name": "add_to_cart",
            "description": "Agrega una variante de producto al carrito, validando el stock disponible",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "cartId": { "description": "ID del carrito (puede ser número o UUID)" },
                    "productVariantId": { "type": "number", "description": "ID de la variante del producto (incluye color y talla)" },
                    "qty": { "type": "number", "minimum": 1, "description": "Cantidad del producto" },
                    "conversationId": { "type": "number", "description": "ID de la conversación de Chatwoot a etiquetar (opcional)" }
                },
                "required": ["cartId", "productVariantId", "qty"]
            }
        },
        {
            "name": "get_cart",
            "description": "Obtiene el carrito completo con todos sus items, total y cantidad de items",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "cartId": { "description": "ID del carrito a consultar (puede ser número o UUID)" }
                },
                "required": ["cartId"]
            }
        },
        {
            "name": "update_cart_item",
            "description": "Actualiza la cantidad de un item en el carrito",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "cartId": { "description": "ID del carrito (puede ser número o UUID)" },
                    "itemId": { "type": "number", "description": "ID del item a actualizar" },
                    "qty": { "type": "number", "minimum": 1, "description": "Nueva cantidad del producto" }
                },
                "required": ["cartId", "itemId", "qty"]
            }
        },
        {
            "name": "remove_from_cart",
            "description": "Elimina un producto del carrito",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "cartId": { "description": "ID del carrito (puede ser número o UUID)" },
                    "itemId": { "type": "number", "description": "ID del item a eliminar" }
                },
                "required": ["cartId", "itemId"]
            }
        },
        {
            "name": "get_or_create_client",
            "description": "Obtiene o crea un cliente por email y su carrito activo",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Nombre del cliente" },
                    "email": { "type": "string", "description": "Email del cliente (debe ser válido y único)" },
                    "phone": { "type": "string", "description": "Teléfono del cliente (opcional)" }
                },
                "required": ["name", "email"]
            }
        },
        {
            "name": "request_human_agent",
            "description": "Transfiere la conversación a un agente humano. Motivos: 'reembolso' para solicitudes de devolución de dinero, 'producto_danado' si el producto llegó dañado o defectuoso, 'otros' para cualquier otro motivo",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "conversationId": { "type": "number", "description": "ID de la conversación de Chatwoot" },
                    "reason": { "type": "string", "enum": ["reembolso", "producto_danado", "otros"], "description": "Motivo por el cual el cliente solicita hablar con un humano" }
                },
                "required": ["conversationId"]
            }
        },
        {
            "name": "send_chatwoot_message",
            "description": "Envía un mensaje a una conversación de Chatwoot",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "conversationId": { "type": "number", "description": "ID de la conversación de Chatwoot" },
                    "message": { "type": "string", "description": "Contenido del mensaje a enviar al cliente" }
                },
                "required": ["conversationId", "message"]
            }
        },
        {
            "name": "add_conversation_labels",
            "description": "Agrega etiquetas a una conversación de Chatwoot",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "conversationId": { "type": "number", "description": "ID de la conversación de Chatwoot" },
                    "labels": { "type": "array", "items": { "type": "string" }, "description": "Etiquetas a agregar (ej: [\"venta_completada\", \"producto_camisa\"])" }
                },
                "required": ["conversationId", "labels"]
            }
        },
        {
            "name": "update_conversation_status",
            "description": "Actualiza el estado de una conversación de Chatwoot",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "conversationId": { "type": "number", "description": "ID de la conversación de Chatwoot" },
                    "status": { "type": "string", "enum": ["open", "resolved", "pending"], "description": "Estado de la conversación" }
                },
                "required": ["conversationId", "status"]
            }
        }
    ])
} // end of fn descriptors

#[derive(Deserialize)]
struct ListProductsArgs {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct ProductDetailArgs {
    #[serde(rename = "productId")]
    product_id: u64,
}

#[derive(Deserialize)]
struct AddToCartArgs {
    #[serde(rename = "cartId")]
    cart_id: CartIdentifier,
    #[serde(rename = "productVariantId")]
    product_variant_id: u64,
    qty: i64,
    #[serde(default, rename = "conversationId")]
    conversation_id: Option<u64>,
}

#[derive(Deserialize)]
struct GetCartArgs {
    #[serde(rename = "cartId")]
    cart_id: CartIdentifier,
}

#[derive(Deserialize)]
struct UpdateCartItemArgs {
    #[serde(rename = "cartId")]
    cart_id: CartIdentifier,
    #[serde(rename = "itemId")]
    item_id: u64,
    qty: i64,
}

#[derive(Deserialize)]
struct RemoveFromCartArgs {
    #[serde(rename = "cartId")]
    cart_id: CartIdentifier,
    #[serde(rename = "itemId")]
    item_id: u64,
}

#[derive(Deserialize)]
struct ClientArgs {
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Deserialize)]
struct RequestHumanArgs {
    #[serde(rename = "conversationId")]
    conversation_id: u64,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct SendMessageArgs {
    #[serde(rename = "conversationId")]
    conversation_id: u64,
    message: String,
}

#[derive(Deserialize)]
struct AddLabelsArgs {
    #[serde(rename = "conversationId")]
    conversation_id: u64,
    labels: Vec<String>,
}

#[derive(Deserialize)]
struct UpdateStatusArgs {
    #[serde(rename = "conversationId")]
    conversation_id: u64,
    status: ConversationStatus,
}

fn bad_args(e: serde_json::Error) -> (String, bool) {
    err_text(format!("argumentos inválidos, {}", e))
}

pub(super) async fn invoke(name: &str, args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    match name {
        "list_products" => list_products(args, shr_state).await,
        "get_product_details" => get_product_details(args, shr_state).await,
        "create_cart" => create_cart(shr_state).await,
        "add_to_cart" => add_to_cart(args, shr_state).await,
        "get_cart" => get_cart(args, shr_state).await,
        "update_cart_item" => update_cart_item(args, shr_state).await,
        "remove_from_cart" => remove_from_cart(args, shr_state).await,
        "get_or_create_client" => get_or_create_client(args, shr_state).await,
        "request_human_agent" => request_human_agent(args, shr_state).await,
        "send_chatwoot_message" => send_chatwoot_message(args, shr_state).await,
        "add_conversation_labels" => add_conversation_labels(args, shr_state).await,
        "update_conversation_status" => update_conversation_status(args, shr_state).await,
        _others => err_text(format!("herramienta desconocida: {}", name)),
    }
}

async fn list_products(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<ListProductsArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let repo = match app_repo_product(shr_state.datastore()).await {
        Ok(v) => v,
        Err(e) => return err_text(e),
    };
    let uc = ListProductsUseCase { repo };
    let filt = ProductSearchFilter {
        name: args.name,
        description: args.description,
    };
    match uc.execute(filt).await {
        ListProductsUcResult::Success(found) => {
            let message = if found.is_empty() {
                msg::PRODUCTS_NONE_FOUND.to_string()
            } else {
                msg::products_found(found.len())
            };
            let data = found.into_iter().map(ProductDto::from).collect::<Vec<_>>();
            ok_text(format!("{}\n\n{}", message, pretty(&data)))
        }
        ListProductsUcResult::ServerError(e) => err_text(e),
    }
}

async fn get_product_details(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<ProductDetailArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let repo = match app_repo_product(shr_state.datastore()).await {
        Ok(v) => v,
        Err(e) => return err_text(e),
    };
    let uc = ProductDetailUseCase { repo };
    match uc.execute(args.product_id).await {
        ProductDetailUcResult::Success(m) => {
            let data = ProductDto::from(m);
            ok_text(format!("Detalles del producto:\n\n{}", pretty(&data)))
        }
        ProductDetailUcResult::NotFound(id_) => err_text(msg::product_not_found(id_)),
        ProductDetailUcResult::ServerError(e) => err_text(e),
    }
}

async fn create_cart(shr_state: AppSharedState) -> (String, bool) {
    let repo = match app_repo_cart(shr_state.datastore()).await {
        Ok(v) => v,
        Err(e) => return err_text(e),
    };
    let uc = CreateCartUseCase { repo };
    match uc.execute().await {
        CreateCartUcResult::Success(m) => ok_text(format!(
            "{}\n\nID del carrito: {}\nCreado: {}",
            msg::CART_CREATED,
            m.id_,
            m.created_at.to_rfc3339()
        )),
        CreateCartUcResult::ServerError(e) => err_text(e),
    }
}

async fn add_to_cart(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<AddToCartArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let (c_repo, p_repo) = match (
        app_repo_cart(shr_state.datastore()).await,
        app_repo_product(shr_state.datastore()).await,
    ) {
        (Ok(c), Ok(p)) => (c, p),
        (Err(e), _) | (_, Err(e)) => return err_text(e),
    };
    let uc = AddCartItemUseCase {
        c_repo,
        p_repo,
        chat_relay: shr_state.chat_relay(),
        log_ctx: shr_state.log_context().clone(),
    };
    let data = CartItemReqDto {
        product_variant_id: Some(args.product_variant_id),
        qty: Some(args.qty),
        conversation_id: args.conversation_id,
    };
    match uc.execute(args.cart_id, data).await {
        AddCartItemUcResult::Created(line) => {
            let data = CartItemDto::from(line);
            ok_text(format!("{}\n\n{}", msg::ITEM_ADDED, pretty(&data)))
        }
        AddCartItemUcResult::Updated(line) => {
            let data = CartItemDto::from(line);
            ok_text(format!("{}\n\n{}", msg::ITEM_MERGED, pretty(&data)))
        }
        AddCartItemUcResult::CartNotFound(id_) => err_text(msg::cart_not_found(&id_)),
        AddCartItemUcResult::VariantNotFound(id_) => err_text(msg::variant_not_found(id_)),
        AddCartItemUcResult::InvalidRequest => err_text(msg::ITEM_BODY_REQUIRED),
        AddCartItemUcResult::InsufficientStock { available } => {
            err_text(msg::insufficient_stock(available))
        }
        AddCartItemUcResult::ServerError(e) => err_text(e),
    }
}

async fn get_cart(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<GetCartArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let repo = match app_repo_cart(shr_state.datastore()).await {
        Ok(v) => v,
        Err(e) => return err_text(e),
    };
    let uc = RetrieveCartUseCase { repo };
    let cart_id = args.cart_id.clone();
    match uc.execute(args.cart_id).await {
        RetrieveCartUcResult::Success(summary) => {
            let data = CartDetailDataDto::from(summary);
            ok_text(format!(
                "Carrito #{}\n\nTotal de items: {}\nTotal: ${}\n\nProductos:\n{}",
                cart_id,
                data.item_count,
                data.total,
                pretty(&data.items)
            ))
        }
        RetrieveCartUcResult::NotFound(id_) => err_text(msg::cart_not_found(&id_)),
        RetrieveCartUcResult::ServerError(e) => err_text(e),
    }
}

async fn update_cart_item(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<UpdateCartItemArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let (c_repo, p_repo) = match (
        app_repo_cart(shr_state.datastore()).await,
        app_repo_product(shr_state.datastore()).await,
    ) {
        (Ok(c), Ok(p)) => (c, p),
        (Err(e), _) | (_, Err(e)) => return err_text(e),
    };
    let uc = UpdateCartItemUseCase { c_repo, p_repo };
    let cart_id = args.cart_id.clone();
    let data = CartItemQtyDto {
        qty: Some(args.qty),
    };
    match uc.execute(args.cart_id, args.item_id, data).await {
        UpdateCartItemUcResult::Success(line) => {
            let data = CartItemDto::from(line);
            ok_text(format!("{}\n\n{}", msg::ITEM_UPDATED, pretty(&data)))
        }
        UpdateCartItemUcResult::InvalidRequest => err_text(msg::QTY_REQUIRED),
        UpdateCartItemUcResult::NotFound => err_text(msg::item_not_found(&cart_id, args.item_id)),
        UpdateCartItemUcResult::InsufficientStock { available } => {
            err_text(msg::insufficient_stock(available))
        }
        UpdateCartItemUcResult::ServerError(e) => err_text(e),
    }
}

async fn remove_from_cart(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<RemoveFromCartArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let repo = match app_repo_cart(shr_state.datastore()).await {
        Ok(v) => v,
        Err(e) => return err_text(e),
    };
    let uc = RemoveCartItemUseCase { repo };
    let cart_id = args.cart_id.clone();
    match uc.execute(args.cart_id, args.item_id).await {
        RemoveCartItemUcResult::Success => ok_text(msg::ITEM_REMOVED.to_string()),
        RemoveCartItemUcResult::NotFound => err_text(msg::item_not_found(&cart_id, args.item_id)),
        RemoveCartItemUcResult::ServerError(e) => err_text(e),
    }
}

async fn get_or_create_client(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<ClientArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let (cl_repo, c_repo) = match (
        app_repo_client(shr_state.datastore()).await,
        app_repo_cart(shr_state.datastore()).await,
    ) {
        (Ok(cl), Ok(c)) => (cl, c),
        (Err(e), _) | (_, Err(e)) => return err_text(e),
    };
    let uc = GetOrCreateClientUseCase { cl_repo, c_repo };
    let data = ClientSessionReqDto {
        name: Some(args.name),
        email: Some(args.email),
        phone: args.phone,
    };
    match uc.execute(data).await {
        ClientSessionUcResult::Success {
            client_id,
            cart_id,
            cart_status,
        } => ok_text(format!(
            "Cliente procesado exitosamente:\n\nID del cliente: {}\nID del carrito: {}\nEstado del carrito: {}",
            client_id, cart_id, cart_status
        )),
        ClientSessionUcResult::InvalidRequest => err_text(msg::CLIENT_FIELDS_REQUIRED),
        ClientSessionUcResult::ServerError(e) => err_text(e),
    }
}

async fn request_human_agent(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<RequestHumanArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let reason = match args.reason.as_deref() {
        Some(raw) => match HandoffReason::try_parse(raw) {
            Some(r) => Some(r),
            None => return err_text(msg::HANDOFF_REASON_INVALID),
        },
        None => None,
    };
    let uc = RequestHumanAgentUseCase {
        chat_relay: shr_state.chat_relay(),
        log_ctx: shr_state.log_context().clone(),
    };
    match uc.execute(args.conversation_id, reason).await {
        RequestHumanUcResult::Success => ok_text(msg::HANDOFF_DONE.to_string()),
        RequestHumanUcResult::RelayFailure(_e) => err_text(msg::BOT_FLAG_UPDATE_FAILED),
    }
}

async fn send_chatwoot_message(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<SendMessageArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let relay = match shr_state.chat_relay() {
        Some(r) => r,
        None => return err_text(RELAY_NOT_CONFIGURED),
    };
    match relay
        .send_message(args.conversation_id, args.message.as_str())
        .await
    {
        Ok(_v) => ok_text(format!(
            "Mensaje enviado exitosamente a la conversación #{}",
            args.conversation_id
        )),
        Err(e) => err_text(e),
    }
}

async fn add_conversation_labels(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<AddLabelsArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    if args.labels.len() > crate::constant::hard_limit::MAX_NUM_CONVERSATION_LABELS {
        return err_text("demasiadas etiquetas en una sola llamada");
    }
    let relay = match shr_state.chat_relay() {
        Some(r) => r,
        None => return err_text(RELAY_NOT_CONFIGURED),
    };
    match relay.add_labels(args.conversation_id, &args.labels).await {
        Ok(_v) => ok_text(format!(
            "Etiquetas agregadas exitosamente: {}",
            args.labels.join(", ")
        )),
        Err(e) => err_text(e),
    }
}

async fn update_conversation_status(args: JsnVal, shr_state: AppSharedState) -> (String, bool) {
    let args = match serde_json::from_value::<UpdateStatusArgs>(args) {
        Ok(v) => v,
        Err(e) => return bad_args(e),
    };
    let relay = match shr_state.chat_relay() {
        Some(r) => r,
        None => return err_text(RELAY_NOT_CONFIGURED),
    };
    match relay.update_status(args.conversation_id, args.status).await {
        Ok(_v) => ok_text(format!(
            "Estado de conversación actualizado a: {}",
            args.status.as_str()
        )),
        Err(e) => err_text(e),
    }
}
