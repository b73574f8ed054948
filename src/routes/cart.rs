use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Cart, CartError};
use crate::models::{
    AddCartItemRequest, CartResponse, ErrorResponse, RemoveCartItemRequest, UpdateCartItemRequest,
};
use crate::routes::legacy::AppState;
use crate::services::CartStoreError;

/// Configure shop cart routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/cart/{cart_id}", web::get().to(get_cart))
        .route("/cart/{cart_id}", web::delete().to(clear_cart))
        .route("/cart/{cart_id}/items", web::post().to(add_item))
        .route("/cart/{cart_id}/items", web::put().to(update_item))
        .route("/cart/{cart_id}/items", web::delete().to(remove_item));
}

fn store_failed(cart_id: &str, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("Cart store failure for {}: {}", cart_id, err);
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "Cart store failure",
        err.to_string(),
        500,
    ))
}

fn cart_rejected(err: CartError) -> HttpResponse {
    let body = |status: u16| ErrorResponse::new("Invalid cart operation", err.to_string(), status);
    match &err {
        CartError::UnknownLine(_) => HttpResponse::NotFound().json(body(404)),
        CartError::ZeroQuantity | CartError::QuantityOverflow(_) => {
            HttpResponse::BadRequest().json(body(400))
        }
    }
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "Validation failed",
        errors.to_string(),
        400,
    ))
}

/// Apply `change` to a cart atomically and flush the store
///
/// Runs on the blocking pool since a file-backed store writes its snapshot.
async fn modify_cart<F>(state: &AppState, cart_id: String, change: F) -> HttpResponse
where
    F: FnOnce(&mut Cart) -> Result<(), CartError> + Send + 'static,
{
    let carts = state.carts.clone();
    let id = cart_id.clone();

    let outcome = web::block(move || {
        let cart = carts.update(&id, Box::new(change))?;
        carts.flush()?;
        Ok::<_, CartStoreError>(cart)
    })
    .await;

    match outcome {
        Ok(Ok(cart)) => HttpResponse::Ok().json(CartResponse::new(cart_id, cart)),
        Ok(Err(CartStoreError::Rejected(e))) => {
            tracing::info!("Rejected cart change for {}: {}", cart_id, e);
            cart_rejected(e)
        }
        Ok(Err(e)) => store_failed(&cart_id, e),
        Err(e) => store_failed(&cart_id, e),
    }
}

/// GET /api/v1/cart/{cart_id}
async fn get_cart(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let cart_id = path.into_inner();
    match state.carts.load(&cart_id) {
        Ok(cart) => HttpResponse::Ok().json(CartResponse::new(cart_id, cart)),
        Err(e) => store_failed(&cart_id, e),
    }
}

/// POST /api/v1/cart/{cart_id}/items
///
/// Lines with the same product and size merge by summing quantities.
async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<AddCartItemRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let item = req.into_inner().into_item();
    modify_cart(&state, path.into_inner(), move |cart: &mut Cart| cart.add(item)).await
}

/// PUT /api/v1/cart/{cart_id}/items
///
/// A quantity of zero removes the line.
async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateCartItemRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let key = req.key();
    let quantity = req.quantity;
    modify_cart(&state, path.into_inner(), move |cart: &mut Cart| {
        cart.set_quantity(&key, quantity)
    })
    .await
}

/// DELETE /api/v1/cart/{cart_id}/items
async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<RemoveCartItemRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let key = req.into_inner().into_key();
    modify_cart(&state, path.into_inner(), move |cart: &mut Cart| {
        if cart.remove(&key) {
            Ok(())
        } else {
            Err(CartError::UnknownLine(key))
        }
    })
    .await
}

/// DELETE /api/v1/cart/{cart_id}
async fn clear_cart(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    modify_cart(&state, path.into_inner(), |cart: &mut Cart| {
        cart.clear();
        Ok(())
    })
    .await
}
