// Route exports
pub mod cart;
pub mod legacy;

pub use legacy::AppState;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(legacy::configure)
            .configure(cart::configure),
    );
}
