pub mod health;
pub mod quote;

use actix_web::web;

/// Registers every route; shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api").service(
                web::scope("/quotes")
                    .route("", web::get().to(quote::get_all))
                    .route("", web::post().to(quote::create))
                    .route("/defaults", web::get().to(quote::defaults))
                    .route("/estimate", web::post().to(quote::estimate_quote))
                    .route("/{id}", web::get().to(quote::get_by_id))
                    .route("/{id}", web::put().to(quote::update))
                    .route("/{id}", web::delete().to(quote::delete))
                    .route("/{id}/status", web::patch().to(quote::update_status)),
            ),
        );
}
