use actix_web::web;

use crate::handlers::{api, dashboard, health};

/// Wires every route the server exposes. All endpoints are read-only
/// GETs over the published snapshot; none of them triggers a refresh.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(dashboard::index)));

    cfg.service(
        web::scope("/api")
            .route("/sizes", web::get().to(api::sizes))
            .route("/last_updated", web::get().to(api::last_updated)),
    );

    cfg.service(web::resource("/health").route(web::get().to(health::health_check)));
}
