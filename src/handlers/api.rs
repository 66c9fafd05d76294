use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::usage::SnapshotStore;

/// Per-tenant sizes in megabytes, straight from the current snapshot.
pub async fn sizes(store: web::Data<SnapshotStore>) -> impl Responder {
    let snapshot = store.current();
    HttpResponse::Ok().json(&snapshot.sizes_mb)
}

/// Timestamp of the last successful refresh.
pub async fn last_updated(store: web::Data<SnapshotStore>) -> impl Responder {
    let snapshot = store.current();
    HttpResponse::Ok().json(json!({ "last_updated": snapshot.last_updated_label() }))
}
