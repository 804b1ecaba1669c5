use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

/// Liveness probe. Always 200; database reachability is reported separately.
pub async fn backend_health_check(pool: web::Data<PgPool>) -> HttpResponse {
    let database_up = sqlx::query("SELECT 1").execute(pool.get_ref()).await.is_ok();
    if !database_up {
        tracing::warn!("Health check could not reach the database");
    }
    HttpResponse::Ok().json(json!({
        "status": "UP",
        "database": if database_up { "UP" } else { "DOWN" }
    }))
}
