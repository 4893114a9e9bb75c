use axum::Json;
use serde::Serialize;

/// Liveness payload for `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Process liveness. Readiness is service-specific (a database-backed
/// service should ping its connection), so `/readyz` lives with each
/// service's own handlers.
pub async fn healthz() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthz_reports_ok() {
        let Json(health) = healthz().await;
        assert_eq!(
            serde_json::to_value(&health).unwrap(),
            serde_json::json!({ "status": "ok" })
        );
    }
}
