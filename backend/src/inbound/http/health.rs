//! Liveness and readiness checks for orchestrators and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Readiness flag shared between the server and the health endpoints.
///
/// The registry starts not ready; [`HealthState::mark_ready`] is called once
/// storage is connected and the listener is bound. Liveness needs no state:
/// a process that answers the liveness endpoint is alive.
#[derive(Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// Not yet ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn health_response(ok: bool) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness check.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Registry is ready to handle traffic"),
        (status = 503, description = "Registry is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    health_response(state.is_ready())
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Registry is alive")
    )
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    health_response(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    #[rstest]
    #[case(false, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(true, "/health/ready", StatusCode::OK)]
    #[case(false, "/health/live", StatusCode::OK)]
    #[case(true, "/health/live", StatusCode::OK)]
    #[actix_web::test]
    async fn health_endpoints_reflect_state(
        #[case] ready_flag: bool,
        #[case] path: &str,
        #[case] expected: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        if ready_flag {
            state.mark_ready();
        }
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(res.status(), expected);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }
}
