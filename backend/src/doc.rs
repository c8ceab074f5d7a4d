//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every users endpoint, the health checks and the
//! schema wrappers from [`crate::inbound::http::schemas`]. Swagger UI serves
//! it in debug builds and the `openapi-dump` binary prints it for tooling.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    CountResponse, UserRequest, UserResponse, UserSummaryResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User registry API",
        description = "Registration and lookup of users identified by email and CPF."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::count_users,
        crate::inbound::http::users::get_user_by_email,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserRequest,
        UserResponse,
        UserSummaryResponse,
        CountResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "User registration and lookup"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
