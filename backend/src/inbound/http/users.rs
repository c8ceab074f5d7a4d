//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users {"name":"Ana","email":"ana@example.com","nationalId":"123.456.789-09"}
//! GET    /api/v1/users
//! GET    /api/v1/users/count
//! GET    /api/v1/users/email/{email}
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id} {"name":"Ana Maria","nationalId":""}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! Writes go through the registration port. Reads use the query port, which
//! storage adapters serve directly.

use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateUserRequest, UpdateUserRequest, UserDetails, UserSummary,
};
use crate::domain::{Email, Error, NationalId, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Request body for creating or updating a user.
///
/// On create every field is required. On update an absent field is left
/// unchanged and an empty `nationalId` clears the stored value.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[schema(example = "Ana Souza")]
    pub name: Option<String>,
    #[schema(example = "ana@example.com")]
    pub email: Option<String>,
    #[schema(example = "123.456.789-09")]
    pub national_id: Option<String>,
}

impl TryFrom<UserRequest> for CreateUserRequest {
    type Error = Error;

    fn try_from(value: UserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            email: value.email.as_deref().map(Email::new).transpose()?,
            national_id: value.national_id.as_deref().map(NationalId::new).transpose()?,
        })
    }
}

impl TryFrom<UserRequest> for UpdateUserRequest {
    type Error = Error;

    fn try_from(value: UserRequest) -> Result<Self, Self::Error> {
        let national_id = match value.national_id.as_deref() {
            None => None,
            Some(raw) if raw.trim().is_empty() => Some(None),
            Some(raw) => Some(Some(NationalId::new(raw)?)),
        };
        Ok(Self {
            name: value.name,
            email: value.email.as_deref().map(Email::new).transpose()?,
            national_id,
        })
    }
}

/// Full user representation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "12345678909")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "123.456.789-09")]
    pub national_id_formatted: Option<String>,
}

impl TryFrom<&User> for UserResponse {
    type Error = Error;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        let id = user
            .id()
            .ok_or_else(|| Error::internal("stored user has no identifier"))?;
        Ok(Self {
            id: id.get(),
            name: user.name().to_owned(),
            email: user.email_as_str().to_owned(),
            national_id: user.national_id_as_str().map(str::to_owned),
            national_id_formatted: user.national_id().map(NationalId::formatted),
        })
    }
}

impl From<UserDetails> for UserResponse {
    fn from(details: UserDetails) -> Self {
        let national_id_formatted = details.national_id_formatted();
        Self {
            id: details.id.get(),
            name: details.name,
            email: details.email,
            national_id: details.national_id,
            national_id_formatted,
        }
    }
}

/// Row in the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserSummaryResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.get(),
            name: summary.name,
            email: summary.email,
        }
    }
}

/// Body of `GET /api/v1/users/count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CountResponse {
    #[schema(example = 42)]
    pub count: u64,
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let request = CreateUserRequest::try_from(payload.into_inner())?;
    let user = state.registration.create(request).await?;
    let body = UserResponse::try_from(&user)?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/users/{}", body.id)))
        .json(body))
}

/// List every user.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users ordered by identifier", body = [UserSummaryResponse]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserSummaryResponse>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users.into_iter().map(Into::into).collect()))
}

/// Count users.
#[utoipa::path(
    get,
    path = "/api/v1/users/count",
    responses(
        (status = 200, description = "Number of users", body = CountResponse),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "countUsers"
)]
#[get("/users/count")]
pub async fn count_users(state: web::Data<HttpState>) -> ApiResult<web::Json<CountResponse>> {
    let count = state.users.count().await?;
    Ok(web::Json(CountResponse { count }))
}

/// Look a user up by email.
#[utoipa::path(
    get,
    path = "/api/v1/users/email/{email}",
    params(("email" = String, Path, description = "Email address, matched case-insensitively")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "No user with this email", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserByEmail"
)]
#[get("/users/email/{email}")]
pub async fn get_user_by_email(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let email = path.into_inner();
    let details = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| {
            Error::not_found(format!("no user found with email: {email}"))
                .with_details(json!({ "email": email }))
        })?;
    Ok(web::Json(details.into()))
}

/// Fetch a user by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(path.into_inner());
    let details = state.users.find_by_id(id).await?.ok_or_else(|| {
        Error::not_found(format!("no user found with id: {id}")).with_details(json!({ "id": id }))
    })?;
    Ok(web::Json(details.into()))
}

/// Update a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(path.into_inner());
    let request = UpdateUserRequest::try_from(payload.into_inner())?;
    let user = state.registration.update(id, request).await?;
    Ok(web::Json(UserResponse::try_from(&user)?))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User removed"),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .registration
        .remove(UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register every users handler on `cfg`.
///
/// Literal segments are registered before `{id}` so `/users/count` is not
/// parsed as an identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(count_users)
        .service(get_user_by_email)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}
