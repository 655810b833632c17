//! User CRUD handlers.
//!
//! ```text
//! GET    /users
//! POST   /users       {"username":"Misha","email":"d@mail.ru","password":"Abcdef12"}
//! GET    /users/{id}
//! PUT    /users/{id}  {"email":"new@mail.ru"}
//! DELETE /users/{id}
//! ```
//!
//! Handlers validate request bodies into domain values and delegate to the
//! user ports. Every failure is returned as a domain
//! [`Error`](crate::domain::Error); the
//! `ProblemResponses` middleware renders it.

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{NewUser, User, UserChanges, UserId, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::problem::ProblemDocument;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /users`.
///
/// `name` is accepted as an alias of `username`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(alias = "name")]
    #[schema(example = "Misha")]
    pub username: String,
    #[schema(example = "d@mail.ru")]
    pub email: String,
    #[schema(example = "Abcdef12")]
    pub password: String,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = UserValidationError;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.username, value.email, value.password)
    }
}

/// Request body for `PUT /users/{id}`. Omitted fields keep their value.
///
/// `name` is accepted as an alias of `username`.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[serde(alias = "name")]
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserChanges {
    type Error = UserValidationError;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.username, value.email, value.password)
    }
}

/// Public representation of a stored user. The password is never included.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Misha")]
    pub username: String,
    #[schema(example = "d@mail.ru")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id().get(),
            username: value.username().to_string(),
            email: value.email().to_string(),
        }
    }
}

/// List every stored user.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Stored users", body = [UserResponse]),
        (status = 500, description = "Storage failure", body = ProblemDocument,
            content_type = "application/problem+json")
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created user", body = UserResponse),
        (status = 400, description = "Username or email already taken", body = ProblemDocument,
            content_type = "application/problem+json"),
        (status = 422, description = "Invalid request parameters", body = ProblemDocument,
            content_type = "application/problem+json")
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let fields = NewUser::try_from(payload.into_inner())?;
    let created = state.users.create_user(fields).await?;
    Ok(web::Json(created.into()))
}

/// Fetch a user by identifier.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "No such user", body = ProblemDocument,
            content_type = "application/problem+json"),
        (status = 422, description = "Identifier is not an integer", body = ProblemDocument,
            content_type = "application/problem+json")
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users_query.find_user(UserId::new(path.into_inner())).await?;
    Ok(web::Json(user.into()))
}

/// Partially update a user.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Username or email already taken", body = ProblemDocument,
            content_type = "application/problem+json"),
        (status = 404, description = "No such user", body = ProblemDocument,
            content_type = "application/problem+json"),
        (status = 422, description = "Invalid request parameters", body = ProblemDocument,
            content_type = "application/problem+json")
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let changes = UserChanges::try_from(payload.into_inner())?;
    let updated = state
        .users
        .update_user(UserId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(updated.into()))
}

/// Delete a user and return the removed record.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deleted user", body = UserResponse),
        (status = 404, description = "No such user", body = ProblemDocument,
            content_type = "application/problem+json"),
        (status = 422, description = "Identifier is not an integer", body = ProblemDocument,
            content_type = "application/problem+json")
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let deleted = state.users.delete_user(UserId::new(path.into_inner())).await?;
    Ok(web::Json(deleted.into()))
}
