use crate::user::{TodoItem, User, UserState};
use crate::web::api::v1::{ApiError, ErrorResponse, ValidatedJson};
use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Request body for creating a user.
///
/// Unknown keys such as `id` or `todoItems` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUserJson {
    /// Login name of the user
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    /// First name of the user
    #[validate(length(min = 1, message = "firstName must not be empty"))]
    pub first_name: String,
    /// Last name of the user
    #[validate(length(min = 1, message = "lastName must not be empty"))]
    pub last_name: String,
    /// Email address of the user
    #[validate(
        length(min = 1, message = "email must not be empty"),
        email(message = "email must be a well-formed email address")
    )]
    pub email: String,
    /// Birthday as an ISO-8601 calendar date
    pub birthday: NaiveDate,
}

impl NewUserJson {
    /// Converts the payload into a new, unpersisted user.
    pub fn into_user(self) -> User {
        User::new(
            self.username,
            self.first_name,
            self.last_name,
            self.email,
            self.birthday,
        )
    }
}

/// JSON representation of a stored User with its to-do items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserJson {
    /// Server assigned identifier
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birthday: NaiveDate,
    /// To-do items owned by the user, in insertion order
    pub todo_items: Vec<TodoItemJson>,
}

impl From<User> for UserJson {
    fn from(user: User) -> Self {
        // Only persisted users reach the API, so the ID is always present.
        let user_id = user.id().unwrap_or_default();
        Self {
            id: user_id,
            username: user.username().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            email: user.email().to_string(),
            birthday: user.birthday(),
            todo_items: user
                .todo_items()
                .iter()
                .cloned()
                .map(|todo_item| TodoItemJson::from_todo_item(user_id, todo_item))
                .collect(),
        }
    }
}

/// JSON representation of a TodoItem for API requests and responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemJson {
    /// Server assigned identifier, ignored on input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(read_only)]
    pub id: Option<i64>,
    /// ID of the user owning the item
    pub user_id: i64,
    /// Short title of the item
    #[validate(length(min = 1, message = "todo must not be empty"))]
    pub todo: String,
    /// Free text description of the item
    #[validate(length(min = 1, message = "info must not be empty"))]
    pub info: String,
    /// Local date-time the item is due, must not be in the past
    #[validate(custom(function = "validate_not_in_past"))]
    pub completion_time: NaiveDateTime,
    /// Whether the item is done
    #[serde(default)]
    pub is_done: bool,
}

impl TodoItemJson {
    /// Builds the JSON shape of an item owned by `user_id`.
    pub fn from_todo_item(user_id: i64, todo_item: TodoItem) -> Self {
        Self {
            id: todo_item.id(),
            user_id,
            todo: todo_item.todo().to_string(),
            info: todo_item.info().to_string(),
            completion_time: todo_item.completion_time(),
            is_done: todo_item.is_done(),
        }
    }

    /// Splits the payload into the owning user's ID and a new, unpersisted item.
    pub fn into_parts(self) -> (i64, TodoItem) {
        (
            self.user_id,
            TodoItem::new(self.todo, self.info, self.completion_time, self.is_done),
        )
    }
}

fn validate_not_in_past(completion_time: &NaiveDateTime) -> Result<(), ValidationError> {
    if *completion_time < Local::now().naive_local() {
        let mut error = ValidationError::new("completion_time_in_past");
        error.message = Some("completionTime must be in the present or in the future".into());
        return Err(error);
    }
    Ok(())
}

/// Query parameters for removing a to-do item from a user.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteTodoItemQuery {
    /// ID of the user owning the item
    pub user_id: i64,
    /// ID of the item to remove
    pub todo_item_id: i64,
}

pub const USERS_PATH: &str = "/v1/todoapp/users";

/// Handler for POST /v1/todoapp/users - Saves a new user.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/v1/todoapp/users",
    request_body = NewUserJson,
    responses(
        (status = 200, description = "User saved"),
        (status = 400, description = "Invalid user payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn save_user_handler(
    State(state): State<UserState>,
    ValidatedJson(payload): ValidatedJson<NewUserJson>,
) -> Result<StatusCode, ApiError> {
    state.user_service().save_user(payload.into_user()).await?;
    Ok(StatusCode::OK)
}

/// Handler for GET /v1/todoapp/users/{userId} - Returns a user with its to-do items.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/v1/todoapp/users/{userId}",
    params(
        ("userId" = i64, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Successfully retrieved user", body = UserJson),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn get_user_handler(
    State(state): State<UserState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserJson>, ApiError> {
    let Path(user_id) = path?;
    let user = state.user_service().get_user(user_id).await?;
    Ok(Json(UserJson::from(user)))
}

/// Handler for GET /v1/todoapp/users - Returns all users.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/v1/todoapp/users",
    responses(
        (status = 200, description = "Successfully retrieved users", body = [UserJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn get_all_users_handler(
    State(state): State<UserState>,
) -> Result<Json<Vec<UserJson>>, ApiError> {
    let users = state.user_service().get_all_users().await?;
    Ok(Json(users.into_iter().map(UserJson::from).collect()))
}

/// Handler for DELETE /v1/todoapp/users/{userId} - Deletes a user and its to-do items.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/v1/todoapp/users/{userId}",
    params(
        ("userId" = i64, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "User deleted, or did not exist"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn delete_user_handler(
    State(state): State<UserState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(user_id) = path?;
    state.user_service().delete_user(user_id).await?;
    Ok(StatusCode::OK)
}

/// Handler for POST /v1/todoapp/users/todoItems - Adds a to-do item to a user.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/v1/todoapp/users/todoItems",
    request_body = TodoItemJson,
    responses(
        (status = 200, description = "To-do item added"),
        (status = 400, description = "Invalid to-do item payload", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn add_todo_item_handler(
    State(state): State<UserState>,
    ValidatedJson(payload): ValidatedJson<TodoItemJson>,
) -> Result<StatusCode, ApiError> {
    let (user_id, todo_item) = payload.into_parts();
    state
        .user_service()
        .add_todo_item_to_user(user_id, todo_item)
        .await?;
    Ok(StatusCode::OK)
}

/// Handler for DELETE /v1/todoapp/users/todoItems - Removes a to-do item from a user.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/v1/todoapp/users/todoItems",
    params(DeleteTodoItemQuery),
    responses(
        (status = 200, description = "To-do item removed, or was not owned by the user"),
        (status = 400, description = "Missing or malformed query parameters"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn delete_todo_item_handler(
    State(state): State<UserState>,
    query: Result<Query<DeleteTodoItemQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query?;
    state
        .user_service()
        .delete_todo_item_from_user(query.user_id, query.todo_item_id)
        .await?;
    Ok(StatusCode::OK)
}

/// Handler for GET /v1/todoapp/users/todoItems/done/{userId} - Returns the done items of a user.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/v1/todoapp/users/todoItems/done/{userId}",
    params(
        ("userId" = i64, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Successfully retrieved done items", body = [TodoItemJson]),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn get_done_todo_items_handler(
    State(state): State<UserState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<TodoItemJson>>, ApiError> {
    let Path(user_id) = path?;
    let todo_items = state
        .user_service()
        .get_done_todo_items_for_user(user_id)
        .await?;
    Ok(Json(to_json(user_id, todo_items)))
}

/// Handler for GET /v1/todoapp/users/todoItems/notDone/{userId} - Returns the not done items of a user.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/v1/todoapp/users/todoItems/notDone/{userId}",
    params(
        ("userId" = i64, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Successfully retrieved not done items", body = [TodoItemJson]),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todo items"
)]
pub async fn get_not_done_todo_items_handler(
    State(state): State<UserState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<TodoItemJson>>, ApiError> {
    let Path(user_id) = path?;
    let todo_items = state
        .user_service()
        .get_not_done_todo_items_for_user(user_id)
        .await?;
    Ok(Json(to_json(user_id, todo_items)))
}

fn to_json(user_id: i64, todo_items: Vec<TodoItem>) -> Vec<TodoItemJson> {
    todo_items
        .into_iter()
        .map(|todo_item| TodoItemJson::from_todo_item(user_id, todo_item))
        .collect()
}

/// Creates and returns the users API router.
pub fn create_api_router(state: UserState) -> Router {
    Router::new()
        .route(
            USERS_PATH,
            get(get_all_users_handler).post(save_user_handler),
        )
        .route(
            "/v1/todoapp/users/{userId}",
            get(get_user_handler).delete(delete_user_handler),
        )
        .route(
            "/v1/todoapp/users/todoItems",
            axum::routing::post(add_todo_item_handler).delete(delete_todo_item_handler),
        )
        .route(
            "/v1/todoapp/users/todoItems/done/{userId}",
            get(get_done_todo_items_handler),
        )
        .route(
            "/v1/todoapp/users/todoItems/notDone/{userId}",
            get(get_not_done_todo_items_handler),
        )
        .with_state(state)
}
