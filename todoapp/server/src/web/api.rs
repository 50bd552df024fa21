use crate::user::{
    UserState,
    api::v1::{NewUserJson, TodoItemJson, UserJson},
};
use crate::web::api::v1::ErrorResponse;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod v1;

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::user::api::v1::save_user_handler,
        crate::user::api::v1::get_user_handler,
        crate::user::api::v1::get_all_users_handler,
        crate::user::api::v1::delete_user_handler,
        crate::user::api::v1::add_todo_item_handler,
        crate::user::api::v1::delete_todo_item_handler,
        crate::user::api::v1::get_done_todo_items_handler,
        crate::user::api::v1::get_not_done_todo_items_handler,
    ),
    components(schemas(NewUserJson, UserJson, TodoItemJson, ErrorResponse)),
    tags(
        (name = "Users", description = "Create, read and delete users"),
        (name = "Todo items", description = "Manage the to-do items owned by a user")
    )
)]
pub struct ApiDoc;

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(user_state: UserState) -> Router {
    crate::user::api::v1::create_api_router(user_state)
}

/// Creates the Swagger UI routes serving the generated OpenAPI document.
pub fn create_docs_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
