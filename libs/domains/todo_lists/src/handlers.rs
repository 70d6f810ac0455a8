use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadGatewayResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use validator::Validate;

use crate::error::TodoListResult;
use crate::models::{
    Credentials, NameExists, NameQuery, TodoItem, TodoListId, TodoListView, UpdateTodoItems,
};
use crate::repository::TodoListRepository;
use crate::store::VectorStore;

const TAG: &str = "todo-lists";

/// OpenAPI documentation for Todo Lists API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_todo_list,
        find_todo_list,
        todo_list_name_exists,
        get_todo_list,
        update_todo_items,
    ),
    components(
        schemas(Credentials, TodoItem, TodoListId, TodoListView, UpdateTodoItems, NameExists),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            BadGatewayResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Password-protected shared todo lists")
    )
)]
pub struct ApiDoc;

/// Create the todo list router with all HTTP endpoints
pub fn router<S: VectorStore + 'static>(repository: TodoListRepository<S>) -> Router {
    let shared_repository = Arc::new(repository);

    Router::new()
        .route("/", post(create_todo_list))
        .route("/find", post(find_todo_list))
        .route("/exists", get(todo_list_name_exists))
        .route("/{id}", get(get_todo_list))
        .route("/{id}/items", put(update_todo_items))
        .with_state(shared_repository)
}

/// Create a new, empty todo list
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = Credentials,
    responses(
        (status = 201, description = "Todo list created", body = TodoListId),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_todo_list<S: VectorStore + 'static>(
    State(repository): State<Arc<TodoListRepository<S>>>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> TodoListResult<impl IntoResponse> {
    let id = repository.create_todo_list(&credentials).await?;
    Ok((StatusCode::CREATED, Json(TodoListId { id })))
}

/// Look up a todo list by name and password
#[utoipa::path(
    post,
    path = "/find",
    tag = TAG,
    request_body = Credentials,
    responses(
        (status = 200, description = "Todo list found", body = TodoListId),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn find_todo_list<S: VectorStore + 'static>(
    State(repository): State<Arc<TodoListRepository<S>>>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> TodoListResult<Json<TodoListId>> {
    let id = repository.find_todo_list(&credentials).await?;
    Ok(Json(TodoListId { id }))
}

/// Check whether a list name is already taken
#[utoipa::path(
    get,
    path = "/exists",
    tag = TAG,
    params(NameQuery),
    responses(
        (status = 200, description = "Whether the name is in use", body = NameExists),
        (status = 400, response = BadRequestValidationResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn todo_list_name_exists<S: VectorStore + 'static>(
    State(repository): State<Arc<TodoListRepository<S>>>,
    Query(query): Query<NameQuery>,
) -> TodoListResult<Json<NameExists>> {
    query.validate()?;
    let exists = repository.todo_list_name_exists(&query.name).await?;
    Ok(Json(NameExists { exists }))
}

/// Get a todo list's name and items
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Todo list ID")
    ),
    responses(
        (status = 200, description = "Todo list found", body = TodoListView),
        (status = 404, response = NotFoundResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn get_todo_list<S: VectorStore + 'static>(
    State(repository): State<Arc<TodoListRepository<S>>>,
    Path(id): Path<String>,
) -> TodoListResult<Json<TodoListView>> {
    let view = repository.get_todo_list(&id).await?;
    Ok(Json(view))
}

/// Replace a todo list's items
#[utoipa::path(
    put,
    path = "/{id}/items",
    tag = TAG,
    params(
        ("id" = String, Path, description = "Todo list ID")
    ),
    request_body = UpdateTodoItems,
    responses(
        (status = 204, description = "Items replaced"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn update_todo_items<S: VectorStore + 'static>(
    State(repository): State<Arc<TodoListRepository<S>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateTodoItems>,
) -> TodoListResult<StatusCode> {
    repository.update_todo_items(&id, input.items).await?;
    Ok(StatusCode::NO_CONTENT)
}
