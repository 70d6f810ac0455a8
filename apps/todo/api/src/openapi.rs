use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Todo Lists API",
        version = "0.1.0",
        description = "Shared todo lists located by name and unlocked by password"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/todo-lists", api = domain_todo_lists::ApiDoc)
    )
)]
pub struct ApiDoc;
