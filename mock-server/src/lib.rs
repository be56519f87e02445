use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

const MAX_PER_PAGE: usize = 100;
const DEFAULT_PER_PAGE: usize = 25;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Server {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Volume {
    pub id: String,
    pub name: String,
    pub size: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub id: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
    pub fields: Vec<FormField>,
}

#[derive(Deserialize)]
pub struct CreateServer {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateServer {
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateVolume {
    pub name: String,
    pub size: u64,
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Default)]
pub struct Store {
    pub servers: Vec<Server>,
    pub volumes: Vec<Volume>,
    pub images: Vec<Image>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error envelope in the `{"error": {"code", "message"}}` shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(kind: &str, id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", format!("{kind} {id} not found"))
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({"error": {"code": self.code, "message": self.message}});
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/health", get(health))
        .route("/boom", get(boom))
        .route("/servers", get(list_servers).post(create_server))
        .route(
            "/servers/{id}",
            get(get_server).put(update_server).delete(delete_server),
        )
        .route("/volumes", get(list_volumes).post(create_volume))
        .route("/volumes/{id}", get(get_volume).delete(delete_volume))
        .route("/images", get(list_images).post(upload_image))
        .route("/images/{id}", get(get_image).delete(delete_image))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "ok")
}

async fn boom() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain")],
        "upstream exploded",
    )
}

/// Slice `items` for the requested page, with a `meta` block.
fn paginate<T: Serialize + Clone>(
    key: &str,
    items: &[T],
    params: &PageParams,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);
    if page == 0 || per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "invalid_pagination",
            format!("page must be > 0 and per_page in 1..={MAX_PER_PAGE}"),
        ));
    }
    let slice: Vec<T> = items
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();
    Ok(Json(json!({
        key: slice,
        "meta": {"page": page, "per_page": per_page, "total": items.len()},
    })))
}

// --- servers ---

async fn list_servers(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    paginate("servers", &db.read().await.servers, &params)
}

async fn create_server(
    State(db): State<Db>,
    input: Result<Json<CreateServer>, JsonRejection>,
) -> Result<(StatusCode, Json<Server>), ApiError> {
    let Json(input) = input?;
    let server = Server {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        image: input.image,
        status: "running".to_string(),
    };
    info!(id = %server.id, name = %server.name, "server created");
    db.write().await.servers.push(server.clone());
    Ok((StatusCode::CREATED, Json(server)))
}

/// Servers are addressable by id or by name.
async fn get_server(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Server>, ApiError> {
    let store = db.read().await;
    store
        .servers
        .iter()
        .find(|s| s.id == id || s.name == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("server", &id))
}

async fn update_server(
    State(db): State<Db>,
    Path(id): Path<String>,
    input: Result<Json<UpdateServer>, JsonRejection>,
) -> Result<Json<Server>, ApiError> {
    let Json(input) = input?;
    let mut store = db.write().await;
    let server = store
        .servers
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| ApiError::not_found("server", &id))?;
    if let Some(name) = input.name {
        server.name = name;
    }
    if let Some(status) = input.status {
        server.status = status;
    }
    Ok(Json(server.clone()))
}

async fn delete_server(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    let before = store.servers.len();
    store.servers.retain(|s| s.id != id);
    if store.servers.len() == before {
        return Err(ApiError::not_found("server", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- volumes ---

async fn list_volumes(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    paginate("volumes", &db.read().await.volumes, &params)
}

async fn create_volume(
    State(db): State<Db>,
    input: Result<Json<CreateVolume>, JsonRejection>,
) -> Result<(StatusCode, Json<Volume>), ApiError> {
    let Json(input) = input?;
    if input.size == 0 {
        return Err(ApiError::invalid("size must be positive"));
    }
    let volume = Volume {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        size: input.size,
    };
    db.write().await.volumes.push(volume.clone());
    Ok((StatusCode::CREATED, Json(volume)))
}

async fn get_volume(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Volume>, ApiError> {
    let store = db.read().await;
    store
        .volumes
        .iter()
        .find(|v| v.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("volume", &id))
}

async fn delete_volume(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    let before = store.volumes.len();
    store.volumes.retain(|v| v.id != id);
    if store.volumes.len() == before {
        return Err(ApiError::not_found("volume", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- images ---

async fn list_images(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    paginate("images", &db.read().await.images, &params)
}

async fn upload_image(
    State(db): State<Db>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Image>), ApiError> {
    let mut fields = Vec::new();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::invalid(e.body_text()))?;
            upload = Some((filename, content_type, data.len()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::invalid(e.body_text()))?;
            fields.push(FormField { name, value });
        }
    }

    let (filename, content_type, size) =
        upload.ok_or_else(|| ApiError::invalid("missing `file` part"))?;
    let image = Image {
        id: Uuid::new_v4().to_string(),
        filename,
        content_type,
        size,
        fields,
    };
    info!(id = %image.id, size = image.size, "image uploaded");
    db.write().await.images.push(image.clone());
    Ok((StatusCode::CREATED, Json(image)))
}

async fn get_image(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Image>, ApiError> {
    let store = db.read().await;
    store
        .images
        .iter()
        .find(|i| i.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("image", &id))
}

async fn delete_image(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    let before = store.images.len();
    store.images.retain(|i| i.id != id);
    if store.images.len() == before {
        return Err(ApiError::not_found("image", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}
