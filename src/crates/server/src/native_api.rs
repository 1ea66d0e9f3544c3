use super::AppState;
use crate::error::{self, ApiError};
use crate::response::{ArtistResponse, DataResponse, PagingResponse};
use actix_web::{web, web::Json, web::Path, web::Query, HttpResponse, Resource, Scope};
use log::info;
use serde::Deserialize;
use serde_json::{json, Map, Value};

const URL_PATH_ARTISTS: &str = "/artists";

/// PATCH 只从请求体中读取这三个字段，其余字段忽略
const UPDATABLE_FIELDS: [&str; 3] = ["artist_name", "artist_genre", "album_recorded"];

#[derive(Debug, Deserialize)]
pub struct PagingQuery {
    limit: Option<String>,
}

async fn list(state: web::Data<AppState>) -> Result<Json<DataResponse<Vec<ArtistResponse>>>, ApiError> {
    let artists = state.artist_service.list().await?;
    Ok(Json(DataResponse::new(
        artists.into_iter().map(ArtistResponse::from).collect(),
    )))
}

async fn list_paging(
    state: web::Data<AppState>,
    path: Path<String>,
    Query(query): Query<PagingQuery>,
) -> Result<Json<PagingResponse>, ApiError> {
    let limit = match query.limit {
        Some(limit) => Value::String(limit),
        None => json!(state.app_cfg.default_page_limit()),
    };
    let request = json!({ "page": path.into_inner(), "limit": limit });
    let result = state.artist_service.list_paging(&request).await?;
    Ok(Json(result.into()))
}

async fn create(
    state: web::Data<AppState>,
    Json(body): Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let artist = state.artist_service.create(&body).await?;
    Ok(HttpResponse::Created().json(DataResponse::new(ArtistResponse::from(artist))))
}

async fn retrieve(
    state: web::Data<AppState>,
    path: Path<String>,
) -> Result<Json<DataResponse<ArtistResponse>>, ApiError> {
    let artist = state.artist_service.get(&path.into_inner()).await?;
    Ok(Json(DataResponse::new(artist.into())))
}

async fn update(
    state: web::Data<AppState>,
    path: Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<DataResponse<ArtistResponse>>, ApiError> {
    let request = update_request(path.into_inner(), &body);
    let artist = state.artist_service.update(&request).await?;
    Ok(Json(DataResponse::new(artist.into())))
}

async fn delete(
    state: web::Data<AppState>,
    path: Path<String>,
) -> Result<Json<DataResponse<&'static str>>, ApiError> {
    state.artist_service.remove(&path.into_inner()).await?;
    Ok(Json(DataResponse::new("OK")))
}

/// username 取自路径，可变字段取自请求体
fn update_request(username: String, body: &Value) -> Value {
    let mut request = Map::new();
    request.insert("username".to_string(), Value::String(username));
    if let Some(body) = body.as_object() {
        for field in UPDATABLE_FIELDS {
            if let Some(value) = body.get(field) {
                request.insert(field.to_string(), value.clone());
            }
        }
    }
    Value::Object(request)
}

/// 路径匹配但方法不匹配时同样返回 404 Page not found
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::route().to(error::page_not_found))
}

fn scope_artists() -> Scope {
    info!("http config for {}", URL_PATH_ARTISTS);
    web::scope(URL_PATH_ARTISTS)
        .app_data(error::json_config())
        .app_data(error::query_config())
        .service(resource("/page/{page}").route(web::get().to(list_paging)))
        .service(
            resource("/{username}")
                .route(web::get().to(retrieve))
                .route(web::patch().to(update))
                .route(web::delete().to(delete)),
        )
        .service(
            resource("")
                .route(web::get().to(list))
                .route(web::post().to(create)),
        )
}

pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.service(scope_artists());
}
