use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use application::error::AppError;
use log::warn;
use serde_json::json;
use thiserror::Error;

const UNCLASSIFIED_MESSAGE: &str = "Something wrong with my server";

/// HTTP 层错误，响应体统一为 `{"error": message}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Page not found")]
    RouteNotFound,
    /// 内部错误，消息只写日志不返回给客户端
    #[error("{0}")]
    Unclassified(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::ValidationFailed(msg) => ApiError::BadRequest(msg),
            AppError::NotFound(msg) => ApiError::NotFound(msg),
            AppError::Conflict(msg) => ApiError::Conflict(msg),
            AppError::ArtistError(e) => ApiError::Unclassified(e.to_string()),
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let message = match self {
            Self::Unclassified(detail) => {
                warn!("{}", detail);
                UNCLASSIFIED_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// 未匹配任何路由时的兜底处理
pub async fn page_not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::RouteNotFound)
}

/// 请求体不是合法 JSON（或 Content-Type 不对）时返回 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError::BadRequest(err.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError::BadRequest(err.to_string()).into()
    })
}
