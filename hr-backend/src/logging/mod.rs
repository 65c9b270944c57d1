// src/logging/mod.rs

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// RUST_LOG が無いときのフィルタ
pub const DEFAULT_LOG_FILTER: &str = "hr_backend=info,tower_http=info";

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer())
        .init();
}

/// リクエスト単位の識別情報。認証後は user_id が入った複製がレスポンス拡張に載る
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub user_id: Option<Uuid>,
}

/// RequestContext を付与し、レスポンスに `x-request-id` を返す
pub async fn inject_request_context(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    req.extensions_mut().insert(RequestContext {
        request_id,
        user_id: None,
    });

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// 完了したリクエストを 1 行で記録する。5xx は error、4xx は warn
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|context| context.request_id);

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = started.elapsed().as_millis();
    let user_id = response
        .extensions()
        .get::<RequestContext>()
        .and_then(|context| context.user_id);

    match status {
        500.. => error!(?request_id, %method, %path, status, duration_ms, ?user_id, "Request failed"),
        400..=499 => warn!(?request_id, %method, %path, status, duration_ms, ?user_id, "Request rejected"),
        _ => info!(?request_id, %method, %path, status, duration_ms, ?user_id, "Request completed"),
    }

    response
}
