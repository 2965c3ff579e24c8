use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};

use crate::error::{PanelError, Result};
use crate::gateway::{BackendClient, BackendReply, DeleteFileRequest, PostAction, ReadEndpoint};
use crate::interlock;
use crate::state::OperationalState;
use super::RELOAD_DELAY_MS;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const PANEL_JS: &str = include_str!("../../static/panel.js");

pub fn index() -> reply::Html<&'static str> {
    reply::html(INDEX_HTML)
}

/// Page script with the server's timing constants prepended
pub fn panel_script(poll_interval_ms: u64) -> Response {
    let script = format!(
        "const POLL_INTERVAL_MS = {};\nconst RELOAD_DELAY_MS = {};\n\n{}",
        poll_interval_ms, RELOAD_DELAY_MS, PANEL_JS
    );
    reply::with_header(script, "content-type", "application/javascript; charset=utf-8")
        .into_response()
}

pub fn health() -> reply::Json {
    reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "stream-panel",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn read(
    endpoint: ReadEndpoint,
    backend: Arc<BackendClient>,
) -> std::result::Result<Response, Infallible> {
    Ok(relay(endpoint.as_str(), backend.get(endpoint.as_str()).await))
}

pub async fn action(
    action: PostAction,
    backend: Arc<BackendClient>,
) -> std::result::Result<Response, Infallible> {
    let path = action.path();
    tracing::info!(action = %path, "Forwarding command to backend");

    let result = backend.post_empty(&path).await;
    if let Ok(reply) = &result {
        if action.is_toggle() && !reply.status.is_success() {
            tracing::warn!(
                action = %path,
                status = reply.status.as_u16(),
                "Backend refused toggle"
            );
        }
    }
    Ok(relay(&path, result))
}

/// Form fields are forwarded to the backend as a flat JSON object
pub async fn update_config(
    form: HashMap<String, String>,
    backend: Arc<BackendClient>,
) -> std::result::Result<Response, Infallible> {
    tracing::info!(keys = form.len(), "Forwarding configuration update");

    let result = match serde_json::to_value(&form) {
        Ok(body) => backend.post_json("update_config", &body).await,
        Err(e) => Err(PanelError::from(e)),
    };
    Ok(relay("update_config", result))
}

pub async fn delete_file(
    request: DeleteFileRequest,
    backend: Arc<BackendClient>,
) -> std::result::Result<Response, Infallible> {
    if let Err(e) = request.validate() {
        tracing::warn!(
            directory = %request.directory,
            filename = %request.filename,
            error = %e,
            "Rejected delete request"
        );
        return Ok(error_reply(&e));
    }

    tracing::info!(
        directory = %request.directory,
        filename = %request.filename,
        "Forwarding file deletion"
    );
    let result = backend.post_form("delete_file", request.to_form_body()).await;
    Ok(relay("delete_file", result))
}

/// Current backend state rendered through the interlock
pub async fn panel_view(backend: Arc<BackendClient>) -> std::result::Result<Response, Infallible> {
    let view = backend
        .get_json::<OperationalState>(ReadEndpoint::LoadState.as_str())
        .await
        .map(|state| interlock::render(&state));

    Ok(match view {
        Ok(view) => reply::json(&view).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render panel view");
            error_reply(&e)
        }
    })
}

fn relay(path: &str, result: Result<BackendReply>) -> Response {
    match result {
        Ok(BackendReply { status, body }) => {
            reply::with_status(reply::json(&body), status).into_response()
        }
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Relaying backend error");
            error_reply(&e)
        }
    }
}

pub fn error_reply(err: &PanelError) -> Response {
    reply::with_status(reply::json(&err.to_json()), err.status_code()).into_response()
}

/// Converts unmatched routes and body errors into `{"error": ...}` replies
pub async fn handle_rejection(
    err: warp::Rejection,
) -> std::result::Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid form body: {}", e))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        tracing::error!(rejection = ?err, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(reply::with_status(
        reply::json(&serde_json::json!({ "error": message })),
        status,
    )
    .into_response())
}
