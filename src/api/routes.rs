use std::collections::HashMap;
use std::sync::Arc;
use warp::Filter;

use crate::config::PollConfig;
use crate::gateway::{BackendClient, DeleteFileRequest, PostAction, ReadEndpoint};
use super::handlers;

/// Form bodies larger than this are rejected
const MAX_FORM_BYTES: u64 = 16 * 1024;

/// Every route served to the browser, with request tracing and JSON rejections
pub fn panel_routes(
    backend: Arc<BackendClient>,
    poll: &PollConfig,
) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
    index_page()
        .or(panel_script(poll.interval().as_millis() as u64))
        .or(health_check())
        .or(panel_view_endpoint(backend.clone()))
        .or(read_endpoint(backend.clone()))
        .or(update_config_endpoint(backend.clone()))
        .or(delete_file_endpoint(backend.clone()))
        .or(action_endpoint(backend))
        .recover(handlers::handle_rejection)
        .with(warp::trace::request())
}

pub fn index_page() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(handlers::index)
}

pub fn panel_script(
    poll_interval_ms: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("static" / "panel.js")
        .and(warp::get())
        .map(move || handlers::panel_script(poll_interval_ms))
}

pub fn health_check() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(handlers::health)
}

pub fn panel_view_endpoint(
    backend: Arc<BackendClient>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("panel_view")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_backend(backend))
        .and_then(handlers::panel_view)
}

/// `GET /load_state`, `/get_log`, ... relayed verbatim
pub fn read_endpoint(
    backend: Arc<BackendClient>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path::param::<ReadEndpoint>()
        .and(warp::path::end())
        .and(warp::get())
        .and(with_backend(backend))
        .and_then(handlers::read)
}

pub fn update_config_endpoint(
    backend: Arc<BackendClient>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("update_config")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<HashMap<String, String>>())
        .and(with_backend(backend))
        .and_then(handlers::update_config)
}

pub fn delete_file_endpoint(
    backend: Arc<BackendClient>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("delete_file")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<DeleteFileRequest>())
        .and(with_backend(backend))
        .and_then(handlers::delete_file)
}

/// Body-less `POST` commands and `toggle_<control>`
pub fn action_endpoint(
    backend: Arc<BackendClient>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path::param::<PostAction>()
        .and(warp::path::end())
        .and(warp::post())
        .and(with_backend(backend))
        .and_then(handlers::action)
}

fn with_backend(
    backend: Arc<BackendClient>,
) -> impl Filter<Extract = (Arc<BackendClient>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || backend.clone())
}
