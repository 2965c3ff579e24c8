use serde::de::DeserializeOwned;
use warp::http::StatusCode;

use super::endpoint::ReadEndpoint;
use crate::config::BackendConfig;
use crate::error::{PanelError, Result};
use crate::interlock::{self, ControlId, PanelView};
use crate::state::OperationalState;

/// A JSON body and status relayed from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

/// Outcome of a sent toggle, with the view it was checked against
#[derive(Debug, Clone)]
pub struct Toggled {
    pub view: PanelView,
    pub reply: BackendReply,
}

/// HTTP client for the backend control service.
///
/// Holds no per-request state; every call is an independent request with
/// no retry.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PanelError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> Result<BackendReply> {
        self.relay(path, self.client.get(self.url(path))).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<BackendReply> {
        self.relay(path, self.client.post(self.url(path))).await
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<BackendReply> {
        self.relay(path, self.client.post(self.url(path)).json(body))
            .await
    }

    /// Posts an already URL-encoded form body
    pub async fn post_form(&self, path: &str, body: String) -> Result<BackendReply> {
        let request = self
            .client
            .post(self.url(path))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body);
        self.relay(path, request).await
    }

    /// GETs `path` and decodes a successful JSON body as `T`
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let reply = self.get(path).await?;
        if !reply.status.is_success() {
            return Err(PanelError::BackendRejected {
                status: reply.status.as_u16(),
                body: reply.body.to_string(),
            });
        }
        serde_json::from_value(reply.body).map_err(|e| {
            PanelError::invalid_response(format!("Unexpected shape from /{}: {}", path, e))
        })
    }

    /// Sends `toggle_<control>` only if the interlock allows it for the
    /// current backend state. `force` sends it regardless.
    pub async fn toggle(&self, control: ControlId, force: bool) -> Result<Toggled> {
        let state = self
            .get_json::<OperationalState>(ReadEndpoint::LoadState.as_str())
            .await?;
        let view = interlock::render(&state);

        if let Err(e) = view.ensure_unlocked(control) {
            if !force {
                tracing::warn!(control = %control, error = %e, "Refusing locked toggle");
                return Err(e);
            }
            tracing::warn!(control = %control, error = %e, "Forcing toggle past interlock");
        }

        let reply = self.post_empty(&control.toggle_path()).await?;
        Ok(Toggled { view, reply })
    }

    async fn relay(&self, path: &str, request: reqwest::RequestBuilder) -> Result<BackendReply> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(path = %path, error = %e, "Backend request failed");
            PanelError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(
                path = %path,
                status = status.as_u16(),
                error = %e,
                "Backend returned a non-JSON body"
            );
            PanelError::invalid_response(format!("/{} returned non-JSON body: {}", path, e))
        })?;

        tracing::debug!(path = %path, status = status.as_u16(), "Backend replied");
        Ok(BackendReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use warp::Filter;

    fn client_for(url: String) -> BackendClient {
        BackendClient::new(&BackendConfig {
            url,
            timeout_secs: 2,
        })
        .unwrap()
    }

    async fn spawn_backend() -> String {
        let state = warp::path("load_state")
            .and(warp::get())
            .map(|| warp::reply::json(&json!({"streaming": true})));
        let broken = warp::path("get_log")
            .map(|| warp::reply::with_status("oops", warp::http::StatusCode::OK));
        let rejected = warp::path("toggle_record").and(warp::post()).map(|| {
            warp::reply::with_status(
                warp::reply::json(&json!({"message": "busy"})),
                warp::http::StatusCode::CONFLICT,
            )
        });

        let (addr, server) =
            warp::serve(state.or(broken).or(rejected)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        format!("http://{}", addr)
    }

    #[test]
    fn test_url_joining() {
        let client = client_for("http://localhost:5000/".to_string());
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/load_state"), "http://localhost:5000/load_state");
        assert_eq!(client.url("get_log"), "http://localhost:5000/get_log");
    }

    #[tokio::test]
    async fn test_relays_json_body() {
        let client = client_for(spawn_backend().await);
        let reply = client.get("load_state").await.unwrap();
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"streaming": true}));
    }

    #[tokio::test]
    async fn test_relays_backend_status() {
        let client = client_for(spawn_backend().await);
        let reply = client.post_empty("toggle_record").await.unwrap();
        assert_eq!(reply.status, StatusCode::CONFLICT);
        assert_eq!(reply.body["message"], "busy");
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let client = client_for(spawn_backend().await);
        let err = client.get("get_log").await.unwrap_err();
        assert!(matches!(err, PanelError::InvalidBackendResponse(_)));
    }

    #[tokio::test]
    async fn test_get_json_rejects_non_success() {
        let client = client_for(spawn_backend().await);
        // GET on a POST-only route is rejected by the mock backend
        let err = client
            .get_json::<serde_json::Value>("toggle_record")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PanelError::BackendRejected { .. } | PanelError::InvalidBackendResponse(_)
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = BackendClient::new(&BackendConfig {
            url: "http://localhost:5000".to_string(),
            timeout_secs: 0,
        })
        .unwrap_err();
        assert!(matches!(err, PanelError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let client = client_for("http://127.0.0.1:1".to_string());
        let err = client.get("load_state").await.unwrap_err();
        assert!(matches!(
            err,
            PanelError::BackendUnreachable(_) | PanelError::BackendTimeout(_)
        ));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
