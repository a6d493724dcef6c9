//! HTTP client - network communication
//!
//! Every endpoint answers with the `{code, message, data}` envelope from
//! [`shared::ApiResponse`]. The session is a cookie kept by reqwest; on a 401
//! the client asks `/auth/refresh` once and replays the request, and a
//! failed refresh turns into a forced logout.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{ApiResponse, ErrorCode};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

pub(crate) const LOGIN_PATH: &str = "auth/login";
pub(crate) const LOGOUT_PATH: &str = "auth/logout";
pub(crate) const REFRESH_PATH: &str = "auth/refresh";

/// Query pairs as produced by [`shared::ListQuery::to_pairs`]
pub type Query = [(&'static str, String)];

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn get_query<T: DeserializeOwned>(&self, path: &str, query: &Query) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
}

/// Network HTTP client with a cookie session
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> ClientResult<reqwest::Response> {
        let mut req = self.client.request(method, self.url(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    /// Ask the server to extend the session
    async fn refresh(&self) -> bool {
        match self.send(Method::POST, REFRESH_PATH, &[], None).await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("session refreshed");
                true
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "session refresh rejected");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed");
                false
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, method, query, body), fields(method = %method))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let mut response = self.send(method.clone(), path, query, body.as_ref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && !is_auth_path(path)
            && self.session.is_logged_in()
        {
            if !self.refresh().await {
                self.session.set_logged_out();
                return Err(ClientError::SessionExpired);
            }
            response = self.send(method, path, query, body.as_ref()).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                self.session.set_logged_out();
                return Err(ClientError::SessionExpired);
            }
        }

        handle_response(response).await
    }
}

fn is_auth_path(path: &str) -> bool {
    let path = path.trim_start_matches('/');
    path == LOGIN_PATH || path == LOGOUT_PATH || path == REFRESH_PATH
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        // Try the structured error envelope first
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<Value>>(&text) {
            let code = envelope
                .code
                .and_then(|c| ErrorCode::try_from(c).ok())
                .unwrap_or_else(|| code_for_status(status));
            tracing::debug!(status = %status, code = code.code(), message = %envelope.message, "request rejected");
            return Err(ClientError::Api {
                status: status.as_u16(),
                code,
                message: envelope.message,
                details: envelope.details,
            });
        }
        return match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(ClientError::Validation(text)),
            _ => Err(ClientError::Internal(format!("{}: {}", status, text))),
        };
    }
    decode_envelope(status, &text)
}

/// Unwrap a success envelope; an empty body decodes as `null`
pub(crate) fn decode_envelope<T: DeserializeOwned>(status: StatusCode, text: &str) -> ClientResult<T> {
    if text.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    let envelope: ApiResponse<Value> = serde_json::from_str(text)
        .map_err(|e| ClientError::InvalidResponse(format!("not an API envelope: {}", e)))?;
    if !envelope.is_success() {
        let code = envelope
            .code
            .and_then(|c| ErrorCode::try_from(c).ok())
            .unwrap_or(ErrorCode::Unknown);
        return Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message: envelope.message,
            details: envelope.details,
        });
    }
    Ok(serde_json::from_value(envelope.data.unwrap_or(Value::Null))?)
}

fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::UNAUTHORIZED => ErrorCode::NotAuthenticated,
        StatusCode::FORBIDDEN => ErrorCode::PermissionDenied,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::CONFLICT => ErrorCode::AlreadyExists,
        s if s.is_client_error() => ErrorCode::ValidationFailed,
        _ => ErrorCode::InternalError,
    }
}

fn to_body<B: Serialize>(body: &B) -> ClientResult<Option<Value>> {
    Ok(Some(serde_json::to_value(body)?))
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::GET, path, &[], None).await
    }

    async fn get_query<T: DeserializeOwned>(&self, path: &str, query: &Query) -> ClientResult<T> {
        self.execute(Method::GET, path, query, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        let body = to_body(body)?;
        self.execute(Method::POST, path, &[], body).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::POST, path, &[], None).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        let body = to_body(body)?;
        self.execute(Method::PUT, path, &[], body).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        let body = to_body(body)?;
        self.execute(Method::PATCH, path, &[], body).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::DELETE, path, &[], None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_envelope_data() {
        let value: Vec<i64> = decode_envelope(StatusCode::OK, r#"{"code":0,"message":"OK","data":[1,2]}"#).unwrap();
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn test_decode_envelope_without_data_as_unit() {
        let _: () = decode_envelope(StatusCode::OK, r#"{"code":0,"message":"OK"}"#).unwrap();
        let _: () = decode_envelope(StatusCode::NO_CONTENT, "").unwrap();
    }

    #[test]
    fn test_decode_envelope_error_inside_200() {
        let err = decode_envelope::<()>(StatusCode::OK, r#"{"code":4002,"message":"Cannot approve"}"#).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { code: ErrorCode::InvalidTransition, .. }
        ));
    }

    #[test]
    fn test_auth_paths_never_refresh() {
        assert!(is_auth_path("/auth/login"));
        assert!(is_auth_path("auth/refresh"));
        assert!(!is_auth_path("auth/me"));
        assert!(!is_auth_path("purchase-orders"));
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig::new("http://localhost:8080/api/");
        let client = NetworkHttpClient::new(&config, Session::new()).unwrap();
        assert_eq!(client.url("/purchase-orders/3"), "http://localhost:8080/api/purchase-orders/3");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }
}
