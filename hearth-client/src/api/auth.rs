use shared::client::{LoginRequest, LoginResponse, UserInfo};

use crate::error::ClientResult;
use crate::http::{HttpClient, LOGIN_PATH, LOGOUT_PATH, NetworkHttpClient};

/// Login, logout and `me`
///
/// Refresh is not exposed: the HTTP client runs it by itself on a 401.
pub struct AuthApi<'a> {
    http: &'a NetworkHttpClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(http: &'a NetworkHttpClient) -> Self {
        Self { http }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserInfo> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post(LOGIN_PATH, &request).await?;
        self.http.session().set_logged_in(response.user.clone());
        Ok(response.user)
    }

    /// Log out locally even when the server call fails
    pub async fn logout(&self) -> ClientResult<()> {
        let result: ClientResult<()> = self.http.post_empty(LOGOUT_PATH).await;
        self.http.session().set_logged_out();
        if let Err(e) = &result {
            tracing::warn!(error = %e, "server logout failed");
        }
        result
    }

    /// Reload the current user, e.g. after permissions changed
    pub async fn me(&self) -> ClientResult<UserInfo> {
        let user: UserInfo = self.http.get("auth/me").await?;
        self.http.session().set_logged_in(user.clone());
        Ok(user)
    }
}
