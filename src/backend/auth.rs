//! HTTP client for the auth (GoTrue) interface.

use super::error::{BackendError, BackendResult};
use super::resource::{Session, User};
use chrono::Utc;
use log::*;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Outcome of a sign-up request. The auth service only issues a session
/// when email confirmation is disabled.
///
#[derive(Clone, Debug, PartialEq)]
pub enum SignUp {
    SignedIn(Session),
    ConfirmationRequired(User),
}

/// Makes requests to `{base_url}/auth/v1`.
///
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl AuthClient {
    pub fn new(base_url: &str, api_key: &str, http_client: reqwest::Client) -> Self {
        AuthClient {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            http_client,
        }
    }

    /// Exchange email and password for a session.
    ///
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Session> {
        debug!("Requesting password grant for {}...", email);
        let response = self
            .post(
                "token?grant_type=password",
                json!({ "email": email, "password": password }),
                None,
            )
            .await?;
        let session: Session = Self::body(response).await?;
        Ok(session.stamped(Utc::now()))
    }

    /// Register a new account.
    ///
    pub async fn sign_up(&self, email: &str, password: &str) -> BackendResult<SignUp> {
        debug!("Requesting sign up for {}...", email);
        let response = self
            .post(
                "signup",
                json!({ "email": email, "password": password }),
                None,
            )
            .await?;
        let value: serde_json::Value = Self::body(response).await?;
        if value.get("access_token").is_some() {
            let session: Session = serde_json::from_value(value)?;
            Ok(SignUp::SignedIn(session.stamped(Utc::now())))
        } else {
            let user: User = serde_json::from_value(value.get("user").cloned().unwrap_or(value))?;
            Ok(SignUp::ConfirmationRequired(user))
        }
    }

    /// Exchange a refresh token for a new session.
    ///
    pub async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session> {
        debug!("Requesting refresh token grant...");
        let response = self
            .post(
                "token?grant_type=refresh_token",
                json!({ "refresh_token": refresh_token }),
                None,
            )
            .await?;
        let session: Session = Self::body(response).await?;
        Ok(session.stamped(Utc::now()))
    }

    /// Return the user the access token belongs to.
    ///
    pub async fn get_user(&self, access_token: &str) -> BackendResult<User> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await?;
        Self::body(Self::check(response).await?).await
    }

    /// Revoke the session on the auth service.
    ///
    pub async fn sign_out(&self, access_token: &str) -> BackendResult<()> {
        self.post("logout", json!({}), Some(access_token)).await?;
        Ok(())
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        bearer: Option<&str>,
    ) -> BackendResult<Response> {
        let url = format!("{}/auth/v1/{}", self.base_url, path);
        let mut request = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&body);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        Self::check(request.send().await?).await
    }

    async fn check(response: Response) -> BackendResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Unable to read response"));
        warn!("Auth request failed with status {}: {}", status, body);
        Err(BackendError::from_response(status.as_u16(), &body))
    }

    async fn body<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;

    fn session_body() -> serde_json::Value {
        json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": { "id": "user-1", "email": "a@b.c" }
        })
    }

    fn auth(server: &MockServer) -> AuthClient {
        AuthClient::new(&server.base_url(), "anon-key", reqwest::Client::new())
    }

    #[tokio::test]
    async fn sign_in_success() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/auth/v1/token")
                    .query_param("grant_type", "password")
                    .header("apikey", "anon-key")
                    .json_body(json!({ "email": "a@b.c", "password": "secret" }));
                then.status(200).json_body(session_body());
            })
            .await;

        let session = auth(&server)
            .sign_in_with_password("a@b.c", "secret")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(session.user.id, "user-1");
        assert!(session.expires_at.is_some());
    }

    #[tokio::test]
    async fn sign_in_rejected() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/auth/v1/token");
                then.status(400).json_body(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                }));
            })
            .await;

        let error = auth(&server)
            .sign_in_with_password("a@b.c", "wrong")
            .await
            .unwrap_err();
        assert!(error.to_string().contains("Invalid login credentials"));
    }

    #[tokio::test]
    async fn sign_up_requiring_confirmation() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/auth/v1/signup");
                then.status(200)
                    .json_body(json!({ "id": "user-2", "email": "new@b.c" }));
            })
            .await;

        let outcome = auth(&server).sign_up("new@b.c", "secret").await.unwrap();
        assert!(matches!(outcome, SignUp::ConfirmationRequired(user) if user.id == "user-2"));
    }

    #[tokio::test]
    async fn sign_up_with_session() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/auth/v1/signup");
                then.status(200).json_body(session_body());
            })
            .await;

        let outcome = auth(&server).sign_up("a@b.c", "secret").await.unwrap();
        assert!(matches!(outcome, SignUp::SignedIn(session) if session.access_token == "access"));
    }

    #[tokio::test]
    async fn get_user_uses_bearer() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/auth/v1/user")
                    .header("Authorization", "Bearer access");
                then.status(200)
                    .json_body(json!({ "id": "user-1", "email": "a@b.c" }));
            })
            .await;

        let user = auth(&server).get_user("access").await.unwrap();
        mock.assert_async().await;
        assert_eq!(user.id, "user-1");
    }

    #[tokio::test]
    async fn refresh_session_success() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/auth/v1/token")
                    .query_param("grant_type", "refresh_token")
                    .json_body(json!({ "refresh_token": "refresh" }));
                then.status(200).json_body(session_body());
            })
            .await;

        let session = auth(&server).refresh_session("refresh").await.unwrap();
        mock.assert_async().await;
        assert_eq!(session.refresh_token, "refresh");
    }
}
