//! Auth sub-client — register, login, logout, user profile.

use crate::auth::{LoginRequest, RegisterRequest, RegisterResponse, UserProfile};
use crate::client::StockClient;
use crate::error::{AuthError, HttpError, SdkError};

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Auth<'a> {
    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, SdkError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        Ok(self.client.http.register(&request).await?)
    }

    /// Exchange credentials for a bearer token and store it in the
    /// configured [`CredentialProvider`](crate::auth::CredentialProvider).
    ///
    /// Bad credentials surface as [`AuthError::LoginFailed`] carrying the
    /// server's message.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SdkError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let token = match self.client.http.login(&request).await {
            Ok(resp) => resp.access_token,
            Err(HttpError::BadRequest(detail)) | Err(HttpError::NotFound(detail)) => {
                return Err(AuthError::LoginFailed(detail).into());
            }
            Err(HttpError::Unauthorized) => {
                return Err(AuthError::LoginFailed("Invalid credentials".to_string()).into());
            }
            Err(e) => return Err(e.into()),
        };

        self.client.credentials().set(&token)?;
        tracing::info!("Logged in as {}", email);
        Ok(())
    }

    /// Forget the stored token. The backend keeps no session to revoke.
    pub fn logout(&self) -> Result<(), SdkError> {
        self.client.credentials().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Fetch the signed-in user's profile.
    ///
    /// A 401 means the token is no longer valid: it is cleared and
    /// [`AuthError::SessionExpired`] is returned.
    pub async fn profile(&self) -> Result<UserProfile, SdkError> {
        self.client.require_auth()?;

        match self.client.http.get_profile().await {
            Ok(profile) => Ok(profile),
            Err(HttpError::Unauthorized) => {
                tracing::warn!("Session rejected by server, clearing token");
                if let Err(e) = self.client.credentials().clear() {
                    tracing::warn!("Failed to clear token: {}", e);
                }
                Err(AuthError::SessionExpired.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a token is stored. Does not validate it with the server;
    /// use [`profile`](Self::profile) for that.
    pub fn is_authenticated(&self) -> bool {
        self.client.credentials().is_authenticated()
    }
}
