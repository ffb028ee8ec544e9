//! Access tokens for the Graph API
//!
//! [`ClientSecretCredential`] implements the OAuth 2.0 client credentials
//! flow against the Microsoft identity platform, for an application
//! registered with the `Mail.Send` application permission.

use std::{
    fmt,
    sync::{Mutex, PoisonError},
    time::{Duration, SystemTime},
};

use oauth2::{
    basic::BasicClient, reqwest::http_client, AuthType, AuthUrl, ClientId, ClientSecret, Scope,
    TokenResponse, TokenUrl,
};
use url::Url;

use super::error::{self, Error};

/// Scope granting every application permission of the Graph API
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/";

/// Tokens this close to their expiry are treated as expired
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A bearer token
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<SystemTime>,
}

impl AccessToken {
    /// Creates a token, `expires_at` being `None` for tokens which never expire
    pub fn new(secret: String, expires_at: Option<SystemTime>) -> Self {
        Self { secret, expires_at }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// Whether the token expired, or is about to
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| SystemTime::now() + EXPIRY_MARGIN >= expires_at)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of the tokens authorizing Graph requests
pub trait TokenCredential: Send + Sync {
    /// Returns a token which is valid at the time of the call
    fn token(&self) -> Result<AccessToken, Error>;

    /// Forgets any cached token, called when Graph rejected the last one
    fn invalidate(&self) {}

    /// Application the tokens are issued to, shown in diagnostics
    fn client_id(&self) -> Option<&str> {
        None
    }

    /// Directory the application is registered in, shown in diagnostics
    fn tenant(&self) -> Option<&str> {
        None
    }
}

/// A fixed token, obtained by other means
impl TokenCredential for AccessToken {
    fn token(&self) -> Result<AccessToken, Error> {
        if self.is_expired() {
            return Err(error::authentication("access token expired"));
        }
        Ok(self.clone())
    }
}

/// Client credentials flow with a client secret
///
/// Tokens are cached and only requested again once expired.
#[derive(Debug)]
pub struct ClientSecretCredential {
    tenant: String,
    client_id: ClientId,
    client_secret: ClientSecret,
    authority: Url,
    cached: Mutex<Option<AccessToken>>,
}

impl ClientSecretCredential {
    /// Creates a credential for the application `client_id` of the directory
    /// `tenant`
    pub fn new(tenant: String, client_id: String, client_secret: String) -> Self {
        Self {
            tenant,
            client_id: ClientId::new(client_id),
            client_secret: ClientSecret::new(client_secret),
            authority: Url::parse(DEFAULT_AUTHORITY).expect("valid default authority"),
            cached: Mutex::new(None),
        }
    }

    /// Use another identity platform than `https://login.microsoftonline.com/`,
    /// like a national cloud
    pub fn authority(mut self, authority: Url) -> Self {
        self.authority = authority;
        self
    }

    /// `{authority}/{tenant}/oauth2/v2.0/{leaf}`
    fn endpoint(&self, leaf: &str) -> Result<Url, Error> {
        let mut url = self.authority.clone();
        url.path_segments_mut()
            .map_err(|()| error::authentication("authority can't be a base url"))?
            .pop_if_empty()
            .extend([self.tenant.as_str(), "oauth2", "v2.0", leaf]);
        Ok(url)
    }

    fn request_token(&self) -> Result<AccessToken, Error> {
        let client = BasicClient::new(
            self.client_id.clone(),
            Some(self.client_secret.clone()),
            AuthUrl::from_url(self.endpoint("authorize")?),
            Some(TokenUrl::from_url(self.endpoint("token")?)),
        )
        .set_auth_type(AuthType::RequestBody);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            tenant = %self.tenant,
            client_id = %self.client_id.as_str(),
            "requesting access token"
        );

        let requested_at = SystemTime::now();
        let response = client
            .exchange_client_credentials()
            .add_scope(Scope::new(GRAPH_DEFAULT_SCOPE.to_owned()))
            .request(http_client)
            .map_err(error::authentication)?;

        Ok(AccessToken::new(
            response.access_token().secret().clone(),
            response
                .expires_in()
                .map(|expires_in| requested_at + expires_in),
        ))
    }
}

impl TokenCredential for ClientSecretCredential {
    fn token(&self) -> Result<AccessToken, Error> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(token) = cached.as_ref().filter(|token| !token.is_expired()) {
            return Ok(token.clone());
        }

        let token = self.request_token()?;
        *cached = Some(token.clone());
        Ok(token)
    }

    fn invalidate(&self) {
        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn client_id(&self) -> Option<&str> {
        Some(self.client_id.as_str())
    }

    fn tenant(&self) -> Option<&str> {
        Some(&self.tenant)
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use pretty_assertions::assert_eq;
    use url::Url;

    use super::{AccessToken, ClientSecretCredential, TokenCredential};

    fn credential() -> ClientSecretCredential {
        ClientSecretCredential::new(
            "contoso.onmicrosoft.com".to_owned(),
            "6731de76-14a6-49ae-97bc-6eba6914391e".to_owned(),
            "s3cr3t".to_owned(),
        )
    }

    #[test]
    fn expiry() {
        let now = SystemTime::now();

        assert!(!AccessToken::new("a".to_owned(), None).is_expired());
        let token = |expires_in: Duration| AccessToken::new("a".to_owned(), Some(now + expires_in));

        assert!(!token(Duration::from_secs(3600)).is_expired());
        assert!(token(Duration::from_secs(10)).is_expired());
        assert!(AccessToken::new("a".to_owned(), Some(now - Duration::from_secs(10))).is_expired());
    }

    #[test]
    fn debug_hides_secret() {
        let token = AccessToken::new("eyJ0eXAiOiJKV1Qi".to_owned(), None);
        assert!(!format!("{token:?}").contains("eyJ0eXAiOiJKV1Qi"));
        assert!(!format!("{:?}", credential()).contains("s3cr3t"));
    }

    #[test]
    fn static_token() {
        let token = AccessToken::new("abc".to_owned(), None);
        assert_eq!(token.token().unwrap().secret(), "abc");

        let expired = AccessToken::new("abc".to_owned(), Some(SystemTime::UNIX_EPOCH));
        assert!(expired.token().unwrap_err().is_authentication());
    }

    #[test]
    fn endpoints() {
        let credential = credential();
        assert_eq!(
            credential.endpoint("token").unwrap().as_str(),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );

        let credential = credential.authority(Url::parse("https://login.microsoftonline.us").unwrap());
        assert_eq!(
            credential.endpoint("authorize").unwrap().as_str(),
            "https://login.microsoftonline.us/contoso.onmicrosoft.com/oauth2/v2.0/authorize"
        );
    }

    #[test]
    fn cached_token_is_reused() {
        let credential = credential();
        *credential.cached.lock().unwrap() = Some(AccessToken::new(
            "cached".to_owned(),
            Some(SystemTime::now() + Duration::from_secs(3600)),
        ));

        assert_eq!(credential.token().unwrap().secret(), "cached");

        credential.invalidate();
        assert!(credential.cached.lock().unwrap().is_none());
    }

    #[test]
    fn unreachable_authority() {
        let credential = credential().authority(Url::parse("http://127.0.0.1:9/").unwrap());
        *credential.cached.lock().unwrap() = Some(AccessToken::new(
            "stale".to_owned(),
            Some(SystemTime::UNIX_EPOCH),
        ));

        let err = credential.token().unwrap_err();
        assert!(err.is_authentication());
    }
}
