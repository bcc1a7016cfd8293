use std::fmt;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;

use crate::claims::{Claims, TokenUse};
use crate::error::AuthError;

pub const TOKEN_TYPE: &str = "Bearer";

/// The single username/password pair accepted by [`AuthGate::login`].
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity extracted from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful login response body.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedTokens {
    pub token_type: &'static str,
    pub expires_in: i64,
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies bearer tokens.
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct AuthGate {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    credentials: Credentials,
    ttl: TimeDelta,
}

impl AuthGate {
    pub fn new(secret: &str, credentials: Credentials, ttl: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            credentials,
            ttl,
        }
    }

    /// Token lifetime in whole seconds.
    pub fn expires_in(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Checks the submitted pair and issues an access and a refresh token.
    ///
    /// A mismatch in either field yields the same error.
    #[tracing::instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedTokens, AuthError> {
        if !self.credentials.is_configured()
            || username != self.credentials.username
            || password != self.credentials.password
        {
            metrics::counter!("auth_login_total", "outcome" => "rejected").increment(1);
            tracing::warn!("login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.issue(username, TokenUse::Access)?;
        let refresh_token = self.issue(username, TokenUse::Refresh)?;

        metrics::counter!("auth_login_total", "outcome" => "success").increment(1);
        tracing::info!("login succeeded");

        Ok(IssuedTokens {
            token_type: TOKEN_TYPE,
            expires_in: self.expires_in(),
            access_token,
            refresh_token,
        })
    }

    /// Verifies an access token and returns its subject.
    ///
    /// Malformed, expired, foreign-signed and refresh tokens all yield
    /// [`AuthError::Unauthorized`].
    pub fn authenticate(&self, token: &str) -> Result<Subject, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            tracing::debug!(error = %err, "token rejected");
            AuthError::Unauthorized
        })?;

        if data.claims.token_use != TokenUse::Access {
            tracing::debug!("refresh token presented as access token");
            return Err(AuthError::Unauthorized);
        }

        Ok(Subject(data.claims.sub))
    }

    fn issue(&self, username: &str, token_use: TokenUse) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            token_use,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }
}
