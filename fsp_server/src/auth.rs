//! Bearer-token authentication.
//!
//! Customer tokens are HS256 JWTs issued by the FinShelter account service, which shares `FSP_JWT_SECRET` with this
//! server. The token subject is the customer id. Handlers that need the caller's identity take an
//! [`AuthenticatedCustomer`] argument; the extractor rejects the request with a 401 if the token is missing, expired
//! or badly signed.
use std::{
    future::{ready, Ready},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use fsp_engine::db_types::CustomerId;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The customer id. Older tokens carry it as `userId` or `_id`.
    #[serde(alias = "userId", alias = "_id")]
    pub sub: String,
    /// Expiry, in seconds since the Unix epoch.
    pub exp: u64,
}

impl JwtClaims {
    pub fn customer_id(&self) -> CustomerId {
        CustomerId::new(self.sub.clone())
    }
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

//--------------------------------------      TokenIssuer      ---------------------------------------------------------
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { key }
    }

    /// Issue a new access token for the given customer.
    /// This method DOES NOT check that the customer exists.
    pub fn issue_token(&self, customer_id: &CustomerId, duration: Option<Duration>) -> Result<String, AuthError> {
        let duration = duration.unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let claims = JwtClaims { sub: customer_id.to_string(), exp: now_secs() + duration.as_secs() };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| AuthError::CouldNotIssueToken(e.to_string()))
    }
}

//--------------------------------------     TokenVerifier     ---------------------------------------------------------
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        Self { key, validation }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                AuthError::PoorlyFormattedToken(e.to_string())
            },
            _ => AuthError::ValidationError(e.to_string()),
        })?;
        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::ValidationError("Token has no subject".into()));
        }
        Ok(data.claims)
    }
}

//-------------------------------------- AuthenticatedCustomer ---------------------------------------------------------
/// The customer making the request, as vouched for by a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCustomer(pub CustomerId);

impl AuthenticatedCustomer {
    pub fn id(&self) -> &CustomerId {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a Bearer token".into()))?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedCustomer, ServerError> {
    let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
        ServerError::ConfigurationError("No token verifier has been registered with the application".into())
    })?;
    let token = bearer_token(req)?;
    let claims = verifier.verify(token).map_err(|e| {
        debug!("🔐️ Rejected access token for {}. {e}", req.path());
        e
    })?;
    trace!("🔐️ Authenticated customer {}", claims.sub);
    Ok(AuthenticatedCustomer(claims.customer_id()))
}

impl FromRequest for AuthenticatedCustomer {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
