//! Token issuance with an embedded permission level
//!
//! Issues an HS256 access/refresh token pair for an authenticated account.
//! Both tokens carry a `user_level` claim derived from the account's
//! privilege flags.

use crate::types::{Account, AccountId, LedgerError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;
use uuid::Uuid;

/// Default access token lifetime
pub const ACCESS_TOKEN_LIFETIME_MINUTES: i64 = 5;

/// Default refresh token lifetime
pub const REFRESH_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Coarse permission label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    Superuser,
    Staff,
    Active,
}

impl UserLevel {
    /// Levels in priority order; the first one granted to an account wins
    pub const PRIORITY: [UserLevel; 3] = [UserLevel::Superuser, UserLevel::Staff, UserLevel::Active];

    fn granted_to(self, account: &Account) -> bool {
        match self {
            UserLevel::Superuser => account.is_superuser,
            UserLevel::Staff => account.is_staff,
            UserLevel::Active => account.is_active,
        }
    }

    /// Highest level an account holds, or `None` if no flag is set
    pub fn for_account(account: &Account) -> Option<UserLevel> {
        Self::PRIORITY
            .into_iter()
            .find(|level| level.granted_to(account))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Superuser => "superuser",
            UserLevel::Staff => "staff",
            UserLevel::Active => "active",
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by both tokens of a pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub user_id: AccountId,
    /// Serialized as `null` when the account holds no level
    pub user_level: Option<UserLevel>,
}

/// Signed access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Signs and verifies token pairs with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer with the default lifetimes
    pub fn new(secret: &[u8]) -> Self {
        TokenIssuer {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_lifetime: Duration::minutes(ACCESS_TOKEN_LIFETIME_MINUTES),
            refresh_lifetime: Duration::hours(REFRESH_TOKEN_LIFETIME_HOURS),
        }
    }

    /// Replace the access and refresh lifetimes
    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_lifetime = access;
        self.refresh_lifetime = refresh;
        self
    }

    /// Issue a token pair for an account, valid from now
    pub fn issue(&self, account: &Account) -> Result<TokenPair, LedgerError> {
        self.issue_at(account, Utc::now())
    }

    /// Issue a token pair for an account, valid from `now`
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if signing fails.
    pub fn issue_at(&self, account: &Account, now: DateTime<Utc>) -> Result<TokenPair, LedgerError> {
        let user_level = UserLevel::for_account(account);

        let refresh = self.sign(TokenType::Refresh, account.id, user_level, now, self.refresh_lifetime)?;
        let access = self.sign(TokenType::Access, account.id, user_level, now, self.access_lifetime)?;

        info!(
            account = %account.id,
            user_level = user_level.map(|level| level.as_str()).unwrap_or("none"),
            "Issued token pair"
        );

        Ok(TokenPair { refresh, access })
    }

    /// Verify a token's signature and expiry and return its claims
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the token is malformed, expired, or signed
    /// with another key.
    pub fn decode(&self, token: &str) -> Result<Claims, LedgerError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }

    fn sign(
        &self,
        token_type: TokenType,
        user_id: AccountId,
        user_level: Option<UserLevel>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<String, LedgerError> {
        let claims = Claims {
            token_type,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().simple().to_string(),
            user_id,
            user_level,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }
}
