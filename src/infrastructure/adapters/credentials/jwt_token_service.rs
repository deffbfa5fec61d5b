//! JWT Token Service - HS256 访问/刷新令牌
//!
//! 访问令牌与刷新令牌使用不同的密钥签名，互相不可替代

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::application::ports::{TokenError, TokenPair, TokenServicePort};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// 用户 ID
    id: i64,
    iat: i64,
    exp: i64,
}

/// 一种令牌的签名密钥与有效期
struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    fn sign(&self, user_id: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.id)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

/// JWT 令牌服务
pub struct JwtTokenService {
    access: TokenKeys,
    refresh: TokenKeys,
}

impl JwtTokenService {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access: TokenKeys::new(access_secret, access_ttl),
            refresh: TokenKeys::new(refresh_secret, refresh_ttl),
        }
    }
}

impl TokenServicePort for JwtTokenService {
    fn issue(&self, user_id: i64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.access.sign(user_id)?,
            refresh_token: self.refresh.sign(user_id)?,
        })
    }

    fn verify_access(&self, token: &str) -> Result<i64, TokenError> {
        self.access.verify(token)
    }

    fn verify_refresh(&self, token: &str) -> Result<i64, TokenError> {
        self.refresh.verify(token)
    }
}
