//! Group token validation backed by HMAC-signed JWTs

use std::fmt::Debug;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::auth::GroupTokenDecoder;
use crate::domain::DomainError;

/// Claims carried by a personalization token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupClaims {
    /// Customer group; issuers send it as a string or a number
    #[serde(alias = "groupId")]
    pub group_id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl GroupClaims {
    pub fn group_id(&self) -> Option<String> {
        match &self.group_id {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Decodes HS256 group tokens signed with a shared secret
#[derive(Clone)]
pub struct JwtGroupTokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtGroupTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtGroupTokenDecoder")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtGroupTokenDecoder {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is honored when present but not required
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl GroupTokenDecoder for JwtGroupTokenDecoder {
    fn decode(&self, token: &str) -> Result<String, DomainError> {
        let data = decode::<GroupClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| DomainError::auth(format!("Invalid group token: {}", e)))?;

        data.claims
            .group_id()
            .ok_or_else(|| DomainError::auth("Group token carries no group id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "group-secret";

    fn sign(claims: Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_string_group_id() {
        let decoder = JwtGroupTokenDecoder::new(SECRET);
        let token = sign(json!({"group_id": "wholesale"}), SECRET);

        assert_eq!(decoder.decode(&token).unwrap(), "wholesale");
    }

    #[test]
    fn test_decode_numeric_group_id_alias() {
        let decoder = JwtGroupTokenDecoder::new(SECRET);
        let token = sign(
            json!({"groupId": 4, "exp": get_current_timestamp() + 600}),
            SECRET,
        );

        assert_eq!(decoder.decode(&token).unwrap(), "4");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let decoder = JwtGroupTokenDecoder::new(SECRET);
        let token = sign(json!({"group_id": "wholesale"}), "other-secret");

        assert!(matches!(decoder.decode(&token), Err(DomainError::Auth { .. })));
    }

    #[test]
    fn test_expired_token_rejected() {
        let decoder = JwtGroupTokenDecoder::new(SECRET);
        let token = sign(
            json!({"group_id": "wholesale", "exp": get_current_timestamp() - 3600}),
            SECRET,
        );

        assert!(matches!(decoder.decode(&token), Err(DomainError::Auth { .. })));
    }

    #[test]
    fn test_garbage_and_empty_group_rejected() {
        let decoder = JwtGroupTokenDecoder::new(SECRET);

        assert!(decoder.decode("not-a-jwt").is_err());

        let token = sign(json!({"group_id": ""}), SECRET);
        assert!(matches!(decoder.decode(&token), Err(DomainError::Auth { .. })));
    }
}
