//! Auth domain - Personalization token decoding

use std::fmt::Debug;

use crate::domain::DomainError;

/// Decodes an opaque group token into a customer group identifier
pub trait GroupTokenDecoder: Send + Sync + Debug {
    /// Returns the group id, or `DomainError::Auth` when the token is invalid
    fn decode(&self, token: &str) -> Result<String, DomainError>;
}

/// Decoder used when no token secret is configured; every token is rejected
#[derive(Debug, Clone, Default)]
pub struct DisabledGroupTokenDecoder;

impl GroupTokenDecoder for DisabledGroupTokenDecoder {
    fn decode(&self, _token: &str) -> Result<String, DomainError> {
        Err(DomainError::auth("Group token decoding is not configured"))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;

    /// Maps known tokens to group ids
    #[derive(Debug, Default)]
    pub struct MockGroupTokenDecoder {
        tokens: HashMap<String, String>,
    }

    impl MockGroupTokenDecoder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_token(mut self, token: &str, group_id: &str) -> Self {
            self.tokens.insert(token.to_string(), group_id.to_string());
            self
        }
    }

    impl GroupTokenDecoder for MockGroupTokenDecoder {
        fn decode(&self, token: &str) -> Result<String, DomainError> {
            self.tokens
                .get(token)
                .cloned()
                .ok_or_else(|| DomainError::auth("Invalid group token"))
        }
    }
}
