//! Content-addressed cache keys for normalized search requests

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Namespace prefix for response cache keys
pub const RESPONSE_KEY_PREFIX: &str = "api:";

/// Fixed-length digest of a normalized request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hex representation (64 chars)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the response for this fingerprint is stored
    pub fn cache_key(&self) -> String {
        format!("{}{}", RESPONSE_KEY_PREFIX, self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the fingerprint of a request body and path.
///
/// The body is written in canonical form (object keys sorted at every depth)
/// so that textually different but equivalent bodies share a key.
pub fn fingerprint(body: &Value, path: &str) -> Fingerprint {
    let mut canonical = String::new();
    write_canonical(body, &mut canonical);
    canonical.push_str(path);

    let digest = Sha256::digest(canonical.as_bytes());
    Fingerprint(hex::encode(digest))
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
