//! Stable keys for routers and services.
//!
//! Keys must not change when a configuration is rebuilt from unchanged resources, or the proxy
//! would tear down and recreate its routers on every pass. Distinct rules must never share a key,
//! or one route's router would silently replace another's.

use crate::Error;
use sha2::{Digest, Sha256};

/// The number of leading digest bytes included in a rule key.
const DIGEST_PREFIX_LEN: usize = 10;

/// Separates a namespace from a namespace-local key. Namespace names never contain it.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Derives a namespace-local key for a route rule.
///
/// The key is the route name followed by a truncated SHA-256 digest of the route name and the
/// match rule, e.g. `my.route-4a1f0c9e2b7d3a5c6e8f`. The name is kept verbatim for readability;
/// uniqueness comes from the digest, which covers both inputs.
pub fn rule_key(rule: &str, route_name: &str) -> Result<String, Error> {
    if route_name.is_empty() {
        return Err(Error::KeyDerivation {
            route: route_name.to_string(),
            reason: "route has no name",
        });
    }
    if route_name.chars().any(char::is_control) {
        return Err(Error::KeyDerivation {
            route: route_name.to_string(),
            reason: "route name contains control characters",
        });
    }

    // Names have no control characters, so NUL delimits the name from the rule.
    let digest = Sha256::new()
        .chain_update(route_name.as_bytes())
        .chain_update([0])
        .chain_update(rule.as_bytes())
        .finalize();
    Ok(format!(
        "{route_name}-{}",
        hex::encode(&digest[..DIGEST_PREFIX_LEN])
    ))
}

/// Qualifies a namespace-local key so that it's unique across namespaces.
pub fn qualify(namespace: &str, key: &str) -> String {
    format!("{namespace}{NAMESPACE_SEPARATOR}{key}")
}
