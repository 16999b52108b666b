/// Errors encountered while translating route objects.
///
/// Every error is scoped to the smallest unit that produced it: a backend, a rule, or a route's
/// TLS augmentation. None of them abort a build pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty match rule")]
    EmptyMatch,

    #[error("invalid syntax for match rule {rule:?}: {reason}")]
    MalformedRule { rule: String, reason: &'static str },

    #[error("cannot derive a key for route {route:?}: {reason}")]
    KeyDerivation { route: String, reason: &'static str },

    #[error("key {key} is already used by another rule")]
    DuplicateKey { key: String },

    #[error("service {namespace}/{name} not found")]
    ServiceNotFound { namespace: String, name: String },

    #[error("service {namespace}/{name} has no port {port}")]
    PortNotFound {
        namespace: String,
        name: String,
        port: i32,
    },

    #[error("endpoints {namespace}/{name} not found")]
    EndpointsNotFound { namespace: String, name: String },

    #[error("endpoints {namespace}/{name} have no subsets")]
    EmptySubsets { namespace: String, name: String },

    #[error("cannot resolve port {port_name:?} of service {namespace}/{name} in an endpoint subset")]
    PortResolution {
        namespace: String,
        name: String,
        port_name: String,
    },

    #[error("failed to load certificate from secret {key}")]
    CertificateLoad {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to look up {kind} {namespace}/{name}")]
    Store {
        kind: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: anyhow::Error,
    },
}
