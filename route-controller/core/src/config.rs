use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The TCP portion of a proxy's dynamic configuration.
///
/// Both maps are ordered so that a configuration built from unchanged inputs serializes
/// identically across passes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingConfiguration {
    pub routers: BTreeMap<String, Router>,
    pub services: BTreeMap<String, Service>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Router {
    pub entry_points: Vec<String>,
    pub rule: String,
    pub service: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTls>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterTls {
    pub passthrough: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_resolver: Option<String>,

    /// The global key of a TLS options set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub load_balancer: LoadBalancer,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoadBalancer {
    pub servers: Vec<Server>,
}

/// A dialable `host:port` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Server {
    pub address: String,
}

// === impl RoutingConfiguration ===

impl RoutingConfiguration {
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty() && self.services.is_empty()
    }
}

// === impl Service ===

impl Service {
    pub fn from_servers(servers: Vec<Server>) -> Self {
        Self {
            load_balancer: LoadBalancer { servers },
        }
    }

    pub fn servers(&self) -> &[Server] {
        &self.load_balancer.servers
    }
}

// === impl Server ===

impl Server {
    pub fn new(host: impl std::fmt::Display, port: impl std::fmt::Display) -> Self {
        Self {
            address: format!("{host}:{port}"),
        }
    }
}

impl std::fmt::Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.address.fmt(f)
    }
}
