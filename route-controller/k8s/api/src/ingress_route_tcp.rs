use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Describes how inbound TCP connections are routed to services.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "traefik.containo.us",
    version = "v1alpha1",
    kind = "IngressRouteTCP",
    root = "IngressRouteTcp",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct IngressRouteTcpSpec {
    #[serde(default)]
    pub entry_points: Vec<String>,

    #[serde(default)]
    pub routes: Vec<RouteTcp>,

    pub tls: Option<TlsTcp>,
}

/// A match rule and the services it routes to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteTcp {
    #[serde(rename = "match", default)]
    pub match_: String,

    #[serde(default)]
    pub services: Vec<ServiceTcp>,
}

/// References a `Service` port in the route's namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTcp {
    pub name: String,
    pub port: i32,

    /// Not used when routing TCP connections.
    pub weight: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsTcp {
    /// Forwards encrypted connections without terminating TLS.
    #[serde(default)]
    pub passthrough: bool,

    pub secret_name: Option<String>,

    pub cert_resolver: Option<String>,

    pub options: Option<TlsOptionsTcpRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsOptionsTcpRef {
    pub name: String,
    pub namespace: Option<String>,
}
