#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod class;
pub mod ingress_route_tcp;

pub use self::ingress_route_tcp::{
    IngressRouteTcp, IngressRouteTcpSpec, RouteTcp, ServiceTcp, TlsOptionsTcpRef, TlsTcp,
};
pub use k8s_openapi::{
    api::{
        self,
        core::v1::{
            EndpointAddress, EndpointPort, EndpointSubset, Endpoints, Secret, Service,
            ServicePort, ServiceSpec,
        },
    },
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
    ByteString,
};
pub use kube::{Resource, ResourceExt};

/// The service type of DNS aliases, which have no endpoints.
pub const SERVICE_TYPE_EXTERNAL_NAME: &str = "ExternalName";
