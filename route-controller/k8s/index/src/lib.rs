//! TCP route configuration builder.
//!
//! A build pass reads `IngressRouteTCP` resources from an object store and produces a
//! [`RoutingConfiguration`](tcp_route_controller_core::RoutingConfiguration):
//!
//! ```text
//! [ IngressRouteTCP ] -> [ rule ] -> [ Service ] -> [ Endpoints ]
//!          \
//!           -> [ TLS secret ] -> [ CertificateStore ]
//! ```
//!
//! Each route rule yields one router and one load-balanced service, sharing a key derived from the
//! route's namespace, name, and match rule. A failure only drops the smallest unit that produced
//! it (a backend, a rule, or a route's TLS augmentation), and is recorded as a [`Diagnostic`] so
//! that a single misconfigured route never prevents other routes from being served.
//!
//! Lookups go through the [`Client`] trait. [`Store`] implements it over resources indexed via
//! `kubert::index`.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod build;
mod diagnostics;
mod endpoints;
mod store;
mod tls;


pub use self::{
    build::{Build, Builder},
    diagnostics::{Diagnostic, Diagnostics, Kind, RouteRef, Scope},
    store::Store,
    tls::SecretLoader,
};
use anyhow::Result;
use std::sync::Arc;
use tcp_route_controller_k8s_api as k8s;

/// Reads resources from an already-populated object cache.
///
/// Lookups return `Ok(None)` when the resource does not exist.
pub trait Client {
    /// Lists all route objects, ordered by namespace and name.
    fn ingress_route_tcps(&self) -> Vec<Arc<k8s::IngressRouteTcp>>;

    fn get_service(&self, namespace: &str, name: &str) -> Result<Option<Arc<k8s::Service>>>;

    fn get_endpoints(&self, namespace: &str, name: &str) -> Result<Option<Arc<k8s::Endpoints>>>;

    fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Arc<k8s::Secret>>>;
}
