//! Core types for the TCP route controller.
//!
//! Route objects are translated into a [`RoutingConfiguration`]: a map of routers, each keyed by a
//! stable identifier derived from the route's identity and match rule, and a map of load-balanced
//! services sharing those keys. This crate holds that model along with the pieces of translation
//! that don't depend on how resources are laid out in the Kubernetes API:
//!
//! - [`rule::check_quotes`] gates match rules on balanced quoting;
//! - [`key::rule_key`] and [`key::qualify`] derive router/service keys;
//! - [`tls`] models TLS options references and the per-pass certificate store.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod key;
pub mod rule;
pub mod tls;

pub use self::{
    config::{LoadBalancer, Router, RouterTls, RoutingConfiguration, Server, Service},
    error::Error,
    tls::{CertBundle, CertificateStore, LoadCertificate, TlsOptionsRef},
};
