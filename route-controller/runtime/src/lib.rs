#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use tcp_route_controller_core as core;
pub use tcp_route_controller_k8s_api as k8s;
pub use tcp_route_controller_k8s_index as index;

mod args;
mod manifest;

pub use self::args::{Args, OutputFormat};
