use crate::Client;
use std::net::Ipv6Addr;
use tcp_route_controller_core::{Error, Server};
use tcp_route_controller_k8s_api as k8s;

/// Resolves a route's service reference to the servers that back it.
///
/// An `ExternalName` service resolves to its external host. Otherwise, each endpoint subset must
/// expose a port with the same name as the referenced service port; if any subset does not, the
/// whole reference fails to resolve.
pub(crate) fn resolve_servers<C>(
    client: &C,
    namespace: &str,
    backend: &k8s::ServiceTcp,
) -> Result<Vec<Server>, Error>
where
    C: Client + ?Sized,
{
    let service = client
        .get_service(namespace, &backend.name)
        .map_err(|source| Error::Store {
            kind: "service",
            namespace: namespace.to_string(),
            name: backend.name.clone(),
            source,
        })?
        .ok_or_else(|| Error::ServiceNotFound {
            namespace: namespace.to_string(),
            name: backend.name.clone(),
        })?;
    let spec = service.spec.as_ref();

    let service_port = spec
        .and_then(|spec| spec.ports.as_deref())
        .unwrap_or_default()
        .iter()
        .find(|p| p.port == backend.port)
        .ok_or_else(|| Error::PortNotFound {
            namespace: namespace.to_string(),
            name: backend.name.clone(),
            port: backend.port,
        })?;

    if spec.and_then(|spec| spec.type_.as_deref()) == Some(k8s::SERVICE_TYPE_EXTERNAL_NAME) {
        let host = spec
            .and_then(|spec| spec.external_name.as_deref())
            .unwrap_or_default();
        return Ok(vec![Server::new(host, service_port.port)]);
    }

    let endpoints = client
        .get_endpoints(namespace, &backend.name)
        .map_err(|source| Error::Store {
            kind: "endpoints",
            namespace: namespace.to_string(),
            name: backend.name.clone(),
            source,
        })?
        .ok_or_else(|| Error::EndpointsNotFound {
            namespace: namespace.to_string(),
            name: backend.name.clone(),
        })?;

    let subsets = endpoints.subsets.as_deref().unwrap_or_default();
    if subsets.is_empty() {
        return Err(Error::EmptySubsets {
            namespace: namespace.to_string(),
            name: backend.name.clone(),
        });
    }

    // Endpoint ports are matched by name; an unnamed service port matches an unnamed endpoint
    // port.
    let port_name = service_port.name.as_deref().unwrap_or_default();
    let mut servers = Vec::new();
    for subset in subsets {
        let port = subset
            .ports
            .iter()
            .flatten()
            .find(|p| p.name.as_deref().unwrap_or_default() == port_name)
            .map(|p| p.port)
            .filter(|port| *port > 0)
            .ok_or_else(|| Error::PortResolution {
                namespace: namespace.to_string(),
                name: backend.name.clone(),
                port_name: port_name.to_string(),
            })?;

        servers.extend(
            subset
                .addresses
                .iter()
                .flatten()
                .map(|addr| endpoint_server(&addr.ip, port)),
        );
    }

    Ok(servers)
}

fn endpoint_server(ip: &str, port: i32) -> Server {
    match ip.parse::<Ipv6Addr>() {
        Ok(ip) => Server::new(format!("[{ip}]"), port),
        Err(_) => Server::new(ip, port),
    }
}
