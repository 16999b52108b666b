use crate::Client;
use ahash::AHashMap as HashMap;
use anyhow::Result;
use std::{collections::hash_map::Entry, sync::Arc};
use tcp_route_controller_k8s_api::{self as k8s, ResourceExt};

/// An in-memory object cache, updated via `kubert::index`.
#[derive(Debug, Default)]
pub struct Store {
    namespaces: HashMap<String, NamespaceStore>,
}

/// Holds the resources of a single namespace, by name.
#[derive(Debug, Default)]
struct NamespaceStore {
    routes: HashMap<String, Arc<k8s::IngressRouteTcp>>,
    services: HashMap<String, Arc<k8s::Service>>,
    endpoints: HashMap<String, Arc<k8s::Endpoints>>,
    secrets: HashMap<String, Arc<k8s::Secret>>,
}

// === impl Store ===

impl Store {
    fn apply_resource<T: ResourceExt>(
        &mut self,
        kind: &'static str,
        resource: T,
        map: impl FnOnce(&mut NamespaceStore) -> &mut HashMap<String, Arc<T>>,
    ) {
        let name = resource.name_any();
        let namespace = match resource.namespace() {
            Some(ns) => ns,
            None => {
                tracing::warn!(%kind, %name, "Ignoring resource without a namespace");
                return;
            }
        };

        tracing::trace!(%kind, %namespace, %name, "Indexing");
        let ns = self.namespaces.entry(namespace).or_default();
        map(ns).insert(name, Arc::new(resource));
    }

    fn delete_resource<T>(
        &mut self,
        namespace: String,
        name: &str,
        map: impl FnOnce(&mut NamespaceStore) -> &mut HashMap<String, Arc<T>>,
    ) {
        if let Entry::Occupied(mut entry) = self.namespaces.entry(namespace) {
            map(entry.get_mut()).remove(name);
            if entry.get().is_empty() {
                entry.remove();
            }
        }
    }

    fn get<T>(
        &self,
        namespace: &str,
        name: &str,
        map: impl FnOnce(&NamespaceStore) -> &HashMap<String, Arc<T>>,
    ) -> Option<Arc<T>> {
        let ns = self.namespaces.get(namespace)?;
        map(ns).get(name).cloned()
    }
}

macro_rules! index_resource {
    ($ty:ty, $kind:literal, $field:ident) => {
        impl kubert::index::IndexNamespacedResource<$ty> for Store {
            fn apply(&mut self, resource: $ty) {
                self.apply_resource($kind, resource, |ns| &mut ns.$field)
            }

            fn delete(&mut self, namespace: String, name: String) {
                self.delete_resource(namespace, &name, |ns| &mut ns.$field)
            }
        }
    };
}

index_resource!(k8s::IngressRouteTcp, "IngressRouteTCP", routes);
index_resource!(k8s::Service, "Service", services);
index_resource!(k8s::Endpoints, "Endpoints", endpoints);
index_resource!(k8s::Secret, "Secret", secrets);

impl Client for Store {
    fn ingress_route_tcps(&self) -> Vec<Arc<k8s::IngressRouteTcp>> {
        let mut namespaces = self.namespaces.iter().collect::<Vec<_>>();
        namespaces.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        namespaces
            .into_iter()
            .flat_map(|(_, ns)| {
                let mut routes = ns.routes.iter().collect::<Vec<_>>();
                routes.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
                routes.into_iter().map(|(_, route)| route.clone())
            })
            .collect()
    }

    fn get_service(&self, namespace: &str, name: &str) -> Result<Option<Arc<k8s::Service>>> {
        Ok(self.get(namespace, name, |ns| &ns.services))
    }

    fn get_endpoints(&self, namespace: &str, name: &str) -> Result<Option<Arc<k8s::Endpoints>>> {
        Ok(self.get(namespace, name, |ns| &ns.endpoints))
    }

    fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Arc<k8s::Secret>>> {
        Ok(self.get(namespace, name, |ns| &ns.secrets))
    }
}

// === impl NamespaceStore ===

impl NamespaceStore {
    fn is_empty(&self) -> bool {
        self.routes.is_empty()
            && self.services.is_empty()
            && self.endpoints.is_empty()
            && self.secrets.is_empty()
    }
}
