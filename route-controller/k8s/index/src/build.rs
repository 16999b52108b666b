use crate::{
    diagnostics::{Diagnostics, RouteRef, Scope},
    endpoints, tls, Client,
};
use tcp_route_controller_core::{
    key, rule, CertificateStore, Error, LoadCertificate, Router, RouterTls, RoutingConfiguration,
    Service, TlsOptionsRef,
};
use tcp_route_controller_k8s_api::{self as k8s, class, ResourceExt};

/// Builds routing configurations from the route objects owned by this controller.
#[derive(Debug)]
pub struct Builder<'a, C: ?Sized, L: ?Sized> {
    client: &'a C,
    loader: &'a L,
    ingress_class: &'a str,
}

/// The result of a build pass.
#[derive(Debug, Default)]
pub struct Build {
    pub config: RoutingConfiguration,
    pub diagnostics: Diagnostics,
}

// === impl Builder ===

impl<'a, C, L> Builder<'a, C, L>
where
    C: Client + ?Sized,
    L: LoadCertificate + ?Sized,
{
    pub fn new(client: &'a C, loader: &'a L, ingress_class: &'a str) -> Self {
        Self {
            client,
            loader,
            ingress_class,
        }
    }

    /// Builds a configuration from the client's current state.
    ///
    /// Certificates referenced by routes are added to `certs`, which may be shared with other
    /// builders in the same pass. A secret already present in `certs` is not loaded again.
    pub fn build(&self, certs: &mut CertificateStore) -> Build {
        let mut build = Build::default();

        for route in self.client.ingress_route_tcps() {
            let annotation = class::annotation(route.annotations());
            if !class::should_process(self.ingress_class, annotation) {
                tracing::trace!(
                    namespace = ?route.namespace(),
                    name = %route.name_any(),
                    %annotation,
                    "Skipping route owned by another ingress class",
                );
                continue;
            }

            self.add_route(&route, certs, &mut build);
        }

        build
    }

    fn add_route(
        &self,
        route: &k8s::IngressRouteTcp,
        certs: &mut CertificateStore,
        build: &mut Build,
    ) {
        let namespace = route.namespace().unwrap_or_default();
        let route_ref = RouteRef {
            name: display_name(&route.metadata).to_string(),
            namespace,
        };

        let mut tls = route.spec.tls.as_ref();
        if let Some(spec) = tls {
            if let Err(error) =
                tls::resolve_certificate(spec, &route_ref.namespace, certs, self.loader)
            {
                build.diagnostics.error(&route_ref, Scope::Tls, error);
                tls = None;
            }
        }

        // Built when the first rule is registered, so that routes without routers report nothing
        // about their TLS options.
        let mut route_tls = None::<Option<RouterTls>>;
        for rule in &route.spec.routes {
            let Some(id) = self.add_rule(&route_ref, rule, build) else {
                continue;
            };

            let rule_tls = route_tls
                .get_or_insert_with(|| {
                    tls.map(|spec| router_tls(spec, &route_ref, &mut build.diagnostics))
                })
                .clone();
            tracing::debug!(%id, rule = %rule.match_, "Configured router");
            build.config.routers.insert(
                id.clone(),
                Router {
                    entry_points: route.spec.entry_points.clone(),
                    rule: rule.match_.clone(),
                    service: id.clone(),
                    tls: rule_tls,
                },
            );
        }
    }

    /// Registers a rule's service, returning its key. Rules that cannot be routed are recorded as
    /// diagnostics and skipped.
    fn add_rule(&self, route: &RouteRef, rule: &k8s::RouteTcp, build: &mut Build) -> Option<String> {
        let scope = || Scope::Rule {
            rule: rule.match_.clone(),
        };

        if rule.match_.is_empty() {
            build.diagnostics.error(route, scope(), Error::EmptyMatch);
            return None;
        }

        if let Err(error) = rule::check_quotes(&rule.match_) {
            build.diagnostics.error(route, scope(), error);
            return None;
        }

        let id = match key::rule_key(&rule.match_, &route.name) {
            Ok(key) => key::qualify(&route.namespace, &key),
            Err(error) => {
                build.diagnostics.error(route, scope(), error);
                return None;
            }
        };
        if build.config.routers.contains_key(&id) || build.config.services.contains_key(&id) {
            build
                .diagnostics
                .error(route, scope(), Error::DuplicateKey { key: id });
            return None;
        }

        let mut servers = Vec::new();
        for backend in &rule.services {
            match endpoints::resolve_servers(self.client, &route.namespace, backend) {
                Ok(s) => servers.extend(s),
                Err(error) => build.diagnostics.error(
                    route,
                    Scope::Backend {
                        rule: rule.match_.clone(),
                        service: backend.name.clone(),
                        port: backend.port,
                    },
                    error,
                ),
            }
        }

        build
            .config
            .services
            .insert(id.clone(), Service::from_servers(servers));
        Some(id)
    }
}

/// Builds the TLS block shared by all of a route's routers.
fn router_tls(tls: &k8s::TlsTcp, route: &RouteRef, diagnostics: &mut Diagnostics) -> RouterTls {
    let options = tls
        .options
        .as_ref()
        .and_then(|opts| TlsOptionsRef::parse(&opts.name, opts.namespace.as_deref()));

    if let Some(opts) = options.as_ref() {
        if let Some(ns) = opts.ignored_namespace() {
            let scope = Scope::TlsOptions {
                name: opts.name().to_string(),
            };
            diagnostics.ignored_namespace(route, scope, ns);
        }
    }

    RouterTls {
        passthrough: tls.passthrough,
        cert_resolver: tls.cert_resolver.clone().filter(|r| !r.is_empty()),
        options: options.map(|opts| opts.key(&route.namespace)),
    }
}

/// A route's name, or its generated name prefix if it has not been named.
fn display_name(meta: &k8s::ObjectMeta) -> &str {
    match meta.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => meta.generate_name.as_deref().unwrap_or_default(),
    }
}
