use super::*;
use tcp_route_controller_core::{Router, Service};

const RULE: &str = "HostSNI(`example.com`)";

#[test]
fn external_name_backend() {
    let mut store = Store::default();
    store.apply(mk_route("ns", "r1", Some(mk_rule(RULE, [("svc", 80)]))));
    store.apply(mk_external_service("ns", "svc", "backend.example.org", 80));

    let Build {
        config,
        diagnostics,
    } = build(&store);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let key = router_key("ns", "r1", RULE);
    assert_eq!(
        config.routers,
        btreemap! {
            key.clone() => Router {
                entry_points: vec!["tcp".to_string()],
                rule: RULE.to_string(),
                service: key.clone(),
                tls: None,
            },
        }
    );
    assert_eq!(
        config.services,
        btreemap! {
            key => Service::from_servers(servers(["backend.example.org:80"])),
        }
    );
}

#[test]
fn malformed_rule_is_dropped() {
    let mut store = Store::default();
    store.apply(mk_route(
        "ns",
        "r1",
        Some(mk_rule("Host(`example.com", [("svc", 80)])),
    ));
    store.apply(mk_external_service("ns", "svc", "backend.example.org", 80));

    let Build {
        config,
        diagnostics,
    } = build(&store);
    assert!(config.is_empty(), "{config:?}");
    assert_eq!(diagnostics.len(), 1);

    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(
        diagnostic.route,
        RouteRef {
            namespace: "ns".to_string(),
            name: "r1".to_string(),
        }
    );
    assert_eq!(
        diagnostic.scope,
        Scope::Rule {
            rule: "Host(`example.com".to_string()
        }
    );
    assert!(matches!(
        diagnostic.error(),
        Some(Error::MalformedRule { .. })
    ));
}

#[test]
fn empty_match_does_not_affect_sibling_rules() {
    let mut store = Store::default();
    store.apply(mk_route(
        "ns",
        "r1",
        [mk_rule("", [("svc", 80)]), mk_rule(RULE, [("svc", 80)])],
    ));
    store.apply(mk_route("ns", "r2", Some(mk_rule(RULE, [("svc", 80)]))));
    store.apply(mk_external_service("ns", "svc", "backend.example.org", 80));

    let Build {
        config,
        diagnostics,
    } = build(&store);
    assert_eq!(
        config.routers.keys().cloned().collect::<Vec<_>>(),
        vec![router_key("ns", "r1", RULE), router_key("ns", "r2", RULE)],
    );
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics.errors().next(),
        Some(Error::EmptyMatch)
    ));
}

#[test]
fn router_and_service_share_keys() {
    let mut store = Store::default();
    store.apply(mk_route(
        "ns",
        "r1",
        [
            mk_rule("HostSNI(`a.example.com`)", [("svc", 80)]),
            mk_rule("HostSNI(`b.example.com`)", [("svc", 80)]),
        ],
    ));
    store.apply(mk_external_service("ns", "svc", "backend.example.org", 80));

    let config = build(&store).config;
    assert_eq!(config.routers.len(), 2);
    assert_eq!(
        config.routers.keys().collect::<Vec<_>>(),
        config.services.keys().collect::<Vec<_>>()
    );
    for (key, router) in &config.routers {
        assert_eq!(&router.service, key);
    }
}

#[test]
fn builds_are_deterministic() {
    let mut store = Store::default();
    for ns in ["ns-a", "ns-b", "ns-c"] {
        store.apply(mk_route(
            ns,
            "r1",
            [
                mk_rule("HostSNI(`a.example.com`)", [("svc", 80), ("web", 8080)]),
                mk_rule("HostSNI(`b.example.com`)", [("web", 8080)]),
            ],
        ));
        store.apply(mk_route(ns, "r2", Some(mk_rule(RULE, [("web", 8080)]))));
        store.apply(mk_external_service(ns, "svc", "backend.example.org", 80));
        store.apply(mk_service(ns, "web", Some((Some("http"), 8080))));
        store.apply(mk_endpoints(
            ns,
            "web",
            [(vec!["10.0.0.1", "10.0.0.2"], vec![(Some("http"), 8080)])],
        ));
    }

    let first = build(&store).config;
    let second = build(&store).config;
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.routers.len(), 9);
}

#[test]
fn namespaces_are_isolated() {
    let mut store = Store::default();
    for ns in ["ns-a", "ns-b"] {
        store.apply(mk_route(ns, "r1", Some(mk_rule(RULE, [("svc", 80)]))));
    }
    store.apply(mk_external_service("ns-a", "svc", "a.example.org", 80));
    store.apply(mk_external_service("ns-b", "svc", "b.example.org", 80));

    let config = build(&store).config;
    let a = router_key("ns-a", "r1", RULE);
    let b = router_key("ns-b", "r1", RULE);
    assert_ne!(a, b);
    assert_eq!(
        config.services[&a].servers(),
        servers(["a.example.org:80"]).as_slice()
    );
    assert_eq!(
        config.services[&b].servers(),
        servers(["b.example.org:80"]).as_slice()
    );
}

#[test]
fn failed_backends_are_isolated() {
    let mut store = Store::default();
    store.apply(mk_route(
        "ns",
        "r1",
        Some(mk_rule(RULE, [("missing", 80), ("svc", 80)])),
    ));
    store.apply(mk_external_service("ns", "svc", "backend.example.org", 80));

    let Build {
        config,
        diagnostics,
    } = build(&store);
    let key = router_key("ns", "r1", RULE);
    assert!(config.routers.contains_key(&key));
    assert_eq!(
        config.services[&key].servers(),
        servers(["backend.example.org:80"]).as_slice()
    );

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = diagnostics.iter().next().unwrap();
    assert_eq!(
        diagnostic.scope,
        Scope::Backend {
            rule: RULE.to_string(),
            service: "missing".to_string(),
            port: 80,
        }
    );
    assert!(matches!(
        diagnostic.error(),
        Some(Error::ServiceNotFound { name, .. }) if name == "missing"
    ));
}

#[test]
fn route_without_servers_is_registered() {
    let mut store = Store::default();
    store.apply(mk_route("ns", "r1", Some(mk_rule(RULE, [("svc", 80)]))));
    store.apply(mk_service("ns", "svc", Some((None, 80))));
    store.apply(mk_endpoints("ns", "svc", None));

    let Build {
        config,
        diagnostics,
    } = build(&store);
    let key = router_key("ns", "r1", RULE);
    assert!(config.routers.contains_key(&key));
    assert_eq!(config.services[&key], Service::default());
    assert!(matches!(
        diagnostics.errors().collect::<Vec<_>>().as_slice(),
        [Error::EmptySubsets { .. }]
    ));
}

#[test]
fn generated_name_is_used_when_unnamed() {
    let mut route = mk_route("ns", "", Some(mk_rule(RULE, [("svc", 80)])));
    route.metadata.name = None;
    route.metadata.generate_name = Some("r1-".to_string());

    let mut store = Store::default();
    store.apply(route);
    store.apply(mk_external_service("ns", "svc", "backend.example.org", 80));

    let config = build(&store).config;
    assert!(config
        .routers
        .contains_key(&router_key("ns", "r1-", RULE)));
}

#[test]
fn ingress_class_selects_routes() {
    let mut store = Store::default();
    store.apply(mk_route("ns", "unannotated", Some(mk_rule(RULE, [("svc", 80)]))));
    store.apply(with_class(
        mk_route("ns", "default", Some(mk_rule(RULE, [("svc", 80)]))),
        k8s::class::DEFAULT_INGRESS_CLASS,
    ));
    store.apply(with_class(
        mk_route("ns", "internal", Some(mk_rule(RULE, [("svc", 80)]))),
        "internal",
    ));
    store.apply(mk_external_service("ns", "svc", "backend.example.org", 80));

    let names = |build: Build| {
        build
            .config
            .routers
            .into_keys()
            .collect::<std::collections::BTreeSet<_>>()
    };

    assert_eq!(
        names(build(&store)),
        [
            router_key("ns", "unannotated", RULE),
            router_key("ns", "default", RULE),
        ]
        .into_iter()
        .collect()
    );
    assert_eq!(
        names(build_with_class(&store, "internal")),
        [router_key("ns", "internal", RULE)].into_iter().collect()
    );
}

#[test]
fn builders_share_a_certificate_store() {
    let mut store = Store::default();
    let mut route = mk_route("ns", "r1", Some(mk_rule(RULE, [("svc", 80)])));
    route.spec.tls = Some(k8s::TlsTcp {
        secret_name: Some("cert".to_string()),
        ..Default::default()
    });
    store.apply(route);
    store.apply(mk_external_service("ns", "svc", "backend.example.org", 80));

    let loader = CountingLoader::default();
    let mut certs = CertificateStore::default();
    let first = Builder::new(&store, &loader, "").build(&mut certs);
    let second = Builder::new(&store, &loader, "").build(&mut certs);
    assert_eq!(first.config, second.config);
    assert_eq!(loader.loads.get(), 1);
    assert!(certs.contains_key("ns/cert"));
}

#[test]
fn route_name_punctuation_is_significant() {
    let mut store = Store::default();
    store.apply(mk_route("ns", "my.route", Some(mk_rule(RULE, [("svc-a", 80)]))));
    store.apply(mk_route("ns", "my-route", Some(mk_rule(RULE, [("svc-b", 80)]))));
    store.apply(mk_external_service("ns", "svc-a", "a.example.org", 80));
    store.apply(mk_external_service("ns", "svc-b", "b.example.org", 80));

    let Build {
        config,
        diagnostics,
    } = build(&store);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(config.routers.len(), 2, "{:?}", config.routers.keys());
    assert_eq!(
        config.services[&router_key("ns", "my.route", RULE)].servers(),
        servers(["a.example.org:80"]).as_slice()
    );
    assert_eq!(
        config.services[&router_key("ns", "my-route", RULE)].servers(),
        servers(["b.example.org:80"]).as_slice()
    );
}

#[test]
fn namespace_and_name_boundaries_are_significant() {
    let mut store = Store::default();
    store.apply(mk_route("team-a", "x", Some(mk_rule(RULE, [("svc", 80)]))));
    store.apply(mk_route("team", "a-x", Some(mk_rule(RULE, [("svc", 80)]))));
    store.apply(mk_external_service("team-a", "svc", "a.example.org", 80));
    store.apply(mk_external_service("team", "svc", "b.example.org", 80));

    let Build {
        config,
        diagnostics,
    } = build(&store);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(config.routers.len(), 2, "{:?}", config.routers.keys());
    assert_eq!(
        config.services[&router_key("team-a", "x", RULE)].servers(),
        servers(["a.example.org:80"]).as_slice()
    );
    assert_eq!(
        config.services[&router_key("team", "a-x", RULE)].servers(),
        servers(["b.example.org:80"]).as_slice()
    );
}

#[test]
fn repeated_rule_is_reported() {
    let mut store = Store::default();
    store.apply(mk_route(
        "ns",
        "r1",
        [mk_rule(RULE, [("svc-a", 80)]), mk_rule(RULE, [("svc-b", 80)])],
    ));
    store.apply(mk_external_service("ns", "svc-a", "a.example.org", 80));
    store.apply(mk_external_service("ns", "svc-b", "b.example.org", 80));

    let Build {
        config,
        diagnostics,
    } = build(&store);

    // The first rule keeps its router and service.
    let key = router_key("ns", "r1", RULE);
    assert_eq!(config.routers.len(), 1);
    assert_eq!(
        config.services[&key].servers(),
        servers(["a.example.org:80"]).as_slice()
    );
    assert!(matches!(
        diagnostics.errors().collect::<Vec<_>>().as_slice(),
        [Error::DuplicateKey { key: dup }] if *dup == key
    ));
}
