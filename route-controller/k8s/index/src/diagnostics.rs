use std::fmt;
use tcp_route_controller_core::Error;

/// Identifies a route object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteRef {
    pub namespace: String,
    pub name: String,
}

/// A non-fatal problem encountered while building a configuration.
#[derive(Debug)]
pub struct Diagnostic {
    pub route: RouteRef,
    pub scope: Scope,
    pub kind: Kind,
}

/// The part of a route that was affected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// The route's TLS configuration. The route is served without TLS.
    Tls,

    /// The route's TLS options reference.
    TlsOptions { name: String },

    /// A rule, which was dropped.
    Rule { rule: String },

    /// A rule's service reference, which contributes no servers.
    Backend {
        rule: String,
        service: String,
        port: i32,
    },
}

#[derive(Debug)]
pub enum Kind {
    Error(Error),

    /// A namespace was set on a reference where it has no effect.
    IgnoredNamespace { namespace: String },
}

/// Diagnostics in the order they were encountered.
#[derive(Debug, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

/// Formats an error along with its chain of sources.
struct ErrorChain<'e>(&'e (dyn std::error::Error + 'static));

// === impl Diagnostic ===

impl Diagnostic {
    pub fn error(&self) -> Option<&Error> {
        match &self.kind {
            Kind::Error(error) => Some(error),
            Kind::IgnoredNamespace { .. } => None,
        }
    }

    /// Logs the diagnostic.
    pub fn emit(&self) {
        let RouteRef { namespace, name } = &self.route;
        match (&self.kind, &self.scope) {
            (Kind::Error(error), Scope::Tls) => {
                let error = ErrorChain(error);
                tracing::error!(%namespace, ingress = %name, %error, "Error configuring TLS");
            }
            (Kind::Error(error), Scope::TlsOptions { name: options }) => {
                let error = ErrorChain(error);
                tracing::error!(%namespace, ingress = %name, tls_options = %options, %error, "Invalid TLS options");
            }
            (Kind::Error(error), Scope::Rule { rule }) => {
                let error = ErrorChain(error);
                tracing::error!(%namespace, ingress = %name, %rule, %error, "Dropping rule");
            }
            (
                Kind::Error(error),
                Scope::Backend {
                    rule,
                    service,
                    port,
                },
            ) => {
                let error = ErrorChain(error);
                tracing::error!(%namespace, ingress = %name, %rule, %service, port, %error, "Cannot create service");
            }
            (Kind::IgnoredNamespace { namespace: ignored }, scope) => {
                tracing::warn!(%namespace, ingress = %name, ?scope, %ignored, "Namespace is ignored in cross-provider context");
            }
        }
    }
}

// === impl Diagnostics ===

impl Diagnostics {
    pub(crate) fn error(&mut self, route: &RouteRef, scope: Scope, error: Error) {
        self.0.push(Diagnostic {
            route: route.clone(),
            scope,
            kind: Kind::Error(error),
        });
    }

    pub(crate) fn ignored_namespace(&mut self, route: &RouteRef, scope: Scope, namespace: &str) {
        self.0.push(Diagnostic {
            route: route.clone(),
            scope,
            kind: Kind::IgnoredNamespace {
                namespace: namespace.to_string(),
            },
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.0.iter().filter_map(Diagnostic::error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Logs all diagnostics.
    pub fn emit(&self) {
        for diagnostic in &self.0 {
            diagnostic.emit();
        }
    }
}

impl<'d> IntoIterator for &'d Diagnostics {
    type Item = &'d Diagnostic;
    type IntoIter = std::slice::Iter<'d, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// === impl ErrorChain ===

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(error) = source {
            write!(f, ": {error}")?;
            source = error.source();
        }
        Ok(())
    }
}
