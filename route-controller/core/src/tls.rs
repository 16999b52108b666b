use crate::key;
use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt,
};

/// Separates a resource name from the name of the configuration provider that owns it. E.g.
/// `default@file`.
pub const PROVIDER_SEPARATOR: char = '@';

/// Loads certificate material referenced by a route.
pub trait LoadCertificate {
    fn load_certificate(&self, namespace: &str, secret_name: &str) -> anyhow::Result<CertBundle>;
}

/// PEM-encoded certificate chain and private key.
#[derive(Clone, PartialEq, Eq)]
pub struct CertBundle {
    pub certificate: Vec<u8>,
    pub key: Vec<u8>,
}

/// Certificates resolved during a single build pass, keyed by `namespace/secretName`.
///
/// Entries are only ever added, so each secret is loaded at most once per pass.
#[derive(Clone, Debug, Default)]
pub struct CertificateStore {
    certs: BTreeMap<String, CertBundle>,
}

/// A reference to a set of TLS options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TlsOptionsRef {
    /// Options defined as a resource in a namespace. When no namespace is given, the referring
    /// route's namespace is used.
    Local {
        namespace: Option<String>,
        name: String,
    },

    /// Options defined by another configuration provider, named verbatim.
    CrossProvider {
        name: String,
        ignored_namespace: Option<String>,
    },
}

// === impl LoadCertificate ===

impl<F> LoadCertificate for F
where
    F: Fn(&str, &str) -> anyhow::Result<CertBundle>,
{
    fn load_certificate(&self, namespace: &str, secret_name: &str) -> anyhow::Result<CertBundle> {
        (self)(namespace, secret_name)
    }
}

// === impl CertBundle ===

impl fmt::Debug for CertBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertBundle")
            .field("certificate", &format_args!("[{} bytes]", self.certificate.len()))
            .field("key", &format_args!("<redacted>"))
            .finish()
    }
}

// === impl CertificateStore ===

impl CertificateStore {
    pub fn key(namespace: &str, secret_name: &str) -> String {
        format!("{namespace}/{secret_name}")
    }

    pub fn get(&self, key: &str) -> Option<&CertBundle> {
        self.certs.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.certs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CertBundle)> {
        self.certs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the bundle stored at `key`, loading and storing it first if necessary. A failed
    /// load leaves the store unchanged.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: String,
        load: impl FnOnce() -> Result<CertBundle, E>,
    ) -> Result<&CertBundle, E> {
        match self.certs.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let bundle = load()?;
                Ok(entry.insert(bundle))
            }
        }
    }
}

// === impl TlsOptionsRef ===

impl TlsOptionsRef {
    /// Parses an options reference. Returns `None` when no name is set.
    pub fn parse(name: &str, namespace: Option<&str>) -> Option<Self> {
        if name.is_empty() {
            return None;
        }

        let namespace = namespace.filter(|ns| !ns.is_empty()).map(str::to_string);
        if name.contains(PROVIDER_SEPARATOR) {
            return Some(Self::CrossProvider {
                name: name.to_string(),
                ignored_namespace: namespace,
            });
        }

        Some(Self::Local {
            namespace,
            name: name.to_string(),
        })
    }

    /// Returns the global key of the referenced options.
    pub fn key(&self, route_namespace: &str) -> String {
        match self {
            Self::Local { namespace, name } => {
                key::qualify(namespace.as_deref().unwrap_or(route_namespace), name)
            }
            Self::CrossProvider { name, .. } => name.clone(),
        }
    }

    /// A namespace that was set on a cross-provider reference, where it has no effect.
    pub fn ignored_namespace(&self) -> Option<&str> {
        match self {
            Self::CrossProvider {
                ignored_namespace, ..
            } => ignored_namespace.as_deref(),
            Self::Local { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Local { name, .. } | Self::CrossProvider { name, .. } => name,
        }
    }
}
