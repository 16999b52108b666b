use crate::Client;
use anyhow::{anyhow, Result};
use tcp_route_controller_core::{CertBundle, CertificateStore, Error, LoadCertificate};
use tcp_route_controller_k8s_api as k8s;

const TLS_CERT_KEY: &str = "tls.crt";
const TLS_PRIVATE_KEY_KEY: &str = "tls.key";

/// Loads certificates from `kubernetes.io/tls`-style secrets in an object store.
#[derive(Debug)]
pub struct SecretLoader<'c, C: ?Sized> {
    client: &'c C,
}

/// Ensures that the secret referenced by a route's TLS configuration is in `certs`.
///
/// Passthrough routes and routes without a secret (e.g. those using a certificate resolver) need
/// no certificate material.
pub(crate) fn resolve_certificate<L>(
    tls: &k8s::TlsTcp,
    namespace: &str,
    certs: &mut CertificateStore,
    loader: &L,
) -> Result<(), Error>
where
    L: LoadCertificate + ?Sized,
{
    if tls.passthrough {
        return Ok(());
    }

    let secret_name = match tls.secret_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => {
            tracing::debug!(%namespace, "No secret name provided");
            return Ok(());
        }
    };

    let key = CertificateStore::key(namespace, secret_name);
    if certs.contains_key(&key) {
        tracing::debug!(%key, "Certificate already loaded");
        return Ok(());
    }

    certs
        .get_or_try_insert_with(key.clone(), || {
            loader.load_certificate(namespace, secret_name)
        })
        .map_err(|source| Error::CertificateLoad { key, source })?;
    Ok(())
}

// === impl SecretLoader ===

impl<'c, C: ?Sized> SecretLoader<'c, C> {
    pub fn new(client: &'c C) -> Self {
        Self { client }
    }
}

impl<C: Client + ?Sized> LoadCertificate for SecretLoader<'_, C> {
    fn load_certificate(&self, namespace: &str, secret_name: &str) -> Result<CertBundle> {
        let secret = self
            .client
            .get_secret(namespace, secret_name)?
            .ok_or_else(|| anyhow!("secret {namespace}/{secret_name} does not exist"))?;

        let certificate = secret_value(&secret, TLS_CERT_KEY).ok_or_else(|| {
            anyhow!("secret {namespace}/{secret_name} is missing {TLS_CERT_KEY}")
        })?;
        let key = secret_value(&secret, TLS_PRIVATE_KEY_KEY).ok_or_else(|| {
            anyhow!("secret {namespace}/{secret_name} is missing {TLS_PRIVATE_KEY_KEY}")
        })?;

        Ok(CertBundle { certificate, key })
    }
}

/// Reads a non-empty value from a secret's `data`, falling back to `stringData` for secrets that
/// have not been normalized by the API server.
fn secret_value(secret: &k8s::Secret, key: &str) -> Option<Vec<u8>> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .map(|k8s::ByteString(bytes)| bytes.clone())
        .or_else(|| {
            secret
                .string_data
                .as_ref()
                .and_then(|data| data.get(key))
                .map(|s| s.as_bytes().to_vec())
        })
        .filter(|value| !value.is_empty())
}
