use crate::{index::Store, k8s};
use anyhow::{bail, Context, Result};
use kubert::index::IndexNamespacedResource;
use serde::{de::DeserializeOwned, Deserialize};

/// Resources without a namespace are placed in the namespace `kubectl` would use.
const DEFAULT_NAMESPACE: &str = "default";

/// Indexes every supported resource in a multi-document YAML manifest, returning the number of
/// resources indexed.
///
/// `List` documents are expanded. Resources of other kinds are skipped.
pub(crate) fn apply(store: &mut Store, contents: &str) -> Result<usize> {
    let mut count = 0;
    for (i, doc) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let value = serde_yaml::Value::deserialize(doc)
            .with_context(|| format!("invalid YAML in document {i}"))?;
        count += apply_value(store, value).with_context(|| format!("document {i}"))?;
    }
    Ok(count)
}

fn apply_value(store: &mut Store, value: serde_yaml::Value) -> Result<usize> {
    if value.is_null() {
        return Ok(0);
    }

    let kind = match value.get("kind").and_then(|k| k.as_str()) {
        Some(kind) => kind.to_string(),
        None => bail!("resource has no kind"),
    };

    match kind.as_str() {
        "IngressRouteTCP" => index::<k8s::IngressRouteTcp>(store, "IngressRouteTCP", value)?,
        "Service" => index::<k8s::Service>(store, "Service", value)?,
        "Endpoints" => index::<k8s::Endpoints>(store, "Endpoints", value)?,
        "Secret" => index::<k8s::Secret>(store, "Secret", value)?,
        "List" => {
            let items = match value.get("items") {
                Some(serde_yaml::Value::Sequence(items)) => items.clone(),
                Some(serde_yaml::Value::Null) | None => return Ok(0),
                Some(_) => bail!("List items must be a sequence"),
            };
            let mut count = 0;
            for item in items {
                count += apply_value(store, item)?;
            }
            return Ok(count);
        }
        kind => {
            tracing::debug!(%kind, "Skipping unsupported resource");
            return Ok(0);
        }
    }

    Ok(1)
}

fn index<T>(store: &mut Store, kind: &str, value: serde_yaml::Value) -> Result<()>
where
    T: k8s::Resource + DeserializeOwned,
    Store: IndexNamespacedResource<T>,
{
    let mut resource = serde_yaml::from_value::<T>(value)
        .with_context(|| format!("invalid {kind}"))?;
    let meta = resource.meta_mut();
    if meta.namespace.as_deref().map_or(true, str::is_empty) {
        meta.namespace = Some(DEFAULT_NAMESPACE.to_string());
    }
    store.apply(resource);
    Ok(())
}
