//! Ingress-class ownership of route objects.

/// The annotation naming the controller class that owns an object.
pub const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";

/// The class claimed by a controller that isn't configured with one.
pub const DEFAULT_INGRESS_CLASS: &str = "traefik";

/// Decides whether a controller filtering on `class` owns an object annotated with `annotation`.
///
/// A controller without a class owns unannotated objects and objects annotated with the default
/// class.
pub fn should_process(class: &str, annotation: &str) -> bool {
    class == annotation || (class.is_empty() && annotation == DEFAULT_INGRESS_CLASS)
}

/// Reads the ingress class annotation from an object's annotations.
pub fn annotation(annotations: &std::collections::BTreeMap<String, String>) -> &str {
    annotations
        .get(INGRESS_CLASS_ANNOTATION)
        .map(String::as_str)
        .unwrap_or_default()
}
