const DEFAULT_SUFFIX: &str = ".default";

/// Converts an AADv1 style resource into the AADv2 `.default` scope.
///
/// A single trailing `/` is stripped before `/.default` is appended. Resources
/// that already end with `.default` are left as they are.
pub fn normalize_scope(resource: &str) -> String {
    let resource = resource.strip_suffix('/').unwrap_or(resource);
    if resource.ends_with(DEFAULT_SUFFIX) {
        resource.to_owned()
    } else {
        format!("{resource}/{DEFAULT_SUFFIX}")
    }
}
