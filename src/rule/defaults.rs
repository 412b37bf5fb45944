//! Built-in rules for linux/amd64 release assets.

/// The general rule covering conventionally named linux/amd64 assets.
pub const GENERAL_LINUX_AMD64: &str = r"(?i)^.+/(?P<name>[^\.]+)([\-\._]v?\d+\.\d+\.\d+)?[\-\._]linux([\-\._](amd64|x86_64|64bit))?(\.tar\.gz|\.tar\.xz|\.zip|\.gz|\.tgz)?$";

/// Recommended rules as `(pattern, template)` pairs.
///
/// Project-specific rules start with the asset host and repository path so
/// their literal prefix outranks the general rule. The table is built on
/// each call and handed to the caller; nothing here is shared state.
#[must_use]
pub fn default_rules() -> Vec<(String, String)> {
    [
        (GENERAL_LINUX_AMD64, "{{.name}}"),
        // Assets hosted on GitHub.
        (
            r"https://github\.com/istio/istio/releases/download/.+/istioctl-\d+\.\d+\.\d+-linux-amd64\.tar\.gz$",
            "istioctl",
        ),
        (
            r"https://github\.com/starship/starship/releases/download/.+/starship-x86_64-unknown-linux-gnu\.tar\.gz$",
            "starship",
        ),
        (
            r"https://github\.com/protocolbuffers/protobuf/releases/download/.+/protoc-\d+\.\d+-linux-x86_64\.zip$",
            "protoc",
        ),
        // Assets hosted elsewhere.
        (r"https://dl\.k8s\.io/release/.+/bin/linux/amd64/kubectl", "kubectl"),
        (r"https://cdn\.teleport\.dev/teleport-v.+-linux-amd64-bin.tar.gz", "tsh"),
    ]
    .into_iter()
    .map(|(pattern, template)| (pattern.to_owned(), template.to_owned()))
    .collect()
}
