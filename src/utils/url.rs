//! URL helpers for building the caption endpoint from a configured base URL.

/// Strip trailing slashes so endpoint joins never produce `//`.
///
/// ```
/// use captionsense::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://captions.example.com/"), "https://captions.example.com");
/// assert_eq!(normalize_base_url("https://captions.example.com///"), "https://captions.example.com");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use captionsense::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://captions.example.com/", "/api/caption"),
///     "https://captions.example.com/api/caption"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Check that a user-supplied base URL is an absolute http(s) URL.
pub fn validate_base_url(base_url: &str) -> Result<String, String> {
    let normalized = normalize_base_url(base_url);
    let rest = ["https://", "http://"]
        .into_iter()
        .find_map(|scheme| normalized.strip_prefix(scheme))
        .ok_or_else(|| missing_scheme(base_url))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("Base URL is missing a host (got '{base_url}')"));
    }
    Ok(normalized)
}

fn missing_scheme(base_url: &str) -> String {
    format!("Base URL must start with http:// or https:// (got '{base_url}')")
}
