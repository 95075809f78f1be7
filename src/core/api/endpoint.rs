/// Default origin of the Cloud Cost Insight API.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the configured API origin.
pub const API_URL_ENV: &str = "CLOUDCOST_API_URL";

/// Validate a base URL and return it without a trailing slash.
///
/// Only `http://` and `https://` origins are accepted; the API is commonly
/// served over plain HTTP on localhost.
pub fn normalize_base_url(url: &str) -> anyhow::Result<String> {
    let trimmed = url.trim();
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    let Some(rest) = rest else {
        anyhow::bail!("API URL must use http:// or https://, got: {}", url);
    };
    if rest.is_empty() || rest.starts_with('/') {
        anyhow::bail!("API URL has no host: {}", url);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Resolve the API origin: explicit flag, then environment, then config.
pub fn resolve_base_url(flag: Option<&str>, configured: &str) -> String {
    if let Some(url) = flag {
        return url.to_string();
    }
    match std::env::var(API_URL_ENV) {
        Ok(url) if !url.is_empty() => url,
        _ => configured.to_string(),
    }
}
