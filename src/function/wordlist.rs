// wordlist.rs
use super::ScanError;
use std::fs;
use std::path::Path;

/// Built-in candidates used when no wordlist is given.
pub const DEFAULT_PATHS: &[&str] = &[
    "api", "api/v1", "api/v2", "api/v3", "v1", "v2", "v3", "rest", "json", "graphql",
    "internal", "secure", "services", "auth", "login", "register", "user", "admin",
    "products", "orders", "items", "data", "search", "docs", "api-docs", "swagger",
    "api/users", "api/admin", "api/products", "api/auth", "api/v1/auth", "api/v1/users",
    "v1/accounts", "v2/accounts", "api/v1/profile", "profile", "api/v1/orders",
    "status", "health", "metrics", "v1/status", "v1/metrics", "api/metrics",
];

pub fn default_paths() -> Vec<String> {
    DEFAULT_PATHS.iter().map(|p| p.to_string()).collect()
}

/// Reads candidates from `path`: one per line, trimmed, blank lines skipped.
/// Duplicates are kept and probed independently. A readable file with no
/// usable lines yields an empty list, not an error.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>, ScanError> {
    let content = fs::read_to_string(path).map_err(|source| ScanError::Wordlist {
        path: path.to_path_buf(),
        source,
    })?;

    let paths = parse_lines(&content);
    if paths.is_empty() {
        tracing::warn!(path = %path.display(), "wordlist contains no paths, nothing to scan");
    }

    Ok(paths)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|path| !path.is_empty())
        .collect()
}
