// Build-time identity, reported by GET /version

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `name/version`, served on GET / and logged at startup.
pub fn banner() -> String {
    format!("{NAME}/{VERSION}")
}
