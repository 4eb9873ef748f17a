// AppConfig::load lookup order: CONFIG_FILE, then ./hostmetrics.toml, then defaults.
// Kept as a single test in its own binary: it mutates the process environment and working directory.

use hostmetrics::config::{AppConfig, DEFAULT_CONFIG_FILE};
use std::io::Write;

fn set_config_file(value: Option<&std::path::Path>) {
    // SAFETY: this binary runs a single test, so no other thread reads the environment concurrently.
    unsafe {
        match value {
            Some(path) => std::env::set_var("CONFIG_FILE", path),
            None => std::env::remove_var("CONFIG_FILE"),
        }
    }
}

#[test]
fn test_config_load_lookup_order() {
    let dir = tempfile::TempDir::new().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    // No CONFIG_FILE, no file in the working directory: built-in defaults.
    set_config_file(None);
    let config = AppConfig::load().expect("defaults");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.sampling.command_timeout_ms, 2000);

    // hostmetrics.toml in the working directory is picked up.
    std::fs::write(
        dir.path().join(DEFAULT_CONFIG_FILE),
        "[sampling]\ncommand_timeout_ms = 750\n",
    )
    .unwrap();
    let config = AppConfig::load().expect("working-directory config");
    assert_eq!(config.sampling.command_timeout_ms, 750);

    // CONFIG_FILE wins over the working-directory file.
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"[server]\nport = 9090\n[sampling]\ncpu_metric = \"load_average\"\n")
        .unwrap();
    set_config_file(Some(file.path()));
    let config = AppConfig::load().expect("CONFIG_FILE config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.sampling.command_timeout_ms, 2000);

    // CONFIG_FILE pointing at a missing file is an error, not a silent fallback.
    let missing = dir.path().join("missing.toml");
    set_config_file(Some(&missing));
    let err = AppConfig::load().unwrap_err();
    assert!(err.to_string().contains("missing.toml"));

    // An invalid file named by CONFIG_FILE fails validation.
    let mut bad = tempfile::NamedTempFile::new().unwrap();
    bad.write_all(b"[server]\nport = 0\n").unwrap();
    set_config_file(Some(bad.path()));
    let err = AppConfig::load().unwrap_err();
    assert!(err.to_string().contains("server.port"));

    set_config_file(None);
}
