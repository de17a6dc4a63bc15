//! Integration tests for Settings::load with an explicit config file.
//!
//! Note: a global config on the test machine is applied first; every
//! assertion here is about a key the explicit file sets.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use treedraw::application::ApplicationError;
use treedraw::config::Settings;

#[test]
fn given_explicit_config_when_load_then_its_values_win() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("treedraw.toml");
    fs::write(
        &config_path,
        r#"
data_file = "/srv/trees/main.json"
random_tree_size = 7
default_root_value = "start"
show_ids = false
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&config_path)).expect("load settings");

    assert_eq!(settings.data_file, PathBuf::from("/srv/trees/main.json"));
    assert_eq!(settings.random_tree_size, 7);
    assert_eq!(settings.default_root_value, "start");
    assert!(!settings.show_ids);
}

#[test]
fn given_env_var_in_data_file_when_load_then_expands_it() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("treedraw.toml");
    fs::write(&config_path, "data_file = \"$HOME/trees/tree.json\"\n").unwrap();

    let settings = Settings::load(Some(&config_path)).unwrap();

    let home = std::env::var("HOME").expect("HOME should be set");
    assert_eq!(
        settings.data_file,
        PathBuf::from(format!("{home}/trees/tree.json"))
    );
}

#[test]
fn given_missing_config_file_when_load_then_errors() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load(Some(&temp.path().join("nope.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_errors() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("treedraw.toml");
    fs::write(&config_path, "random_tree_size = \"many\"\n").unwrap();

    let result = Settings::load(Some(&config_path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_zero_random_size_when_load_then_rejects_config() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("treedraw.toml");
    fs::write(&config_path, "random_tree_size = 0\n").unwrap();

    let result = Settings::load(Some(&config_path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}
