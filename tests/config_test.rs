//! Integration tests for Settings config loading.
//!
//! These tests run without a global config (temp directories only).

use std::fs;

use tempfile::TempDir;

use mlmsim::application::ApplicationError;
use mlmsim::config::{local_config_path, Settings};

#[test]
fn given_project_config_when_load_then_overrides_defaults() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
default_tier = "Master"
bv_per_affiliate = 150.0
daily_cap = 300.0
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.default_tier, "Master");
    assert_eq!(settings.bv_per_affiliate, 150.0);
    assert_eq!(settings.daily_cap, Some(300.0));
    assert_eq!(settings.generations, 3, "unspecified keys keep defaults");
}

#[test]
fn given_no_project_config_when_load_then_defaults() {
    let project = TempDir::new().unwrap();
    let settings = Settings::load(Some(project.path())).expect("load settings");
    assert_eq!(settings.bv_per_affiliate, Settings::default().bv_per_affiliate);
}

#[test]
fn given_malformed_toml_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "generations = [").unwrap();

    let result = Settings::load(Some(project.path()));
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_values_when_load_file_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "generations = 9\n").unwrap();

    let err = Settings::load_file(&path).unwrap_err();
    assert!(err.to_string().contains("max_generations"), "{err}");
}

#[test]
fn given_raised_bound_when_load_file_then_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "generations = 9\nmax_generations = 10\n").unwrap();

    let settings = Settings::load_file(&path).unwrap();
    assert_eq!(settings.generations, 9);
    assert_eq!(settings.max_generations, 10);
}

#[test]
fn given_missing_file_when_load_file_then_config_error() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_prefixed_env_vars_when_load_then_override_files() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "other_gen_count = 2\n").unwrap();

    // Keys not asserted elsewhere in this binary; tests share the process env.
    std::env::set_var("MLMSIM_OTHER_GEN_COUNT", "4");
    std::env::set_var("MLMSIM_MAX_GENERATIONS", "8");
    let result = Settings::load(Some(project.path()));
    std::env::remove_var("MLMSIM_OTHER_GEN_COUNT");
    std::env::remove_var("MLMSIM_MAX_GENERATIONS");

    let settings = result.expect("load settings");
    assert_eq!(settings.other_gen_count, 4);
    assert_eq!(settings.max_generations, 8);
}
