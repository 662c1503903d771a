use std::io::Write;

use serial_test::serial;

use super::*;

fn write_toml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// Config::load reads CLUSTER_ENV_VAR/THREADS_ENV_VAR from the process
// environment, so every test here runs under the same `#[serial]` group as
// the test that mutates them, or it can observe that test's values.
#[test]
#[serial(config_env)]
fn missing_cluster_anywhere_is_an_invalid_argument_error() {
    let err = Config::load(None, &[]).unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidArgument(_)));
}

#[test]
#[serial(config_env)]
fn file_alone_supplies_cluster_and_threads() {
    let file = write_toml("cluster = \"site-b\"\nthreads = 8\n");
    let config = Config::load(Some(file.path()), &[]).unwrap();
    assert_eq!(config.cluster, "site-b");
    assert_eq!(config.threads, 8);
    assert!(!config.rbd_cache);
}

#[test]
#[serial(config_env)]
fn threads_defaults_when_nothing_supplies_it() {
    let file = write_toml("cluster = \"site-b\"\n");
    let config = Config::load(Some(file.path()), &[]).unwrap();
    assert_eq!(config.threads, DEFAULT_THREADS);
}

#[test]
#[serial(config_env)]
fn extra_args_override_the_file() {
    let file = write_toml("cluster = \"site-b\"\nthreads = 8\n");
    let extra_args = vec!["--cluster".to_string(), "site-c".to_string(), "--threads".to_string(), "2".to_string()];
    let config = Config::load(Some(file.path()), &extra_args).unwrap();
    assert_eq!(config.cluster, "site-c");
    assert_eq!(config.threads, 2);
}

#[test]
#[serial(config_env)]
fn malformed_toml_is_a_config_parse_error() {
    let file = write_toml("cluster = \n");
    let err = Config::load(Some(file.path()), &[]).unwrap_err();
    assert!(matches!(err, LifecycleError::ConfigParse(_)));
}

#[test]
#[serial(config_env)]
fn unrecognized_extra_arg_is_an_invalid_argument_error() {
    let extra_args = vec!["--not-a-real-flag".to_string()];
    let err = Config::load(None, &extra_args).unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidArgument(_)));
}

#[test]
#[serial(config_env)]
fn missing_config_file_surfaces_as_io_error() {
    let err = Config::load(Some(std::path::Path::new("/nonexistent/rbd-mirror-peer.toml")), &[]).unwrap_err();
    assert!(matches!(err, LifecycleError::Io(_)));
}

/// Exercises the full precedence chain (file < environment < extra_args)
/// in one test so the three env-var mutations never race another test's.
#[test]
#[serial(config_env)]
fn environment_overrides_file_and_extra_args_override_environment() {
    let file = write_toml("cluster = \"site-b\"\nthreads = 8\n");

    std::env::set_var(CLUSTER_ENV_VAR, "site-env");
    std::env::set_var(THREADS_ENV_VAR, "16");

    let env_only = Config::load(Some(file.path()), &[]).unwrap();
    assert_eq!(env_only.cluster, "site-env");
    assert_eq!(env_only.threads, 16);

    let extra_args = vec!["--cluster".to_string(), "site-c".to_string()];
    let with_extra_args = Config::load(Some(file.path()), &extra_args).unwrap();
    assert_eq!(with_extra_args.cluster, "site-c");
    assert_eq!(with_extra_args.threads, 16);

    std::env::remove_var(CLUSTER_ENV_VAR);
    std::env::remove_var(THREADS_ENV_VAR);
}
