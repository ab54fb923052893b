// ABOUTME: Integration tests for configuration parsing and discovery.
// ABOUTME: Tests YAML parsing, env references and credential resolution.

use depotpush::config::{Config, EnvValue, UploadFailurePolicy};
use depotpush::deploy::DEFAULT_LOCK_STALE_AFTER;
use depotpush::error::Error;
use depotpush::types::{AppId, DepotSlot};

mod parsing {
    use super::*;

    /// Test: a minimal config gets every default.
    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_yaml("app_id: 480\n").unwrap();

        assert_eq!(config.app_id, Some(AppId::new(480)));
        assert_eq!(config.root_path, ".");
        assert!(config.depots.is_empty());
        assert!(config.check_paths);
        assert!(config.preflight);
        assert_eq!(config.on_upload_failure, UploadFailurePolicy::Fail);
        assert_eq!(config.exclusions.len(), 3);
        assert_eq!(config.lock_stale_after, DEFAULT_LOCK_STALE_AFTER);
        assert!(config.credentials.is_empty());
    }

    /// Test: full config with depots, policy and env-backed credentials.
    #[test]
    fn full_config() {
        let yaml = r#"
app_id: "1000"
root_path: dist
description: nightly build
release_branch: beta
depots:
  1: linux
  4: windows
exclusions:
  - "*.map"
check_paths: false
steam_dir: /opt/steamcmd
preflight: false
on_upload_failure: tolerate
lock_stale_after: 6h
credentials:
  username: builder
  password:
    env: STEAM_PASSWORD
  sentry_file_name:
    env: STEAM_SSFN
    default: ssfn0000
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.app_id, Some(AppId::new(1000)));
        assert_eq!(config.root_path, "dist");
        assert_eq!(config.description.as_deref(), Some("nightly build"));
        assert_eq!(config.release_branch.as_deref(), Some("beta"));
        assert_eq!(
            config.depots.iter().collect::<Vec<_>>(),
            vec![
                (DepotSlot::new(1).unwrap(), "linux"),
                (DepotSlot::new(4).unwrap(), "windows"),
            ]
        );
        assert_eq!(config.exclusions, vec!["*.map".to_string()]);
        assert!(!config.check_paths);
        assert_eq!(
            config.steam_dir.as_deref(),
            Some(std::path::Path::new("/opt/steamcmd"))
        );
        assert!(!config.preflight);
        assert_eq!(config.on_upload_failure, UploadFailurePolicy::Tolerate);
        assert_eq!(
            config.lock_stale_after,
            std::time::Duration::from_secs(6 * 60 * 60)
        );
        assert_eq!(
            config.credentials.username,
            Some(EnvValue::Literal("builder".to_string()))
        );
        assert_eq!(
            config.credentials.password,
            Some(EnvValue::FromEnv {
                var: "STEAM_PASSWORD".to_string(),
                default: None,
            })
        );
    }

    /// Test: depot slots outside 1..=9 are rejected at parse time.
    #[test]
    fn rejects_out_of_range_slot() {
        let err = Config::from_yaml("depots:\n  10: linux\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    /// Test: an unknown failure policy is a parse error.
    #[test]
    fn rejects_unknown_policy() {
        assert!(Config::from_yaml("on_upload_failure: ignore\n").is_err());
    }

    /// Test: a missing app ID is reported by name.
    #[test]
    fn app_id_is_required_for_requests() {
        let config = Config::from_yaml("depots:\n  1: linux\n").unwrap();
        let err = config.app_id().unwrap_err();
        assert!(matches!(err, Error::MissingInput(ref name) if name == "appId"));
    }

    /// Test: padded paths in the file are trimmed like action inputs.
    #[test]
    fn file_paths_are_trimmed() {
        let yaml = "app_id: 480\nroot_path: \" . \"\ndepots:\n  1: \" build/linux \"\n  2: \"   \"\n";
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(
            config.depots.iter().collect::<Vec<_>>(),
            vec![(DepotSlot::new(1).unwrap(), "build/linux")]
        );
        let request = config.manifest_request().unwrap();
        assert_eq!(request.content_root, ".");
    }

    /// Test: blank description and branch are dropped from the request.
    #[test]
    fn blank_optional_fields_are_omitted() {
        let config =
            Config::from_yaml("app_id: 480\ndescription: \"\"\nrelease_branch: \"  \"\n").unwrap();
        let request = config.manifest_request().unwrap();
        assert_eq!(request.description, None);
        assert_eq!(request.release_branch, None);
    }
}

mod discovery {
    use super::*;

    /// Test: depotpush.yml is found in the directory.
    #[test]
    fn discovers_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("depotpush.yml"), "app_id: 7\n").unwrap();

        let config = Config::discover(dir.path()).unwrap().unwrap();
        assert_eq!(config.app_id, Some(AppId::new(7)));
    }

    /// Test: the nested .depotpush/config.yml location works too.
    #[test]
    fn discovers_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".depotpush")).unwrap();
        std::fs::write(dir.path().join(".depotpush/config.yml"), "app_id: 8\n").unwrap();

        let config = Config::discover(dir.path()).unwrap().unwrap();
        assert_eq!(config.app_id, Some(AppId::new(8)));
    }

    /// Test: no file means no config, not an error.
    #[test]
    fn nothing_to_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::discover(dir.path()).unwrap().is_none());
    }

    /// Test: an explicit path that does not exist is ConfigNotFound.
    #[test]
    fn explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_required(&dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }
}

mod env_vars {
    use super::*;

    /// Test: env references resolve from the process environment.
    #[test]
    fn resolves_env_reference() {
        let value = EnvValue::FromEnv {
            var: "DEPOTPUSH_TEST_USER".to_string(),
            default: None,
        };
        temp_env::with_var("DEPOTPUSH_TEST_USER", Some("ci-bot"), || {
            assert_eq!(value.resolve().unwrap(), "ci-bot");
        });
    }

    /// Test: an empty variable falls back to the default.
    #[test]
    fn empty_env_uses_default() {
        let value = EnvValue::FromEnv {
            var: "DEPOTPUSH_TEST_EMPTY".to_string(),
            default: Some("fallback".to_string()),
        };
        temp_env::with_var("DEPOTPUSH_TEST_EMPTY", Some(""), || {
            assert_eq!(value.resolve().unwrap(), "fallback");
        });
    }

    /// Test: an unset variable without default names the variable.
    #[test]
    fn unset_env_without_default() {
        let value = EnvValue::FromEnv {
            var: "DEPOTPUSH_TEST_UNSET".to_string(),
            default: None,
        };
        temp_env::with_var_unset("DEPOTPUSH_TEST_UNSET", || {
            let err = value.resolve().unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(ref v) if v == "DEPOTPUSH_TEST_UNSET"));
        });
    }

    /// Test: credentials from YAML resolve and decode end to end.
    #[test]
    fn credentials_resolve_from_env() {
        let yaml = r#"
credentials:
  username: builder
  password:
    env: DEPOTPUSH_TEST_PASSWORD
  config_vdf:
    env: DEPOTPUSH_TEST_CONFIG_VDF
  sentry_file_name: ssfn42
  sentry_file_contents: AAEC
"#;
        let config = Config::from_yaml(yaml).unwrap();
        temp_env::with_vars(
            [
                ("DEPOTPUSH_TEST_PASSWORD", Some("hunter2")),
                ("DEPOTPUSH_TEST_CONFIG_VDF", Some("Y29uZmln")),
            ],
            || {
                let bundle = config.credentials.resolve().unwrap();
                assert_eq!(bundle.password, "hunter2");
                assert_eq!(bundle.session_config, b"config");
                assert_eq!(bundle.sentry_file, vec![0, 1, 2]);
            },
        );
    }

    /// Test: a missing credential is reported under its input name.
    #[test]
    fn missing_credential_is_named() {
        let config = Config::from_yaml("credentials:\n  username: builder\n").unwrap();
        let err = config.credentials.resolve().unwrap_err();
        assert!(matches!(err, Error::MissingInput(ref name) if name == "password"));
    }
}
