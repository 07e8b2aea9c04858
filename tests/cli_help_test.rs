#[cfg(test)]
mod cli_help_tests {
    use assert_cmd::prelude::*;
    use predicates::prelude::*;
    use std::process::Command;
    use tempfile::TempDir;

    /// The binary with an empty home and configuration directory.
    fn cloud(home: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("cloud").unwrap();
        cmd.env("HOME", home.path())
            .env("CLOUD_CLI_CONFIG_DIR", home.path())
            .env_remove("CLOUD_ORG")
            .env_remove("CLOUD_ENV")
            .env_remove("CLOUD_TOKEN")
            .env_remove("CLOUD_API_DOMAIN")
            .env_remove("CLOUD_FORMAT")
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn test_cli_help_output() {
        let home = TempDir::new().unwrap();
        let assert_result = cloud(&home).arg("--help").assert().success();
        let output = assert_result.get_output();
        let help_output = String::from_utf8_lossy(&output.stdout);

        assert!(help_output.contains("Usage:"));
        assert!(help_output.contains("Options:"));
        assert!(help_output.contains("Commands:"));

        for group in ["organization", "environment", "asset", "datastore", "network", "connection", "config"] {
            assert!(help_output.contains(group), "missing '{}' in help", group);
        }

        for option in ["--org", "--env", "--token", "--api-domain", "--auth-domain", "--format", "--debug"] {
            assert!(help_output.contains(option), "missing '{}' in help", option);
        }

        assert!(help_output.contains("-h, --help"));
        assert!(help_output.contains("-V, --version"));
    }

    #[test]
    fn test_cli_subcommand_help_outputs() {
        let home = TempDir::new().unwrap();
        let expectations = [
            ("organization", vec!["create", "list", "show"]),
            ("environment", vec!["create", "destroy", "list"]),
            ("asset", vec!["create", "destroy", "list", "describe", "bundle"]),
            ("datastore", vec!["create", "describe", "destroy", "list"]),
            ("network", vec!["create", "describe", "destroy", "list"]),
            ("connection", vec!["create"]),
            ("config", vec!["path", "show", "set"]),
        ];

        for (subcommand, operations) in expectations {
            let assert_result = cloud(&home).arg(subcommand).arg("--help").assert().success();
            let output = assert_result.get_output();
            let help_output = String::from_utf8_lossy(&output.stdout);

            assert!(help_output.contains("Usage:"));
            for operation in operations {
                assert!(
                    help_output.contains(operation),
                    "missing '{}' in help for '{}'",
                    operation,
                    subcommand
                );
            }
        }
    }

    #[test]
    fn test_asset_create_help_lists_its_flags() {
        let home = TempDir::new().unwrap();
        cloud(&home)
            .args(["asset", "create", "--help"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("--vpc-name")
                    .and(predicate::str::contains("--asset-type"))
                    .and(predicate::str::contains("--engine-version"))
                    .and(predicate::str::contains("--asset-name")),
            );
    }

    #[test]
    fn test_aliases_are_accepted() {
        let home = TempDir::new().unwrap();
        for alias in ["org", "o", "env", "e", "a", "ds", "db", "database", "rds", "vpc", "v", "conn", "c"] {
            cloud(&home).args([alias, "--help"]).assert().success();
        }
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let home = TempDir::new().unwrap();
        cloud(&home)
            .args(["org", "list", "--format", "xml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid value"));
    }

    #[test]
    fn test_organization_create_needs_an_org_id() {
        let home = TempDir::new().unwrap();
        cloud(&home)
            .args(["org", "create", "Acme", "--token", "t"])
            .assert()
            .code(64)
            .stderr(predicate::str::contains("Missing required argument: --org"));
    }

    #[test]
    fn test_unreachable_api_fails_while_loading_options() {
        let home = TempDir::new().unwrap();
        cloud(&home)
            .args(["env", "list", "--token", "t", "--api-domain", "http://127.0.0.1:9"])
            .assert()
            .code(101)
            .stderr(predicate::str::contains("Network error"));
    }

    #[test]
    fn test_config_set_then_show() {
        let home = TempDir::new().unwrap();
        cloud(&home)
            .args(["config", "set", "--org", "o1", "--env", "e1"])
            .assert()
            .success();

        cloud(&home)
            .args(["config", "show", "--format", "csv"])
            .assert()
            .success()
            .stdout(predicate::str::contains("org,o1").and(predicate::str::contains("env,e1")));

        cloud(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.yml"));
    }
}
