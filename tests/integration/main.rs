//! Integration tests for sheetdash
//!
//! Every test points `--config` into a fresh temp dir. Local discovery is
//! disabled except in tests that exercise `.sheetdash.toml`, which then run
//! from the temp dir. None of these touch the network.

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        /// Command that also picks up `.sheetdash.toml` from the sandbox dir
        fn cmd_with_local(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("sheetdash");
            cmd.current_dir(self.dir.path())
                .env_remove("SHEETDASH_CONFIG")
                .env_remove("RUST_LOG")
                .arg("--config")
                .arg(self.dir.path().join("config.toml"));
            cmd
        }

        fn cmd(&self) -> Command {
            let mut cmd = self.cmd_with_local();
            cmd.arg("--no-local");
            cmd
        }
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("sheetdash")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("view").and(predicate::str::contains("browse")));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("sheetdash")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("sheetdash"));
    }

    #[test]
    fn url_for_leads_is_configured_link() {
        Sandbox::new()
            .cmd()
            .args(["url", "leads", "--country", "Mexico", "--intern", "Intern 1"])
            .assert()
            .success()
            .stdout(
                "https://docs.google.com/spreadsheets/d/1nALlHhcBTFGqhHEOgxc2vLg6Wq7kr4n7EFeDeC9M3ho/gviz/tq?tqx=out:csv&sheet=Data%20Sheet\n",
            );
    }

    #[test]
    fn url_for_leads_defaults_intern() {
        Sandbox::new()
            .cmd()
            .args(["url", "leads", "-C", "india"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "1aEsnXfmDTg4XVIPQ4HdGZqjfg1jO-WtyC2nW67qqkuU",
            ));
    }

    #[test]
    fn url_for_sales_names_month_tab() {
        Sandbox::new()
            .cmd()
            .args(["url", "sales", "--month", "march"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1LezlwNw1tj2DyRUBHZeTVHagczE_-gJKZ45PLpGvf0w"))
            .stdout(predicate::str::contains("sheet=March"));
    }

    #[test]
    fn url_for_conversations() {
        Sandbox::new()
            .cmd()
            .args(["url", "conversations", "-C", "India", "-m", "June"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1hHZCqXmQP-yd7X-WjJBWKCY2s-YENLj2dYtFXNWjOq4"))
            .stdout(predicate::str::contains("sheet=June"));
    }

    #[test]
    fn url_missing_month_fails() {
        Sandbox::new()
            .cmd()
            .args(["url", "sales"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No month selected"));
    }

    #[test]
    fn view_unknown_country_fails_before_fetching() {
        Sandbox::new()
            .cmd()
            .args(["view", "leads", "--country", "Brazil"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Could not load lead data: Unknown country: Brazil",
            ))
            .stderr(predicate::str::contains("sheetdash sources"));
    }

    #[test]
    fn view_unknown_month_fails() {
        Sandbox::new()
            .cmd()
            .args(["view", "sales", "--month", "Smarch"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown month: Smarch"));
    }

    #[test]
    fn sources_lists_countries() {
        Sandbox::new()
            .cmd()
            .args(["sources", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Leads\tMexico\tIntern 1"))
            .stdout(predicate::str::contains("Campaign Conversation\tIndia"));
    }

    #[test]
    fn sources_json() {
        let output = Sandbox::new()
            .cmd()
            .args(["sources", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(doc["leads"]["Mexico"][0], "Intern 1");
        assert_eq!(doc["months"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn browse_refuses_non_interactive() {
        Sandbox::new()
            .cmd()
            .arg("browse")
            .assert()
            .failure()
            .stderr(predicate::str::contains("interactive terminal"));
    }

    #[test]
    fn config_path() {
        Sandbox::new()
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        Sandbox::new()
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("ttl_secs = 3600"));
    }

    #[test]
    fn config_set_then_show() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "set", "cache.ttl_secs", "60"])
            .assert()
            .success();

        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ttl_secs = 60"));
    }

    #[test]
    fn config_set_adds_country() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "set", "sources.conversations.Peru", "peru-sheet"])
            .assert()
            .success();

        sandbox
            .cmd()
            .args(["url", "conversations", "-C", "Peru", "-m", "May"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/d/peru-sheet/"));
    }

    #[test]
    fn local_country_keeps_builtin_countries() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd_with_local()
            .args(["config", "set", "sources.conversations.Peru", "peru-sheet", "--local"])
            .assert()
            .success();

        sandbox
            .cmd_with_local()
            .args(["url", "conversations", "-C", "Mexico", "-m", "May"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1-INGrynbGU7IBLXggsoH9eFvAwgXPjPcFT_OOCPlgJA"));

        sandbox
            .cmd_with_local()
            .args(["url", "conversations", "-C", "Peru", "-m", "May"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/d/peru-sheet/"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        Sandbox::new()
            .cmd()
            .args(["config", "set", "cache.nope", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn invalid_config_reported() {
        let sandbox = Sandbox::new();
        std::fs::write(sandbox.dir.path().join("config.toml"), "[cache]\nttl_secs = \"soon\"\n")
            .unwrap();

        sandbox
            .cmd()
            .arg("sources")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn completions_generate() {
        cargo_bin_cmd!("sheetdash")
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("sheetdash"));
    }
}
