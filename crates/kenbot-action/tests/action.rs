//! End-to-end runs of the kenbot-action binary against a pre-populated tool cache.
#![cfg(unix)]
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use kenbot_action_core::Platform;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VERSION: &str = "2.8.7";

struct Runner {
    dir: TempDir,
}

impl Runner {
    /// Runner whose tool cache already holds a Kenbot script with the given body.
    fn with_cached_kenbot(script: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let arch = Platform::current().arch;
        let version_dir = dir.path().join("cache").join("kenbot").join(VERSION);
        let tool_dir = version_dir.join(&arch);
        std::fs::create_dir_all(&tool_dir).unwrap();
        std::fs::write(version_dir.join(format!("{arch}.complete")), "").unwrap();

        let executable = tool_dir.join("kenbot");
        std::fs::write(&executable, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&executable, std::fs::Permissions::from_mode(0o755)).unwrap();

        std::fs::create_dir_all(dir.path().join("temp")).unwrap();
        std::fs::create_dir_all(dir.path().join("workspace")).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self, event: &str) -> Command {
        let mut cmd = Command::cargo_bin("kenbot-action").unwrap();
        cmd.env_clear()
            .env("PATH", std::env::var_os("PATH").unwrap_or_default())
            .env("INPUT_VERSION", VERSION)
            .env("RUNNER_TOOL_CACHE", self.path("cache"))
            .env("RUNNER_TEMP", self.path("temp"))
            .env("GITHUB_ENV", self.path("github_env"))
            .env("GITHUB_PATH", self.path("github_path"))
            .env("GITHUB_WORKSPACE", self.path("workspace"))
            .env("GITHUB_EVENT_NAME", event)
            .env("GITHUB_REPOSITORY", "acme/widgets")
            .env("GITHUB_REPOSITORY_OWNER", "acme")
            .env("GITHUB_REF", "refs/pull/12/merge")
            .env("KENBOT_ACTION_LOG_LEVEL", "error");
        cmd
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn pull_request_runs_scan_pull_request() {
    let runner = Runner::with_cached_kenbot(
        r#"echo "kenbot $1 base=$KS_GIT_BASE_BRANCH repo=$KS_GIT_REPO pr=$KS_GIT_PULL_REQUEST_ID""#,
    );

    runner
        .command("pull_request")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("::group::Kenbot\n"))
        .stdout(predicate::str::contains(
            "kenbot scan-pull-request base=refs/pull/12/merge repo=widgets pr=12",
        ))
        .stdout(predicate::str::ends_with("::endgroup::\n"));

    let github_env = read(&runner.path("github_env"));
    assert!(github_env.contains("KS_GIT_PROVIDER<<ghadelimiter_"));
    assert!(github_env.contains("KS_GIT_BASE_BRANCH<<ghadelimiter_"));
    let github_path = read(&runner.path("github_path"));
    assert!(github_path.contains(&format!("kenbot/{VERSION}/")));
}

#[test]
fn push_uses_configured_base_branch() {
    let runner = Runner::with_cached_kenbot(r#"echo "kenbot $1 base=$KS_GIT_BASE_BRANCH""#);

    runner
        .command("push")
        .env("KS_GIT_BASE_BRANCH", "main")
        .assert()
        .success()
        .stdout(predicate::str::contains("kenbot scan-repository base=main"));

    assert!(!read(&runner.path("github_env")).contains("KS_GIT_BASE_BRANCH"));
}

#[test]
fn unsupported_event_fails() {
    let runner = Runner::with_cached_kenbot(r#"echo "should not run""#);

    runner
        .command("deployment")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "::error::deployment event is not supported by Kenbot",
        ))
        .stdout(predicate::str::contains("should not run").not());
}

#[test]
fn non_zero_exit_code_fails() {
    let runner = Runner::with_cached_kenbot("exit 3");

    runner
        .command("schedule")
        .env("KS_GIT_BASE_BRANCH", "main")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("::error::Kenbot exited with exit code 3"));
}

#[test]
fn private_repository_requires_platform_url() {
    let runner = Runner::with_cached_kenbot("exit 0");

    runner
        .command("push")
        .env("INPUT_VERSION", "latest")
        .env("KS_RELEASES_REPO", "kenbot-remote")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "::error::Failed while downloading Kenbot from Artifactory, KS_URL must be set",
        ));
}

#[test]
fn secrets_are_masked() {
    let runner = Runner::with_cached_kenbot("exit 0");

    runner
        .command("push")
        .env("KS_GIT_BASE_BRANCH", "main")
        .env("KS_ACCESS_TOKEN", "s3cr3t-token")
        .assert()
        .success()
        .stdout(predicate::str::contains("::add-mask::s3cr3t-token\n"));
}
