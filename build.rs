//! Embeds `JAT_DASH_BUILD_GIT_HASH` and `JAT_DASH_BUILD_TIMESTAMP`.
//!
//! Both can be pinned from the environment (packagers, CI). Otherwise the
//! commit comes from `git describe` and the timestamp from
//! `SOURCE_DATE_EPOCH` or the current time. Missing git yields `unknown`.

use chrono::{DateTime, SecondsFormat, Utc};
use std::env;
use std::process::Command;

const HASH_VAR: &str = "JAT_DASH_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "JAT_DASH_BUILD_TIMESTAMP";

fn main() {
    for var in [HASH_VAR, TIMESTAMP_VAR, "SOURCE_DATE_EPOCH"] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    watch_git_head();

    let commit = env::var(HASH_VAR)
        .ok()
        .or_else(describe_commit)
        .unwrap_or_else(|| "unknown".to_string());
    let built = env::var(TIMESTAMP_VAR).unwrap_or_else(|_| build_time());

    println!("cargo:rustc-env={HASH_VAR}={commit}");
    println!("cargo:rustc-env={TIMESTAMP_VAR}={built}");
}

/// Rebuild when HEAD moves, including commits on the checked-out branch.
fn watch_git_head() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    if let Ok(head) = std::fs::read_to_string(".git/HEAD") {
        if let Some(branch_ref) = head.trim().strip_prefix("ref: ") {
            println!("cargo:rerun-if-changed=.git/{branch_ref}");
        }
    }
}

fn describe_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=12"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string()).filter(|s| !s.is_empty())
}

fn build_time() -> String {
    let pinned = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    pinned
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
