//! End-to-end tests for the dispatcher and the commands it runs.
//!
//! Commands run against a recording toolchain, so no bundler or server is
//! involved. The dispatcher touches `NODE_ENV`, hence `#[serial]`.

mod support;

use std::sync::Arc;

use nuxt_cli::run::run_with;
use nuxt_cli::toolchain::HookArgs;
use nuxt_cli::{CliError, Framework, Outcome};
use serde_json::json;
use serial_test::serial;
use support::{BuildBehavior, RecordingToolchain};

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[tokio::test]
#[serial]
async fn test_build_no_generate_runs_builder_and_exits() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({ "mode": "spa" })));

    let outcome = run_with(toolchain.clone(), args(&["build", "--no-generate"])).await;

    assert_eq!(outcome.exit_code(), Some(0));
    assert_eq!(
        toolchain.log.events(),
        vec!["load_config", "core", "hook:error", "builder", "build"]
    );
    assert_eq!(toolchain.options().get("dev"), Some(&json!(false)));
}

#[tokio::test]
#[serial]
async fn test_build_universal_skips_generator() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["build"])).await;

    assert_eq!(outcome.exit_code(), Some(0));
    assert!(toolchain.log.contains("build"));
    assert!(!toolchain.log.contains("generator"));
}

#[tokio::test]
#[serial]
async fn test_build_spa_generates_with_build() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["build", "--spa"])).await;

    assert_eq!(outcome.exit_code(), Some(0));
    assert_eq!(
        toolchain.log.events(),
        vec![
            "load_config",
            "core",
            "hook:error",
            "generator",
            "builder",
            "generate:build=true",
            "build"
        ]
    );
    assert_eq!(toolchain.options().get("mode"), Some(&json!("spa")));
}

#[tokio::test]
#[serial]
async fn test_quiet_build_does_not_silence_later_runs() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["build", "-q"])).await;

    assert_eq!(outcome.exit_code(), Some(0));
    assert_eq!(
        toolchain.options().get("build"),
        Some(&json!({ "quiet": true }))
    );
    assert!(!nuxt_cli::ui::is_quiet());
}

#[tokio::test]
#[serial]
async fn test_build_analyze_keeps_process_alive() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["build", "-a"])).await;

    assert!(outcome.is_stay());
    assert_eq!(
        toolchain.options().get("build"),
        Some(&json!({ "analyze": true }))
    );
}

#[tokio::test]
#[serial]
async fn test_analyzer_object_config_also_stays() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({
        "build": { "analyze": { "analyzerMode": "static" } }
    })));

    let outcome = run_with(toolchain.clone(), args(&["build"])).await;
    assert!(outcome.is_stay());
}

#[tokio::test]
#[serial]
async fn test_stay_outcome_surfaces_later_error_events() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["build", "--analyze"])).await;
    let Outcome::Stay(mut watch) = outcome else {
        panic!("expected the process to stay alive");
    };

    let nuxt = toolchain.last_nuxt.lock().clone().unwrap();
    nuxt.call_hook(
        "error",
        &HookArgs::Error(&CliError::Custom("analyzer crashed".into())),
    );
    let err = watch.next_fatal().await.unwrap();
    assert!(err.to_string().contains("analyzer crashed"));
}

#[tokio::test]
#[serial]
async fn test_error_event_during_build_is_fatal() {
    let toolchain = Arc::new(
        RecordingToolchain::new(json!({})).with_behavior(BuildBehavior::EmitErrorAndHang),
    );

    let outcome = run_with(toolchain.clone(), args(&["build"])).await;

    assert_eq!(outcome.exit_code(), Some(1));
    assert!(toolchain.log.contains("build"));
}

#[tokio::test]
#[serial]
async fn test_builder_failure_is_fatal() {
    let toolchain =
        Arc::new(RecordingToolchain::new(json!({})).with_behavior(BuildBehavior::Fail));

    let outcome = run_with(toolchain.clone(), args(&["build"])).await;
    assert_eq!(outcome.exit_code(), Some(1));
}

#[tokio::test]
#[serial]
async fn test_help_exits_before_loading_config() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["build", "--help"])).await;

    assert_eq!(outcome.exit_code(), Some(0));
    assert!(toolchain.log.events().is_empty());
}

#[tokio::test]
#[serial]
async fn test_version_wins_over_help() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["generate", "-h", "-v"])).await;

    assert_eq!(outcome.exit_code(), Some(0));
    assert!(toolchain.log.events().is_empty());
}

#[tokio::test]
#[serial]
async fn test_unknown_flag_is_fatal() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["build", "--frobnicate"])).await;

    assert_eq!(outcome.exit_code(), Some(1));
    assert!(toolchain.log.events().is_empty());
}

#[tokio::test]
#[serial]
async fn test_no_arguments_selects_dev() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), Vec::new()).await;

    assert!(outcome.is_stay());
    assert_eq!(
        toolchain.log.events(),
        vec!["load_config", "core", "hook:error", "builder", "build", "listen"]
    );
    assert_eq!(toolchain.options().get("dev"), Some(&json!(true)));
}

#[tokio::test]
#[serial]
async fn test_unrecognized_first_token_goes_to_dev() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["my-app", "-p", "4000"])).await;

    assert!(outcome.is_stay());
    assert_eq!(
        toolchain.options().get("server"),
        Some(&json!({ "port": 4000 }))
    );
}

#[tokio::test]
#[serial]
async fn test_generate_without_build() {
    let toolchain = Arc::new(RecordingToolchain::new(json!({})));

    let outcome = run_with(toolchain.clone(), args(&["generate", "--no-build"])).await;

    assert_eq!(outcome.exit_code(), Some(0));
    assert!(toolchain.log.contains("generate:build=false"));
    assert!(!toolchain.log.contains("build"));
}

#[tokio::test]
#[serial]
async fn test_start_requires_build_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let toolchain = Arc::new(RecordingToolchain::new(json!({
        "rootDir": dir.path().to_string_lossy()
    })));

    let outcome = run_with(toolchain.clone(), args(&["start"])).await;

    assert_eq!(outcome.exit_code(), Some(1));
    assert!(!toolchain.log.contains("listen"));
}

#[tokio::test]
#[serial]
async fn test_start_serves_existing_build() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".nuxt").join("dist")).unwrap();
    let toolchain = Arc::new(RecordingToolchain::new(json!({
        "rootDir": dir.path().to_string_lossy()
    })));

    let outcome = run_with(toolchain.clone(), args(&["start", "-H", "0.0.0.0"])).await;

    assert!(outcome.is_stay());
    assert!(toolchain.log.contains("listen"));
    assert_eq!(
        toolchain.options().get("server"),
        Some(&json!({ "host": "0.0.0.0" }))
    );
}
