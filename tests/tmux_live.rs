//! Registry against a real tmux server.
//!
//! Ignored by default because it needs `tmux` on PATH and starts a server.

use jat_dash::config::SessionsConfig;
use jat_dash::tmux::{KillOutcome, SessionRegistry};

#[tokio::test]
#[ignore = "requires tmux"]
async fn create_list_kill_round() {
    let config = SessionsConfig {
        prefix: format!("jat-dash-live-{}-", std::process::id()),
        default_project_path: None,
        ..SessionsConfig::default()
    };
    let registry = SessionRegistry::from_config(&config);

    let created = registry.create(Some("live"), None).await.expect("create");
    assert!(created.created);
    let again = registry.create(Some("live"), None).await.expect("create again");
    assert!(!again.created);
    assert_eq!(again.session.full_name, created.session.full_name);

    let listed = registry.list().await.expect("list");
    assert!(listed
        .iter()
        .any(|s| s.full_name == created.session.full_name));

    let name = created.session.full_name;
    assert_eq!(registry.kill(&name).await.expect("kill"), KillOutcome::Killed);
    assert_eq!(
        registry.kill(&name).await.expect("kill again"),
        KillOutcome::AlreadyGone
    );
}
