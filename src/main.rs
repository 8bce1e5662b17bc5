//! CLI entry point for jat-dash.

mod cli;

use clap::Parser;
use jat_dash::build_info;
use jat_dash::config::{
    default_global_config_path, load_config_with_source, Config, ConfigSource,
};
use jat_dash::hooks::{
    load_settings, match_tool_name, primary_command, scenarios, HookEngine, HookEventType,
};
use jat_dash::render::Renderer;
use jat_dash::server::{self, AppState};
use jat_dash::tmux::{KillOutcome, SessionRegistry};
use std::io::IsTerminal;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use cli::{Command, HooksCommand, SessionsCommand};

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    if args.version {
        println!("{}", build_info::cli_version_text());
        return;
    }
    let renderer = Renderer::new(!args.no_color && std::io::stderr().is_terminal());

    let loaded = match load_config_with_source(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            renderer.error(&e.to_string());
            std::process::exit(1);
        }
    };
    init_tracing(&loaded.config.log.level);
    if loaded.source == ConfigSource::BuiltInDefaults {
        if let Some(path) = default_global_config_path() {
            tracing::debug!(path = %path.display(), "no config file found; using defaults");
        }
    } else {
        tracing::debug!(source = %loaded.source.describe(), "configuration loaded");
    }

    let command = args.command.unwrap_or(Command::Serve { bind: None });
    match run(command, &loaded.config, &renderer).await {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(msg) => {
            renderer.error(&msg);
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise the configured level, else `info`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Dispatch one subcommand, returning the process exit code.
async fn run(command: Command, config: &Config, renderer: &Renderer) -> Result<i32, String> {
    match command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.server.bind.clone());
            tracing::info!(
                version = %build_info::startup_metadata_line(),
                prefix = %config.sessions.prefix,
                "starting jat-dash"
            );
            server::run(&addr, AppState::from_config(config))
                .await
                .map_err(|e| format!("failed to serve on {addr}: {e}"))?;
            Ok(0)
        }
        Command::Sessions { action } => {
            let registry = SessionRegistry::from_config(&config.sessions);
            run_sessions(action, &registry, renderer).await
        }
        Command::Hooks { action } => {
            let engine = HookEngine::from_config(&config.hooks);
            run_hooks(action, &engine, renderer).await
        }
    }
}

async fn run_sessions(
    action: SessionsCommand,
    registry: &SessionRegistry,
    renderer: &Renderer,
) -> Result<i32, String> {
    match action {
        SessionsCommand::List => {
            let sessions = registry.list().await.map_err(|e| e.to_string())?;
            for session in &sessions {
                let created = session
                    .created_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                let attached = if session.attached { "attached" } else { "detached" };
                renderer.data(&format!(
                    "{}\t{}\t{created}\t{attached}",
                    session.full_name, session.display_name
                ));
            }
            renderer.detail(&format!(
                "{} session(s) under `{}`",
                sessions.len(),
                registry.namespace().prefix()
            ));
            Ok(0)
        }
        SessionsCommand::Create { name, path } => {
            let outcome = registry
                .create(name.as_deref(), path.as_deref())
                .await
                .map_err(|e| e.to_string())?;
            renderer.section(if outcome.created {
                "session created"
            } else {
                "session already exists"
            });
            renderer.field("name", &outcome.session.full_name);
            if let Some(dir) = &outcome.working_dir {
                renderer.field("dir", &dir.display().to_string());
            }
            renderer.data(&outcome.session.full_name);
            Ok(0)
        }
        SessionsCommand::Kill { name } => {
            match registry.kill(&name).await.map_err(|e| e.to_string())? {
                KillOutcome::Killed => renderer.section(&format!("killed {name}")),
                KillOutcome::AlreadyGone => renderer.warn(&format!("{name} was already gone")),
            }
            Ok(0)
        }
    }
}

async fn run_hooks(
    action: HooksCommand,
    engine: &HookEngine,
    renderer: &Renderer,
) -> Result<i32, String> {
    match action {
        HooksCommand::Run {
            command,
            scenario,
            timeout,
        } => {
            let scenario = scenarios::find(&scenario).map_err(|e| e.to_string())?;
            let result = engine
                .execute(&command, &scenario.event, timeout)
                .await
                .map_err(|e| e.to_string())?;
            renderer.execution(&result);
            Ok(if result.succeeded() { 0 } else { 1 })
        }
        HooksCommand::Match {
            settings,
            event_type,
            tool,
        } => {
            let settings = load_settings(Path::new(&settings)).map_err(|e| e.to_string())?;
            let event_type: HookEventType = event_type.parse().map_err(|e| format!("{e}"))?;
            let tool = match tool {
                Some(tool) if !event_type.is_tool_scoped() => {
                    renderer.warn(&format!(
                        "{event_type} events carry no tool name; ignoring --tool {tool}"
                    ));
                    String::new()
                }
                Some(tool) => tool,
                None => String::new(),
            };
            let results = match_tool_name(settings.entries_for(event_type), &tool);
            if results.is_empty() {
                renderer.detail(&format!("no {event_type} hooks configured"));
                return Ok(0);
            }
            for result in &results {
                let mark = match (&result.error, result.matched) {
                    (Some(_), _) => "!",
                    (None, true) => "+",
                    (None, false) => "-",
                };
                let commands: Vec<&str> =
                    result.entry.hooks.iter().map(|h| h.command.as_str()).collect();
                renderer.data(&format!(
                    "{mark} {}\t{}",
                    result.entry.matcher,
                    commands.join(" && ")
                ));
                if let Some(error) = &result.error {
                    renderer.detail(error);
                }
            }
            if let Some(primary) = primary_command(&results) {
                renderer.field("primary", &primary.command);
            }
            Ok(0)
        }
        HooksCommand::Scenarios => {
            for scenario in scenarios::catalog() {
                renderer.data(&format!(
                    "{}\t{}\t{}",
                    scenario.name, scenario.event_type, scenario.description
                ));
            }
            Ok(0)
        }
    }
}
