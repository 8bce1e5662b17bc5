//! jat-dash: the core of a local dashboard for agent terminals and hooks.
//!
//! The crate manages dashboard-owned tmux sessions and lets users preview
//! Claude-style hook commands against sample events.
//!
//! # Quick start
//!
//! ```no_run
//! use jat_dash::config::load_config;
//! use jat_dash::tmux::SessionRegistry;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let registry = SessionRegistry::from_config(&config.sessions);
//! for session in registry.list().await.unwrap() {
//!     println!("{} {}", session.full_name, session.attached);
//! }
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod error;
pub mod hooks;
pub mod process;
pub mod render;
pub mod server;
#[cfg(test)]
pub mod testsupport;
pub mod tmux;
