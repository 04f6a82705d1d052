//! inputmux-replay: entry point.
//!
//! Loads a binding profile and a raw-input script, runs the script through
//! `inputmux-core` on a virtual clock, and prints every channel event.
//!
//! # Usage
//!
//! ```text
//! inputmux-replay --profile <FILE> --script <FILE> [OPTIONS]
//!
//! Options:
//!   --profile   <FILE>    Binding profile (TOML)
//!   --script    <FILE>    Raw input script (TOML)
//!   --json                Print one JSON object per event
//!   --log-level <FILTER>  Log filter used when RUST_LOG is unset [default: warn]
//! ```
//!
//! | Variable            | Description                 |
//! |---------------------|-----------------------------|
//! | `INPUTMUX_PROFILE`  | Default for `--profile`     |
//! | `INPUTMUX_SCRIPT`   | Default for `--script`      |
//! | `INPUTMUX_LOG`      | Default for `--log-level`   |
//!
//! Logs go to stderr so that stdout carries only events.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inputmux_replay::{load_profile, load_script, replay, ReplayOutcome};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays raw input scripts through the inputmux channel pipeline.
#[derive(Debug, Parser)]
#[command(
    name = "inputmux-replay",
    about = "Replay raw input scripts through inputmux channel bindings",
    version
)]
struct Cli {
    /// Binding profile: devices, input settings and channel bindings.
    #[arg(long, env = "INPUTMUX_PROFILE")]
    profile: PathBuf,

    /// Raw input script: frames of key, mouse, joystick and focus events.
    #[arg(long, env = "INPUTMUX_SCRIPT")]
    script: PathBuf,

    /// Print events as JSON lines instead of text.
    #[arg(long)]
    json: bool,

    /// Log filter applied when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn", env = "INPUTMUX_LOG")]
    log_level: String,
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_outcome(out: &mut impl Write, outcome: &ReplayOutcome, json: bool) -> anyhow::Result<()> {
    for event in &outcome.events {
        if json {
            serde_json::to_writer(&mut *out, event).context("failed to encode event")?;
            writeln!(out)?;
        } else {
            writeln!(out, "{event}")?;
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with_writer(std::io::stderr)
        .init();

    let profile = load_profile(&cli.profile)
        .with_context(|| format!("failed to load profile {}", cli.profile.display()))?;
    let script =
        load_script(&cli.script).with_context(|| format!("failed to load script {}", cli.script.display()))?;

    info!(
        devices = profile.devices.len(),
        frames = script.frames.len(),
        "starting replay"
    );
    let outcome = replay(&profile, &script).context("replay failed")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    print_outcome(&mut out, &outcome, cli.json)?;

    info!(events = outcome.events.len(), grabs = ?outcome.grab_history, "replay done");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use inputmux_replay::ChannelEvent;

    use super::*;

    #[test]
    fn test_cli_requires_profile_and_script() {
        let result = Cli::try_parse_from(["inputmux-replay", "--profile", "p.toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_defaults() {
        // Act
        let cli = Cli::parse_from(["inputmux-replay", "--profile", "p.toml", "--script", "s.toml"]);

        // Assert
        assert_eq!(cli.profile, PathBuf::from("p.toml"));
        assert_eq!(cli.script, PathBuf::from("s.toml"));
        assert!(!cli.json);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_cli_json_and_log_level_override() {
        let cli = Cli::parse_from([
            "inputmux-replay",
            "--profile",
            "p.toml",
            "--script",
            "s.toml",
            "--json",
            "--log-level",
            "debug",
        ]);
        assert!(cli.json);
        assert_eq!(cli.log_level, "debug");
    }

    fn outcome() -> ReplayOutcome {
        ReplayOutcome {
            frames: 1,
            events: vec![
                ChannelEvent::Digital {
                    frame: 0,
                    channel: 0,
                    on: true,
                },
                ChannelEvent::Text {
                    frame: 0,
                    device: 0,
                    text: 'a',
                },
            ],
            grab_history: vec![],
        }
    }

    #[test]
    fn test_print_outcome_as_text() {
        let mut out = Vec::new();
        print_outcome(&mut out, &outcome(), false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[   0] digital 0   on\n[   0] text    0   'a'\n"
        );
    }

    #[test]
    fn test_print_outcome_as_json_lines() {
        let mut out = Vec::new();
        print_outcome(&mut out, &outcome(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"kind":"digital","frame":0,"channel":0,"on":true}"#);
        assert_eq!(lines[1], r#"{"kind":"text","frame":0,"device":0,"text":"a"}"#);
    }
}
