//! Focus synchronization simulator.
//!
//! Runs a scenario against a store bound to a simulated document and logs
//! the recorded element and the focused node after every step.
//!
//! # Usage
//!
//! ```bash
//! # Steps as arguments (`:` or a quoted space separates verb and argument)
//! focuslink-sim mount:email=login-email mount:search focus:search dispatch:login-email
//!
//! # Steps from a file, one per line, `#` starts a comment
//! focuslink-sim --script scenario.txt
//!
//! # Coalescing: dispatches before a tick share one forward sync
//! focuslink-sim --manual-ticks mount:a=a mount:b=b dispatch:a dispatch:b tick
//! ```

use std::{fs, path::PathBuf};

use clap::Parser;
use focuslink_core::FocusConfig;
use focuslink_harness::{InvariantRegistry, ScenarioRunner, Step};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Focus synchronization simulator
#[derive(Parser, Debug)]
#[command(name = "focuslink-sim")]
#[command(about = "Run focus synchronization scenarios against a simulated document")]
#[command(version)]
struct Args {
    /// Focus selector attribute on managed nodes
    #[arg(short, long, default_value = focuslink_core::DEFAULT_FOCUS_ATTRIBUTE)]
    attribute: String,

    /// Ignore native events raised while focus sync moves focus
    #[arg(long)]
    guard: bool,

    /// Only run microtasks on explicit `tick` steps
    #[arg(long)]
    manual_ticks: bool,

    /// File with one step per line
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Scenario steps, run after the script
    steps: Vec<String>,
}

fn parse_script(source: &str) -> Result<Vec<Step>, focuslink_harness::ScenarioError> {
    source
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(step, _)| step).trim())
        .filter(|line| !line.is_empty())
        .map(str::parse)
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let mut steps = match &args.script {
        Some(path) => parse_script(&fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    for step in &args.steps {
        steps.push(step.parse()?);
    }

    let config = FocusConfig::default()
        .with_attribute(args.attribute)
        .with_reentrancy_guard(args.guard);
    let mut runner = ScenarioRunner::new(config)?;
    if args.manual_ticks {
        runner = runner.with_manual_ticks();
    }
    let registry = InvariantRegistry::standard();

    tracing::info!(steps = steps.len(), guard = args.guard, "running scenario");

    let mut violations = 0;
    for step in &steps {
        let outcome = runner.run_step(step)?;
        for event in &outcome.events {
            tracing::debug!(%event, "event");
        }
        tracing::info!(
            %step,
            element = outcome.element.as_deref().unwrap_or("-"),
            active = outcome.active.as_deref().unwrap_or("-"),
            microtasks = outcome.microtasks,
            "step"
        );

        // Pending microtasks are expected between manual ticks.
        let snapshot = runner.snapshot();
        if snapshot.pending_microtasks == 0
            && let Err(found) = registry.check_all(&snapshot)
        {
            for violation in &found {
                tracing::error!(%step, %violation, "invariant violated");
            }
            violations += found.len();
        }
    }

    if violations > 0 {
        return Err(format!("{violations} invariant violations").into());
    }

    tracing::info!(
        element = runner.element().as_deref().unwrap_or("-"),
        active = runner.active_id().as_deref().unwrap_or("-"),
        "scenario complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_skips_comments_and_blank_lines() {
        let steps = parse_script("# login form\nmount email=login\n\nfocus email  # user click\n");

        assert_eq!(
            steps.ok(),
            Some(vec![
                Step::Mount { id: "email".into(), focus_id: Some("login".into()) },
                Step::Focus { id: "email".into() },
            ])
        );
    }

    #[test]
    fn script_reports_bad_step() {
        assert!(parse_script("mount a\nwarp a\n").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["focuslink-sim", "--guard", "mount:a=x", "focus:a"]);

        let args = args.ok();
        assert_eq!(args.as_ref().map(|a| a.steps.len()), Some(2));
        assert_eq!(args.as_ref().map(|a| a.attribute.as_str()), Some("data-focus"));
        assert_eq!(args.map(|a| a.guard), Some(true));
    }
}
