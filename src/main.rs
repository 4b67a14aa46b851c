//! CLI entry point (§6 "CLI"). Daemon mode wires the Core to an actor
//! channel and waits on it until interrupted; `--focus-workspace` and
//! `--list-workspaces` operate on the on-disk workspace-restore snapshot
//! directly, since acting on live windows requires the platform-specific
//! compositor bridge and observer this crate leaves as an external
//! collaborator boundary (§1).

use std::path::{Path, PathBuf};

use clap::Parser;

use latticewm::actor::bridge::NullBridge;
use latticewm::actor::interceptor::Interceptor;
use latticewm::actor::persistence::{self, Snapshot};
use latticewm::common::config::Config;
use latticewm::core::{Action, Core};
use latticewm::model::workspace_store::{is_valid_workspace, MonitorId, WorkspaceNumber};

#[derive(Parser, Debug)]
#[command(name = "latticewm", about = "A tiling window manager core")]
struct Cli {
    /// Switch the primary monitor to workspace N and exit.
    #[arg(long, value_name = "N")]
    focus_workspace: Option<WorkspaceNumber>,

    /// Print each non-empty workspace and the current one, then exit.
    #[arg(long)]
    list_workspaces: bool,
}

fn config_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(std::env::temp_dir).join("latticewm").join("latticewm.ini")
}

fn state_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("latticewm")
}

fn load_config(path: &Path) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(?e, ?path, "could not load config, using defaults");
            Config::default()
        }
    }
}

fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    match persistence::load(path)? {
        Some(snapshot) if !persistence::is_stale(&snapshot, persistence::now_unix_secs()) => Ok(snapshot),
        _ => Ok(Snapshot { written_at_unix_secs: persistence::now_unix_secs(), active_workspace: Vec::new(), entries: Vec::new() }),
    }
}

fn list_workspaces(snapshot: &Snapshot, monitor: &MonitorId) {
    let current = snapshot.active_workspace.iter().find(|(m, _)| m == monitor).map(|(_, n)| *n).unwrap_or(1);

    let mut counts: std::collections::BTreeMap<WorkspaceNumber, usize> = std::collections::BTreeMap::new();
    for entry in &snapshot.entries {
        if &entry.monitor == monitor {
            *counts.entry(entry.workspace).or_insert(0) += 1;
        }
    }
    counts.entry(current).or_insert(0);

    for (n, count) in counts {
        if n == current {
            println!("Workspace {n} ({count} windows) <- current");
        } else {
            println!("Workspace {n} ({count} windows)");
        }
    }
}

fn focus_workspace(snapshot: &mut Snapshot, monitor: &MonitorId, n: WorkspaceNumber) {
    if let Some(entry) = snapshot.active_workspace.iter_mut().find(|entry| &entry.0 == monitor) {
        entry.1 = n;
    } else {
        snapshot.active_workspace.push((monitor.clone(), n));
    }
    snapshot.written_at_unix_secs = persistence::now_unix_secs();
}

async fn run_daemon(config: Config, config_path: Option<PathBuf>, monitor: MonitorId) -> anyhow::Result<()> {
    let mut core = Core::new(config, config_path, Box::new(NullBridge), vec![monitor.clone()]);

    let state_path = persistence::snapshot_path(&state_dir());
    if let Ok(Some(snapshot)) = persistence::load(&state_path) {
        if !persistence::is_stale(&snapshot, persistence::now_unix_secs()) {
            for (m, n) in &snapshot.active_workspace {
                core.store.active_workspace.insert(m.clone(), *n);
            }
            // Consumed incrementally by classify::on_window_created as
            // matching windows are (re)created (§4.9).
            core.pending_restore = snapshot.entries;
        }
    }

    latticewm::core::startup::on_startup(&mut core);

    // The interceptor pre-hides windows the Core hasn't classified yet
    // (§5, §9); it polls its own bridge handle on a background thread and
    // shares only the `known`/`pids` sets with the Core.
    let interceptor_bridge: std::sync::Arc<parking_lot::Mutex<Box<dyn latticewm::actor::bridge::CompositorBridge>>> =
        std::sync::Arc::new(parking_lot::Mutex::new(Box::new(NullBridge)));
    let _interceptor = Interceptor::spawn(interceptor_bridge, core.known_windows.clone(), core.watched_pids.clone());

    let (_tx, mut rx) = latticewm::actor::channel::<Action>();
    tracing::info!("latticewm daemon started; waiting for actions (Ctrl-C to exit)");

    let mut animation_tick = tokio::time::interval(latticewm::actor::animator::TICK_INTERVAL);
    animation_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            received = rx.recv() => {
                match received {
                    Some((span, action)) => {
                        let _entered = span.enter();
                        core.handle(monitor.clone(), action);
                    }
                    None => break,
                }
            }
            _ = animation_tick.tick() => {
                core.sample_animations(std::time::Instant::now());
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received interrupt, shutting down");
                break;
            }
        }
    }

    let snapshot = persistence::assemble_snapshot(&core.store);
    let path = state_path.clone();
    tokio::task::spawn_blocking(move || {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = persistence::save(&path, &snapshot) {
            tracing::warn!(?e, "failed to write workspace-restore snapshot on shutdown");
        }
    })
    .await?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Exit 1 on an unknown/malformed argument rather than clap's default
    // exit 2, per §6 "Unknown argument: exit 1 with usage to stderr".
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.exit_code() == 0 {
                print!("{e}");
                std::process::exit(0);
            }
            eprint!("{e}");
            std::process::exit(1);
        }
    };
    let _log_guard = latticewm::common::log::init();

    let cfg_path = config_path();
    let config = load_config(&cfg_path);
    let monitor = MonitorId("main".to_string());
    let state_path = persistence::snapshot_path(&state_dir());

    if cli.list_workspaces {
        let snapshot = load_snapshot(&state_path)?;
        list_workspaces(&snapshot, &monitor);
        return Ok(());
    }

    if let Some(n) = cli.focus_workspace {
        if !is_valid_workspace(n) {
            eprintln!("error: workspace number must be between 1 and 9");
            std::process::exit(1);
        }
        let mut snapshot = load_snapshot(&state_path)?;
        focus_workspace(&mut snapshot, &monitor, n);
        if let Some(parent) = state_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        persistence::save(&state_path, &snapshot)?;
        println!("switched to workspace {n}");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run_daemon(config, Some(cfg_path), monitor))
}
