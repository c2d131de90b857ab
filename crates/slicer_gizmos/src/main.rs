//! gizmo_replay - drive the move gizmo from a scripted scenario.
//!
//! Usage: `gizmo_replay <scenario.toml>`
//!
//! Scenarios without a `[preferences]` table use the preferences saved in
//! the user's config directory.
//!
//! Set `RUST_LOG=debug` to see every state transition.

use std::path::PathBuf;
use std::process::ExitCode;

use slicer_gizmos::config::GizmoPreferences;
use slicer_gizmos::scenario::{Replay, Scenario};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: gizmo_replay <scenario.toml>");
        return ExitCode::from(2);
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Replay of {:?} failed: {}", path, e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &std::path::Path) -> slicer_gizmos::Result<()> {
    let mut scenario = Scenario::load(path)?;
    if scenario.preferences.is_none() {
        scenario.preferences = Some(GizmoPreferences::load_or_default());
    }
    let replay = Replay::run(&scenario)?;

    println!("slicer_gizmos {}", slicer_gizmos::VERSION);
    for volume in replay.selection().volumes() {
        let o = volume.instance.offset;
        let v = volume.volume.offset;
        println!(
            "{}: instance offset ({:.3}, {:.3}, {:.3}), volume offset ({:.3}, {:.3}, {:.3})",
            volume.id, o.x, o.y, o.z, v.x, v.y, v.z
        );
    }

    let history = replay.manager().history();
    println!(
        "undo: {} ({} entries), state: {:?}",
        history.undo_description().unwrap_or("-"),
        history.undo_count(),
        replay.manager().state()
    );
    Ok(())
}
