//! Parkour - headless demo
//!
//! Runs the character down each lane of the demo course with forward held
//! and jump pressed on the first tick, and reports what happened.
//!
//! Usage: `parkour [config.json]` or `parkour --print-config`.
//! Set `RUST_LOG=debug` (or `trace`) for the maneuver log.

use anyhow::{Context, Result};
use parkour_game::{Course, GameConfig, JumpOutcome, PlayerInput, Simulation};
use parkour_physics::debug::LogSink;
use parkour_physics::parkour::TraversalKind;
use parkour_physics::DebugSink;

/// Seconds each lane is run for.
const RUN_SECONDS: f32 = 2.5;

struct LaneReport {
    lane: String,
    jump: Option<JumpOutcome>,
    peak_height: f32,
    traversal_ticks: u32,
    goals: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1).as_deref() {
        Some("--print-config") => {
            println!("{}", GameConfig::default().to_json()?);
            return Ok(());
        }
        Some(path) => GameConfig::load(path).with_context(|| format!("loading config {}", path))?,
        None => GameConfig::default(),
    };

    let mut simulation = Simulation::new(config, Course::demo());
    let lanes: Vec<String> = simulation
        .course
        .spawn_points
        .iter()
        .map(|s| s.name.clone())
        .collect();

    for lane in &lanes {
        let report = run_lane(&mut simulation, lane)?;
        log::info!(
            "lane {:>8}: {:?}, {} traversal ticks, peak feet height {:.1}, goals {:?}",
            report.lane,
            report.jump,
            report.traversal_ticks,
            report.peak_height,
            report.goals
        );
        println!(
            "{:<8} {:<8} traversal {:>3} ticks  peak {:>6.1}  end {:?}",
            report.lane,
            report.jump.map_or("-".to_string(), |j| format!("{:?}", j)),
            report.traversal_ticks,
            report.peak_height,
            simulation.character.position()
        );
    }

    if simulation.course.remaining_goals() > 0 {
        log::warn!("{} goals not reached", simulation.course.remaining_goals());
    }

    Ok(())
}

fn run_lane(simulation: &mut Simulation, lane: &str) -> Result<LaneReport> {
    anyhow::ensure!(simulation.respawn(lane), "demo course has no lane {:?}", lane);

    let ticks = (RUN_SECONDS * simulation.config.tick_rate as f32) as u32;
    let start_height = simulation.character.position().y;
    let mut report = LaneReport {
        lane: lane.to_string(),
        jump: None,
        peak_height: 0.0,
        traversal_ticks: 0,
        goals: Vec::new(),
    };

    for _ in 0..ticks {
        let events = simulation.tick(&PlayerInput::forward().with_jump());
        if events.jump.is_some() {
            report.jump = events.jump;
        }
        report.goals.extend(events.goals);

        // Only populated when debug_draw is enabled in the config
        for primitive in simulation.drain_debug() {
            LogSink.record(primitive);
        }

        if simulation.character.traversal_kind() != TraversalKind::None {
            report.traversal_ticks += 1;
        }
        report.peak_height = report
            .peak_height
            .max(simulation.character.position().y - start_height);
    }

    Ok(report)
}
