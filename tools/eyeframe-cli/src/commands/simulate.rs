//! Step a scene with a deterministic clock and print camera state.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use eyeframe_camera_core::rig::{CameraId, CameraRig, CameraState};
use eyeframe_camera_core::StaticInput;
use eyeframe_common::clock::{FrameClock, ManualClock};
use eyeframe_common::config::AppConfig;
use eyeframe_scene_model::scene::SceneFile;
use serde::Serialize;

pub struct SimulateOptions {
    pub scene: PathBuf,
    pub frames: u32,
    pub fps: u32,
    pub seed: u64,
    pub axes: Vec<String>,
    pub shake_at: Option<u32>,
    pub shake_force: f64,
    pub time_scale: f64,
}

/// One line of simulation output.
#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: u32,
    tick: u64,
    time_secs: f64,
    cameras: &'a [CameraState],
}

pub fn run(config: &AppConfig, options: SimulateOptions) -> anyhow::Result<()> {
    if options.fps == 0 {
        anyhow::bail!("--fps must be positive");
    }

    let scene = SceneFile::load(&options.scene)
        .map_err(|e| anyhow::anyhow!("Failed to load scene: {e}"))?;
    let mut rig = CameraRig::from_scene(&scene, &config.camera, options.seed)
        .map_err(|e| anyhow::anyhow!("Failed to build camera rig: {e}"))?;
    let input = parse_axes(&options.axes)?;

    let mut clock = ManualClock::new(f64::from(options.fps));
    clock.set_time_scale(options.time_scale);
    let camera_ids: Vec<CameraId> = rig.cameras().map(|(id, _)| id).collect();

    tracing::info!(
        scene = %options.scene.display(),
        frames = options.frames,
        fps = options.fps,
        seed = options.seed,
        cameras = camera_ids.len(),
        "Simulating scene"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for frame in 0..options.frames {
        clock.advance();
        if options.shake_at == Some(frame) {
            for &id in &camera_ids {
                let started = rig.shake(id, options.shake_force)?;
                tracing::debug!(camera = id.0, started, "Shake impact");
            }
        }
        rig.step(&clock, &input);

        let time = clock.now();
        let states = rig.states();
        let record = FrameRecord {
            frame,
            tick: time.tick.0,
            time_secs: time.time_secs,
            cameras: &states,
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;

    tracing::info!(frames = options.frames, "Simulation complete");
    Ok(())
}

/// Parse repeated `NAME=VALUE` axis arguments.
fn parse_axes(axes: &[String]) -> anyhow::Result<StaticInput> {
    let mut input = StaticInput::new();
    for arg in axes {
        let (name, value) = arg
            .split_once('=')
            .with_context(|| format!("axis '{arg}' is not NAME=VALUE"))?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("axis '{name}' has a non-numeric value"))?;
        input.set_axis(name.trim(), value);
    }
    Ok(input)
}
