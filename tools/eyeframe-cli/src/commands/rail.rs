//! Print world-space samples along a rail focus.

use std::path::PathBuf;

use eyeframe_camera_core::FocusScene;
use eyeframe_scene_model::scene::SceneFile;
use serde::Serialize;

#[derive(Serialize)]
struct RailSample {
    index: usize,
    x: f64,
    y: f64,
}

pub fn run(path: PathBuf, focus: &str, samples: usize) -> anyhow::Result<()> {
    let scene =
        SceneFile::load(&path).map_err(|e| anyhow::anyhow!("Failed to load scene: {e}"))?;
    let focuses = FocusScene::from_specs(&scene.focuses)
        .map_err(|e| anyhow::anyhow!("Failed to build focuses: {e}"))?;

    let id = focuses
        .id_of(focus)
        .ok_or_else(|| anyhow::anyhow!("Scene has no focus named '{focus}'"))?;
    let kind = focuses
        .get(id)
        .map(|f| &f.kind)
        .ok_or_else(|| anyhow::anyhow!("Focus '{focus}' was removed"))?;
    let rail = kind
        .rail()
        .ok_or_else(|| anyhow::anyhow!("Focus '{focus}' is a {} focus, not a rail", kind.label()))?;

    tracing::info!(
        focus,
        points = rail.len(),
        segments = rail.segment_count(),
        "Sampling rail"
    );

    for (index, point) in rail.sample(samples).into_iter().enumerate() {
        let sample = RailSample {
            index,
            x: point.x,
            y: point.y,
        };
        println!("{}", serde_json::to_string(&sample)?);
    }

    Ok(())
}
