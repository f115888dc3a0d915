//! Validate an Eyeframe scene file.

use std::path::PathBuf;

use eyeframe_camera_core::rig::CameraRig;
use eyeframe_common::config::CameraDefaults;
use eyeframe_scene_model::scene::{IssueSeverity, SceneFile};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating scene at: {}", path.display());

    let scene =
        SceneFile::load(&path).map_err(|e| anyhow::anyhow!("Failed to load scene: {e}"))?;

    println!("  Version: {}", scene.version);
    println!("  Focuses: {}", scene.focuses.len());
    println!("  Cameras: {}", scene.cameras.len());

    let issues = scene.validate();
    let errors = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count();

    if issues.is_empty() {
        println!("\nScene is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            let label = match issue.severity {
                IssueSeverity::Warning => "warning",
                IssueSeverity::Error => "error",
            };
            println!("  - {label}: {}", issue.message);
        }
    }

    if errors > 0 {
        anyhow::bail!("{errors} error(s) found. Scene cannot be loaded.");
    }

    // Building the rig catches anything the static checks miss.
    let rig = CameraRig::from_scene(&scene, &CameraDefaults::default(), 0)
        .map_err(|e| anyhow::anyhow!("Scene failed to build: {e}"))?;
    for (_, camera) in rig.cameras() {
        println!(
            "  Camera '{}': {} focus(es), behaviours [{}]",
            camera.name,
            camera.controller.focuses().len(),
            camera.behaviour_names().join(", ")
        );
    }
    if !issues.is_empty() {
        println!("\n{} warning(s). Scene is usable.", issues.len());
    }

    Ok(())
}
