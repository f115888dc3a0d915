use std::path::PathBuf;

use eyeframe_camera_core::focus::{Focus, FocusKind, FocusScene};
use eyeframe_camera_core::rig::{CameraRig, CameraState};
use eyeframe_camera_core::{
    compute_action_rect, BezierRail, CameraController, Frame, FocusPoint, StaticInput,
};
use eyeframe_common::clock::{FrameClock, ManualClock};
use eyeframe_common::config::CameraDefaults;
use eyeframe_scene_model::geometry::{Point2D, Rect};
use eyeframe_scene_model::scene::SceneFile;

fn load_fixture_scene() -> SceneFile {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("scenes")
        .join("platformer.json");
    SceneFile::load(&path).expect("fixture scene should load")
}

fn simulate(frames: usize, seed: u64) -> Vec<Vec<CameraState>> {
    let scene = load_fixture_scene();
    let mut rig = CameraRig::from_scene(&scene, &CameraDefaults::default(), seed)
        .expect("fixture scene should build");
    let mut clock = ManualClock::new(60.0);
    let input = StaticInput::new();
    (0..frames)
        .map(|_| {
            clock.advance();
            rig.step(&clock, &input);
            rig.states()
        })
        .collect()
}

#[test]
fn straight_rail_midpoint_and_projection() {
    let rail = BezierRail::from_points(vec![
        Point2D::new(0.0, 0.0),
        Point2D::new(10.0, 0.0),
        Point2D::new(20.0, 0.0),
        Point2D::new(30.0, 0.0),
    ]);
    assert_eq!(rail.segment_count(), 1);
    assert_eq!(rail.point_at(0.5, 0), Point2D::new(15.0, 0.0));

    let nearest = rail.nearest_point(Point2D::new(15.0, 5.0));
    assert!(nearest.distance_to(&Point2D::new(15.0, 0.0)) < 1e-9);
}

#[test]
fn two_focuses_padded_action_rect() {
    let points = [
        FocusPoint::new(Point2D::new(-10.0, 0.0)),
        FocusPoint::new(Point2D::new(10.0, 0.0)),
    ];
    let rect = compute_action_rect(&points, Point2D::ZERO);
    assert_eq!(rect, Rect::from_min_max(-10.0, 0.0, 10.0, 0.0));
    assert_eq!(rect.expand(5.0), Rect::from_min_max(-15.0, -5.0, 15.0, 5.0));

    let mut scene = FocusScene::new();
    let mut camera = CameraController::new().with_padding(5.0);
    for p in &points {
        let id = scene.insert(
            Focus::new(
                format!("{:?}", p.point.x),
                FocusKind::Transform {
                    offset: Point2D::ZERO,
                },
            )
            .at(p.point),
        );
        camera.add_focus(id);
    }
    let mut clock = ManualClock::new(60.0);
    let input = StaticInput::new();
    clock.advance();
    let frame = Frame::new(clock.now(), &input);
    assert_eq!(
        camera.action_rect(&scene, &frame),
        Rect::from_min_max(-15.0, -5.0, 15.0, 5.0)
    );
}

#[test]
fn action_rect_is_computed_once_per_tick() {
    let mut scene = FocusScene::new();
    let id = scene.insert(Focus::new(
        "mover",
        FocusKind::Transform {
            offset: Point2D::ZERO,
        },
    ));
    let mut camera = CameraController::new().with_padding(0.0);
    camera.add_focus(id);

    let mut clock = ManualClock::new(60.0);
    let input = StaticInput::new();
    clock.advance();
    let frame = Frame::new(clock.now(), &input);
    let first = camera.action_rect(&scene, &frame);

    // Moving the focus mid-tick doesn't change this tick's rect.
    if let Some(focus) = scene.get_mut(id) {
        focus.position = Point2D::new(8.0, 0.0);
    }
    assert_eq!(camera.action_rect(&scene, &frame), first);

    camera.invalidate_action_rect();
    assert_eq!(camera.action_rect(&scene, &frame), Rect::at_point(Point2D::new(8.0, 0.0)));

    if let Some(focus) = scene.get_mut(id) {
        focus.position = Point2D::new(-3.0, 0.0);
    }
    clock.advance();
    let frame = Frame::new(clock.now(), &input);
    assert_eq!(camera.action_rect(&scene, &frame), Rect::at_point(Point2D::new(-3.0, 0.0)));
}

#[test]
fn fixture_simulation_is_deterministic() {
    let a = simulate(180, 11);
    let b = simulate(180, 11);
    assert_eq!(a, b);
    assert_eq!(a[0].len(), 2);
    assert_eq!(a[0][0].name, "main");
    assert_eq!(a[0][1].name, "overview");
}

#[test]
fn fixture_cameras_stay_inside_limits() {
    let scene = load_fixture_scene();
    let frames = simulate(300, 3);
    for (camera, spec) in frames[0].iter().zip(&scene.cameras) {
        assert_eq!(camera.name, spec.name);
    }

    let main_limits = Rect::from_min_max(-200.0, -100.0, 200.0, 100.0);
    for states in &frames {
        let main = &states[0];
        assert!(main.zoom > 0.0);
        let view = main.view_rect;
        assert!(view.x_min >= main_limits.x_min - 1e-9);
        assert!(view.x_max <= main_limits.x_max + 1e-9);
        assert!(view.y_min >= main_limits.y_min - 1e-9);
        assert!(view.y_max <= main_limits.y_max + 1e-9);
    }
}

#[test]
fn fixture_main_camera_tracks_player() {
    let frames = simulate(240, 5);
    let start = frames[0][0].position;
    let end = frames[frames.len() - 1][0].position;
    // The player walks right at 12 units/s.
    assert!(end.x > start.x);

    // The overview camera follows the lift rail, which sits at x = -20.
    let overview = &frames[frames.len() - 1][1];
    assert!((overview.action_rect.center().x + 20.0).abs() < 1e-9);
}

mod controller_properties {
    use eyeframe_camera_core::CameraController;
    use eyeframe_scene_model::geometry::Point2D;
    use eyeframe_scene_model::limits::CameraLimits;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn view_never_leaves_limits(
            w in 1.0f64..500.0,
            h in 1.0f64..500.0,
            aspect in 0.25f64..4.0,
            moves in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0, 0.0f64..400.0), 1..20),
        ) {
            let limits = CameraLimits::from_xywh(-w / 2.0, -h / 3.0, w, h);
            let mut camera = CameraController::new().with_aspect(aspect).with_limits(limits);
            for (x, y, zoom) in moves {
                camera.set_zoom(zoom);
                camera.set_position(Point2D::new(x, y));

                let view = camera.view_rect();
                let bounds = limits.rect();
                prop_assert!(camera.zoom() > 0.0);
                prop_assert!(view.x_min >= bounds.x_min - 1e-6);
                prop_assert!(view.x_max <= bounds.x_max + 1e-6);
                prop_assert!(view.y_min >= bounds.y_min - 1e-6);
                prop_assert!(view.y_max <= bounds.y_max + 1e-6);
            }
        }
    }
}
