mod common;

use std::sync::Mutex;

use common::synthetic_camera::{SPREAD_IDS, broadcast_camera, keypoints_for, to_image};
use glam::DVec2;
use pitch_control::board::Board;
use pitch_control::detected_points::{ObjectKind, TrackedObject};
use pitch_control::pipeline::{FrameObservation, PipelineConfig, process_frame, process_frames};
use pitch_control::territory::RasterGeometry;
use pitch_control::types::{PitchError, Team};
use pitch_control::visualization::{
    GRASS, TeamColors, draw_positions, render_control_field, render_pitch_background,
};

fn small_config() -> PipelineConfig {
    PipelineConfig {
        raster: RasterGeometry::new(230, 156, 10).unwrap(),
        ..PipelineConfig::default()
    }
}

fn player(track_id: u64, team: u8, image: DVec2) -> TrackedObject {
    TrackedObject {
        track_id,
        kind: ObjectKind::Player,
        team: Some(team),
        position: Some([image.x, image.y]),
        bbox: None,
    }
}

/// Observation of players standing at the given pitch positions.
fn observation(frame: usize, team_a: &[DVec2], team_b: &[DVec2]) -> FrameObservation {
    let camera = broadcast_camera();
    let mut objects = Vec::new();
    let mut track_id = 0;
    for (team, positions) in [(1, team_a), (2, team_b)] {
        for p in positions {
            objects.push(player(track_id, team, to_image(&camera, *p)));
            track_id += 1;
        }
    }
    FrameObservation {
        frame,
        keypoints: keypoints_for(&camera, &SPREAD_IDS, 0.9),
        objects,
    }
}

#[test]
fn test_frame_positions_and_territory() {
    let config = small_config();
    // pitch coordinates with the image's y direction; output flips y
    let obs = observation(
        3,
        &[DVec2::new(-20.0, 10.0), DVec2::new(-5.0, -15.0)],
        &[DVec2::new(25.0, 0.0), DVec2::new(80.0, 0.0)],
    );
    let out = process_frame(&obs, &Board::fifa(), &config);

    assert_eq!(out.result.frame, 3);
    assert!(out.result.homography.is_some());
    assert!(out.result.failure.is_none());
    assert_eq!(out.result.num_inliers, Some(SPREAD_IDS.len()));

    let first = out.result.objects[0].world.unwrap();
    assert!((first[0] + 20.0).abs() < 1e-6);
    assert!((first[1] + 10.0).abs() < 1e-6);
    assert!(out.result.objects[0].on_field);
    assert!(!out.result.objects[3].on_field);

    assert_eq!(out.result.summary.team_a_players, 2);
    assert_eq!(out.result.summary.team_b_players, 1);
    assert_eq!(out.team_b.len(), 1);
    let shares = out.result.summary.team_a_share + out.result.summary.team_b_share;
    assert!((shares - 1.0).abs() < 1e-12);

    let raster = config.raster;
    let (col, row) = raster.world_to_pixel(DVec2::new(-20.0, -10.0));
    assert_eq!(out.control_field.get(col, row), Some(Team::A));
    let (col, row) = raster.world_to_pixel(DVec2::new(25.0, 0.0));
    assert_eq!(out.control_field.get(col, row), Some(Team::B));
}

#[test]
fn test_frame_without_homography() {
    let config = small_config();
    let mut obs = observation(0, &[DVec2::new(0.0, 0.0)], &[DVec2::new(10.0, 0.0)]);
    obs.keypoints.truncate(3);
    let out = process_frame(&obs, &Board::fifa(), &config);

    assert!(out.result.homography.is_none());
    assert!(out.result.failure.is_some());
    assert!(out.result.objects.iter().all(|o| o.world.is_none() && !o.on_field));
    assert!(out.control_field.is_unclaimed());
    assert_eq!(out.result.summary.team_a_players, 0);
    assert_eq!(out.result.summary.team_a_share, 0.0);
}

#[test]
fn test_bbox_anchors() {
    let person = TrackedObject {
        track_id: 1,
        kind: ObjectKind::Goalkeeper,
        team: Some(2),
        position: None,
        bbox: Some([10.0, 20.0, 30.0, 60.0]),
    };
    assert_eq!(person.anchor(), Some(DVec2::new(20.0, 60.0)));
    assert_eq!(person.team(), Some(Team::B));

    let ball = TrackedObject {
        kind: ObjectKind::Ball,
        team: None,
        ..person.clone()
    };
    assert_eq!(ball.anchor(), Some(DVec2::new(20.0, 40.0)));
    assert_eq!(ball.team(), None);

    let placed = TrackedObject {
        position: Some([5.0, 6.0]),
        ..person.clone()
    };
    assert_eq!(placed.anchor(), Some(DVec2::new(5.0, 6.0)));

    let lost = TrackedObject {
        bbox: None,
        team: Some(7),
        ..person
    };
    assert_eq!(lost.anchor(), None);
    assert_eq!(lost.team(), None);
}

#[test]
fn test_process_frames_sorted_and_sunk() {
    let config = small_config();
    let observations: Vec<_> = (0..6)
        .rev()
        .map(|i| observation(i, &[DVec2::new(-10.0, i as f64)], &[DVec2::new(10.0, 0.0)]))
        .collect();
    let seen = Mutex::new(Vec::new());
    let results = process_frames(&observations, &Board::fifa(), &config, |out| {
        seen.lock().unwrap().push(out.result.frame);
        Ok(())
    })
    .unwrap();

    assert_eq!(
        results.iter().map(|r| r.frame).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4, 5]
    );
    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_process_frames_sink_error() {
    let config = small_config();
    let observations = vec![observation(0, &[], &[])];
    let result = process_frames(&observations, &Board::fifa(), &config, |_| {
        Err(PitchError::DegenerateGeometry("sink".to_string()))
    });
    assert!(result.is_err());
}

#[test]
fn test_render_frame_image() {
    let config = small_config();
    let obs = observation(1, &[DVec2::new(-20.0, 0.0)], &[DVec2::new(20.0, 0.0)]);
    let out = process_frame(&obs, &Board::fifa(), &config);
    let colors = TeamColors {
        team_a: [255, 0, 0],
        team_b: [0, 0, 255],
    };
    let mut img = render_control_field(&out.control_field, &config.raster, &colors, 1.0);
    assert_eq!(img.dimensions(), (230, 156));
    assert_eq!(img.get_pixel(0, 78).0, [255, 0, 0]);
    assert_eq!(img.get_pixel(229, 78).0, [0, 0, 255]);

    draw_positions(&mut img, &config.raster, &out.team_a, colors.team_a);
    let (col, row) = config.raster.world_to_pixel(out.team_a[0]);
    assert_eq!(img.get_pixel(col, row).0, [255, 0, 0]);
    assert_eq!(img.get_pixel(col + 11, row).0, [255, 255, 255]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("control.png");
    img.save(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_off_field_players_not_drawn() {
    let config = small_config();
    let obs = observation(2, &[DVec2::new(-20.0, 0.0)], &[DVec2::new(90.0, 0.0)]);
    let out = process_frame(&obs, &Board::fifa(), &config);

    assert!(!out.result.objects[1].on_field);
    assert!(out.result.objects[1].world.is_some());
    assert!(out.team_b.is_empty());
    assert_eq!(out.result.summary.team_b_players, 0);

    let colors = TeamColors {
        team_a: [255, 0, 0],
        team_b: [0, 0, 255],
    };
    let mut img = render_control_field(&out.control_field, &config.raster, &colors, 0.0);
    let before = img.clone();
    draw_positions(&mut img, &config.raster, &out.team_b, colors.team_b);
    assert_eq!(img, before);
    // the right edge where a clamped marker would land
    for row in 60..100 {
        assert_ne!(img.get_pixel(229, row).0, colors.team_b);
    }
}

#[test]
fn test_pitch_background_markings() {
    let raster = RasterGeometry::new(230, 156, 10).unwrap();
    let img = render_pitch_background(&raster);
    assert_eq!(img.dimensions(), (230, 156));
    let white = [255, 255, 255];

    // halfway line
    for row in [10, 40, 120, 146] {
        assert_eq!(img.get_pixel(115, row).0, white, "halfway line at row {}", row);
    }
    // touch line, goal line, centre spot, centre circle, penalty spot
    assert_eq!(img.get_pixel(60, 10).0, white);
    assert_eq!(img.get_pixel(10, 30).0, white);
    assert_eq!(img.get_pixel(115, 78).0, white);
    assert_eq!(img.get_pixel(133, 78).0, white);
    assert_eq!(img.get_pixel(33, 78).0, white);
    assert_eq!(img.get_pixel(197, 78).0, white);
    // penalty area front edge at x = -36.5
    assert_eq!(img.get_pixel(42, 60).0, white);

    // open grass inside and outside the pitch
    assert_eq!(img.get_pixel(60, 30).0, GRASS);
    assert_eq!(img.get_pixel(3, 3).0, GRASS);
    assert_eq!(img.get_pixel(124, 78).0, GRASS);
}

#[test]
fn test_control_field_blends_over_markings() {
    let config = small_config();
    let obs = observation(4, &[DVec2::new(-20.0, 0.0)], &[DVec2::new(20.0, 0.0)]);
    let out = process_frame(&obs, &Board::fifa(), &config);
    let colors = TeamColors::default();

    let background = render_pitch_background(&config.raster);
    let bare = render_control_field(&out.control_field, &config.raster, &colors, 0.0);
    assert_eq!(bare, background);

    let half = render_control_field(&out.control_field, &config.raster, &colors, 0.5);
    let line = half.get_pixel(115, 40).0;
    let grass = half.get_pixel(60, 30).0;
    assert_ne!(line, grass);
    let a = colors.team_a;
    for c in 0..3 {
        let expected = (f32::from(a[c]) * 0.5 + f32::from(GRASS[c]) * 0.5).round() as u8;
        assert_eq!(grass[c], expected);
    }
}
