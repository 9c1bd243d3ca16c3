//! Integration test: command sequences against a live session.
//!
//! Each test drives a [`Session`] through text command lines exactly as
//! the interactive loop would, then checks tensor contents, cursor state,
//! and the typed outcome.

use maxine_editor::{
    CommandError, Distribution, EditorConfig, Outcome, Session,
};
use maxine_tensor::{LoadError, Shape};
use maxine_test_utils::{gradient_value, gradient_values, DumpDir};
use proptest::prelude::*;

fn gradient_session(dir: &DumpDir) -> Session {
    let path = dir.gradient("weights.bin", 3, 8, 8);
    Session::open(EditorConfig::default(), path, Shape::new(3, 8, 8).unwrap()).unwrap()
}

fn layer_values(s: &Session, layer: usize) -> Vec<f32> {
    s.tensor().layer(s.arena(), layer).unwrap().to_vec()
}

// ── Loading and stats ────────────────────────────────────────────────

#[test]
fn stats_on_loaded_gradient_match_reference() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    assert_eq!(s.tensor().size(), 192);

    let Outcome::Stats { layer, stats } = s.execute_line("stats").unwrap() else {
        panic!("expected stats");
    };
    let reference = &gradient_values(3, 8, 8)[..64];
    let mean = reference.iter().map(|&v| v as f64).sum::<f64>() / 64.0;
    assert_eq!(layer, 0);
    assert_eq!(stats.count, 64);
    assert_eq!(stats.min, Some(0.0));
    assert_eq!(stats.max, Some(77.0));
    assert!((stats.mean - mean).abs() < 1e-9);
}

#[test]
fn fill_then_stats() {
    let mut s = Session::new(EditorConfig::default(), Shape::new(1, 2, 2).unwrap()).unwrap();
    s.execute_line(":fill 3.14").unwrap();
    let Outcome::Stats { stats, .. } = s.execute_line(":stats").unwrap() else {
        panic!("expected stats");
    };
    assert_eq!(stats.min, Some(3.14));
    assert_eq!(stats.max, Some(3.14));
    assert!((stats.mean - 3.14).abs() < 1e-6);
}

#[test]
fn goto_clamps_to_last_cell() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    s.execute_line("goto 99 99 99").unwrap();
    let c = s.cursor();
    assert_eq!((c.layer, c.row, c.col), (2, 7, 7));
}

// ── Layer vs global scope ────────────────────────────────────────────

#[test]
fn layer_transforms_leave_other_layers_alone() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    s.execute_line("goto 1 0 0").unwrap();
    s.execute_line("zero").unwrap();
    assert!(layer_values(&s, 1).iter().all(|&v| v == 0.0));
    assert_eq!(layer_values(&s, 0), gradient_values(3, 8, 8)[..64]);
    assert_eq!(layer_values(&s, 2), gradient_values(3, 8, 8)[128..]);
}

#[test]
fn clip_and_norm_are_global() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    s.execute_line("clip 10 200").unwrap();
    let all = s.tensor().data(s.arena()).unwrap().to_vec();
    assert!(all.iter().all(|&v| (10.0..=200.0).contains(&v)));
    assert_eq!(s.value(2, 7, 7).unwrap(), 200.0);

    s.execute_line("norm").unwrap();
    let all = s.tensor().data(s.arena()).unwrap();
    let min = all.iter().copied().fold(f32::INFINITY, f32::min);
    let max = all.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    assert_eq!((min, max), (0.0, 1.0));
}

#[test]
fn relu_and_sigmoid_on_current_layer() {
    let mut s = Session::new(EditorConfig::default(), Shape::new(2, 1, 3).unwrap()).unwrap();
    s.execute_line("fill -2").unwrap();
    s.execute_line("goto 1 0 0").unwrap();
    s.execute_line("fill -2").unwrap();
    s.execute_line("relu").unwrap();
    assert_eq!(layer_values(&s, 1), vec![0.0; 3]);
    assert_eq!(layer_values(&s, 0), vec![-2.0; 3]);

    s.execute_line("sigmoid").unwrap();
    assert_eq!(layer_values(&s, 1), vec![0.5; 3]);
}

// ── Shape changes ────────────────────────────────────────────────────

#[test]
fn open_reads_undersized_file_and_zero_pads() {
    let dir = DumpDir::new();
    let path = dir.dump("small.bin", &[1.0, 2.0, 3.0]);
    let mut s = Session::new(EditorConfig::default(), Shape::unit()).unwrap();
    let line = format!("open {} 1 2 3", path.display());
    s.execute_line(&line).unwrap();
    assert_eq!(s.shape(), Shape::new(1, 2, 3).unwrap());
    assert_eq!(layer_values(&s, 0), vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);
    assert_eq!(s.source(), Some(path.as_path()));
}

#[test]
fn open_rejects_oversized_file_but_keeps_new_shape() {
    let dir = DumpDir::new();
    let path = dir.dump("big.bin", &[9.0; 10]);
    let mut s = Session::new(EditorConfig::default(), Shape::unit()).unwrap();
    let err = s
        .execute_line(&format!("open {} 1 2 2", path.display()))
        .unwrap_err();
    match err {
        CommandError::ResizedWithoutData { shape, source } => {
            assert_eq!(shape, Shape::new(1, 2, 2).unwrap());
            assert!(matches!(source, LoadError::TooLarge { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(s.shape(), Shape::new(1, 2, 2).unwrap());
    assert_eq!(layer_values(&s, 0), vec![0.0; 4]);
}

#[test]
fn open_missing_file_still_resizes() {
    let dir = DumpDir::new();
    let mut s = Session::new(EditorConfig::default(), Shape::unit()).unwrap();
    let err = s
        .execute_line(&format!("open {} 2 2 2", dir.file("nope.bin").display()))
        .unwrap_err();
    assert!(err.tensor_replaced());
    assert_eq!(s.shape(), Shape::new(2, 2, 2).unwrap());
}

#[test]
fn cursor_is_clamped_after_shrinking_resize() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    s.execute_line("goto 2 7 7").unwrap();
    s.execute_line("resize 1 2 2").unwrap();
    let c = s.cursor();
    assert_eq!((c.layer, c.row, c.col), (0, 0, 0));
    assert_eq!(s.value(0, 1, 1).unwrap(), 0.0);
}

// ── Load, save, diff ─────────────────────────────────────────────────

#[test]
fn load_requires_exact_size() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    let short = dir.dump("short.bin", &[1.0; 5]);
    let err = s
        .execute_line(&format!("load {}", short.display()))
        .unwrap_err();
    assert!(matches!(err, CommandError::Load(LoadError::SizeMismatch { .. })));
    assert_eq!(s.value(1, 2, 3).unwrap(), gradient_value(1, 2, 3));

    let err = s
        .execute_line(&format!("load {}", dir.file("missing.bin").display()))
        .unwrap_err();
    assert!(matches!(err, CommandError::Load(LoadError::NotFound { .. })));
}

#[test]
fn save_then_load_restores_contents() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    let out = dir.file("out.bin");
    s.execute_line(&format!("save {}", out.display())).unwrap();
    s.execute_line("norm").unwrap();
    s.execute_line(&format!("load {}", out.display())).unwrap();
    assert_eq!(
        s.tensor().data(s.arena()).unwrap(),
        gradient_values(3, 8, 8).as_slice()
    );
}

#[test]
fn bare_save_writes_source_file() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    s.execute_line("fill 1").unwrap();
    s.save().unwrap();
    let reopened = Session::open(
        EditorConfig::default(),
        dir.file("weights.bin"),
        Shape::new(3, 8, 8).unwrap(),
    )
    .unwrap();
    assert_eq!(reopened.value(0, 3, 3).unwrap(), 1.0);
    assert_eq!(reopened.value(1, 3, 3).unwrap(), gradient_value(1, 3, 3));
}

#[test]
fn diff_size_mismatch_allocates_nothing() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    let used = s.arena().used();
    let wrong = dir.dump("wrong.bin", &[0.0; 10]);
    let err = s
        .execute_line(&format!("diff {}", wrong.display()))
        .unwrap_err();
    assert!(matches!(err, CommandError::Load(LoadError::SizeMismatch { .. })));
    assert!(s.ghost().is_none());
    assert_eq!(s.arena().used(), used);
}

#[test]
fn diff_shows_per_cell_delta() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    let zeros = dir.dump("zeros.bin", &[0.0; 192]);
    s.execute_line(&format!("diff {}", zeros.display())).unwrap();
    assert_eq!(s.delta(2, 3, 4).unwrap(), Some(gradient_value(2, 3, 4)));
}

// ── CSV round trip through commands ──────────────────────────────────

#[test]
fn export_then_import_copies_a_layer() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    let csv = dir.file("layer2.csv");
    s.execute_line("goto 2 0 0").unwrap();
    s.execute_line(&format!("export {}", csv.display())).unwrap();
    s.execute_line("goto 0 0 0").unwrap();
    s.execute_line(&format!("import {}", csv.display())).unwrap();
    assert_eq!(layer_values(&s, 0), layer_values(&s, 2));
}

// ── Diagnostics ──────────────────────────────────────────────────────

#[test]
fn health_flags_gradient_layer_two_as_exploding() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    s.execute_line("goto 2 0 0").unwrap();
    let Outcome::Health { report, .. } = s.execute_line("scan").unwrap() else {
        panic!("expected health report");
    };
    assert!(report.exploding);
    assert_eq!(report.nan, 0);
    assert_eq!(report.zero, 0);
}

#[test]
fn hist_of_gradient_layer_has_ten_bins() {
    let dir = DumpDir::new();
    let mut s = gradient_session(&dir);
    let Outcome::Histogram { distribution, .. } = s.execute_line("hist").unwrap() else {
        panic!("expected histogram");
    };
    let Distribution::Spread(h) = distribution else {
        panic!("expected spread distribution");
    };
    assert_eq!(h.counts.len(), 10);
    assert_eq!(h.total(), 64);
    assert_eq!((h.min, h.max), (0.0, 77.0));
}

// ── Property tests ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn cursor_always_inside_tensor(
        moves in proptest::collection::vec((0u8..3, -3isize..4), 0..40),
        d in 1usize..4, h in 1usize..6, w in 1usize..6,
    ) {
        let mut s = Session::new(EditorConfig::default(), Shape::new(d, h, w).unwrap()).unwrap();
        for (axis, delta) in moves {
            match axis {
                0 => s.move_layer(delta),
                1 => s.move_row(delta),
                _ => s.move_col(delta),
            }
            let c = s.cursor();
            prop_assert!(c.layer < d && c.row < h && c.col < w);
            let (rows, cols) = s.visible();
            prop_assert!(rows.contains(&c.row));
            prop_assert!(cols.contains(&c.col));
        }
    }
}
