//! Integration test: binary dump loading, saving, and CSV layer exchange.
//!
//! Exercises the file-facing paths against real files in a temp dir,
//! including every length violation the loaders must reject before the
//! arena is touched.

use maxine_arena::Arena;
use maxine_tensor::{
    csv, export_layer, import_layer, load_binary, read_into, save_binary, FillPolicy, LoadError,
    Shape, Tensor,
};
use maxine_test_utils::{gradient_value, gradient_values, DumpDir};
use proptest::prelude::*;

fn arena() -> Arena {
    Arena::with_capacity(1024 * 1024).unwrap()
}

// ── Strict loading ───────────────────────────────────────────────────

#[test]
fn loads_exact_768_byte_dump() {
    let dir = DumpDir::new();
    let path = dir.gradient("weights.bin", 3, 8, 8);
    let mut a = arena();
    let t = load_binary(&mut a, &path, Shape::new(3, 8, 8).unwrap()).unwrap();
    assert_eq!(t.size(), 192);
    assert_eq!(t.get(&a, 0, 0, 0).unwrap(), 0.0);
    assert_eq!(t.get(&a, 2, 7, 7).unwrap(), gradient_value(2, 7, 7));
    assert_eq!(t.get(&a, 1, 3, 4).unwrap(), 134.0);
}

#[test]
fn size_mismatch_rejected_without_allocating() {
    let dir = DumpDir::new();
    let path = dir.dump("short.bin", &[1.0; 10]);
    let mut a = arena();
    let err = load_binary(&mut a, &path, Shape::new(3, 8, 8).unwrap()).unwrap_err();
    match err {
        LoadError::SizeMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, 768);
            assert_eq!(actual, 40);
        }
        other => panic!("expected SizeMismatch, got {other:?}"),
    }
    assert_eq!(a.used(), 0);
}

#[test]
fn missing_file_is_not_found() {
    let dir = DumpDir::new();
    let mut a = arena();
    let err = load_binary(&mut a, dir.file("nope.bin"), Shape::unit()).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
}

#[test]
fn dump_larger_than_arena_is_out_of_memory() {
    let dir = DumpDir::new();
    let path = dir.gradient("big.bin", 1, 8, 8);
    let mut a = Arena::with_capacity(64).unwrap();
    let err = load_binary(&mut a, &path, Shape::new(1, 8, 8).unwrap()).unwrap_err();
    match err {
        LoadError::Tensor(e) => assert!(e.is_out_of_memory()),
        other => panic!("expected allocation failure, got {other:?}"),
    }
}

// ── Loading into an existing tensor ──────────────────────────────────

#[test]
fn read_into_at_most_keeps_remainder() {
    let dir = DumpDir::new();
    let path = dir.dump("part.bin", &[1.0, 2.0, 3.0]);
    let mut a = arena();
    let t = Tensor::zeros(&mut a, Shape::new(1, 2, 4).unwrap()).unwrap();
    t.data_mut(&mut a).unwrap().fill(-1.0);
    let n = read_into(&mut a, &t, &path, FillPolicy::AtMost).unwrap();
    assert_eq!(n, 12);
    assert_eq!(
        t.data(&a).unwrap(),
        &[1.0, 2.0, 3.0, -1.0, -1.0, -1.0, -1.0, -1.0]
    );
}

#[test]
fn read_into_at_most_rejects_oversized_file() {
    let dir = DumpDir::new();
    let path = dir.dump("big.bin", &[5.0; 9]);
    let mut a = arena();
    let t = Tensor::zeros(&mut a, Shape::new(1, 2, 4).unwrap()).unwrap();
    let err = read_into(&mut a, &t, &path, FillPolicy::AtMost).unwrap_err();
    assert!(matches!(
        err,
        LoadError::TooLarge {
            capacity: 32,
            actual: 36,
            ..
        }
    ));
    assert!(t.data(&a).unwrap().iter().all(|&v| v == 0.0));
}

#[test]
fn read_into_exact_rejects_short_file() {
    let dir = DumpDir::new();
    let path = dir.dump("short.bin", &[5.0; 3]);
    let mut a = arena();
    let t = Tensor::zeros(&mut a, Shape::new(1, 2, 2).unwrap()).unwrap();
    let err = read_into(&mut a, &t, &path, FillPolicy::Exact).unwrap_err();
    assert!(matches!(err, LoadError::SizeMismatch { .. }));
}

// ── Saving ───────────────────────────────────────────────────────────

#[test]
fn save_truncates_existing_file() {
    let dir = DumpDir::new();
    let path = dir.dump("out.bin", &[9.0; 100]);
    let mut a = arena();
    let t = Tensor::zeros(&mut a, Shape::new(1, 1, 2).unwrap()).unwrap();
    let written = save_binary(&a, &t, &path).unwrap();
    assert_eq!(written, 8);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 8);
}

#[test]
fn save_to_unwritable_path_fails() {
    let dir = DumpDir::new();
    let mut a = arena();
    let t = Tensor::zeros(&mut a, Shape::unit()).unwrap();
    let err = save_binary(&a, &t, dir.file("no/such/dir/out.bin")).unwrap_err();
    assert!(matches!(
        err,
        LoadError::NotFound { .. } | LoadError::Io { .. }
    ));
}

// ── CSV layers ───────────────────────────────────────────────────────

#[test]
fn csv_export_then_import_into_other_layer() {
    let dir = DumpDir::new();
    let src = dir.gradient("g.bin", 2, 3, 4);
    let csv_path = dir.file("layer1.csv");
    let mut a = arena();
    let t = load_binary(&mut a, &src, Shape::new(2, 3, 4).unwrap()).unwrap();

    export_layer(&a, &t, 1, &csv_path).unwrap();
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(text.starts_with("# Maxine Tensor Dump\n# Shape: [2, 3, 4]\n# Layer Index: 1\n"));
    assert!(text.contains("\nA,B,C,D\n"));
    assert!(text.contains("\n100,101,102,103\n"));

    let summary = import_layer(&mut a, &t, 0, &csv_path).unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.written, 12);
    assert_eq!(t.layer(&a, 0).unwrap(), t.layer(&a, 1).unwrap());
}

#[test]
fn csv_import_of_hand_written_file() {
    let dir = DumpDir::new();
    let path = dir.text("hand.csv", "X,Y\n 1.5 , 2\nbad row\n3,nan-ish,99\n");
    let mut a = arena();
    let t = Tensor::zeros(&mut a, Shape::new(1, 2, 2).unwrap()).unwrap();
    let summary = import_layer(&mut a, &t, 0, &path).unwrap();
    assert_eq!(t.data(&a).unwrap(), &[1.5, 2.0, 3.0, 0.0]);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn csv_export_of_missing_layer_fails() {
    let dir = DumpDir::new();
    let mut a = arena();
    let t = Tensor::zeros(&mut a, Shape::new(1, 2, 2).unwrap()).unwrap();
    assert!(export_layer(&a, &t, 5, dir.file("x.csv")).is_err());
    assert_eq!(csv::column_label(30), 'E');
}

// ── Property tests ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn save_then_load_is_bit_exact(
        values in proptest::collection::vec(any::<f32>(), 1..256),
    ) {
        let dir = DumpDir::new();
        let path = dir.file("rt.bin");
        let mut a = arena();
        let shape = Shape::new(1, 1, values.len()).unwrap();
        let t = Tensor::create(&mut a, shape).unwrap();
        t.data_mut(&mut a).unwrap().copy_from_slice(&values);
        save_binary(&a, &t, &path).unwrap();

        a.reset();
        let back = load_binary(&mut a, &path, shape).unwrap();
        let got: Vec<u32> = back.data(&a).unwrap().iter().map(|v| v.to_bits()).collect();
        let want: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn gradient_loads_at_every_coordinate(d in 1usize..4, h in 1usize..6, w in 1usize..6) {
        let dir = DumpDir::new();
        let path = dir.gradient("g.bin", d, h, w);
        let mut a = arena();
        let t = load_binary(&mut a, &path, Shape::new(d, h, w).unwrap()).unwrap();
        let expected = gradient_values(d, h, w);
        prop_assert_eq!(t.data(&a).unwrap(), expected.as_slice());
    }
}
