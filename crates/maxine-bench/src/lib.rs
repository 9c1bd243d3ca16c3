//! Benchmark fixtures for the Maxine tensor editor.
//!
//! - [`mixed_values`]: deterministic values spanning negatives, zeros and
//!   outliers, so the diagnostics take every branch
//! - [`session_with`]: a session whose tensor holds those values

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use maxine_arena::ArenaConfig;
use maxine_editor::{EditorConfig, Session};
use maxine_tensor::Shape;

/// Deterministic values in roughly `[-200, 200]`, with every seventh
/// value zero.
pub fn mixed_values(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            if i % 7 == 0 {
                0.0
            } else {
                (i as f32 * 0.618).sin() * 200.0
            }
        })
        .collect()
}

/// A session of `shape` whose first layer holds [`mixed_values`].
///
/// The arena is sized to hold the tensor plus a same-shaped ghost.
///
/// # Panics
///
/// Panics if the shape is empty or the session cannot be created.
pub fn session_with(shape: Shape) -> Session {
    let bytes = shape.byte_len() * 2 + 4096;
    let config = EditorConfig {
        arena: ArenaConfig::new(bytes),
        ..EditorConfig::default()
    };
    let mut session = Session::new(config, shape).expect("benchmark session");
    let values = mixed_values(shape.layer_len());
    for (i, v) in values.into_iter().enumerate() {
        let (row, col) = (i / shape.cols(), i % shape.cols());
        session
            .execute_line(&format!("goto 0 {row} {col}"))
            .expect("goto");
        session.set_cell(v).expect("set_cell");
    }
    session
}
