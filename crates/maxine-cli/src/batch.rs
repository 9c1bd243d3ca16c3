//! Headless execution of `--exec` command lines.

use std::io::{self, Write};

use maxine_editor::Session;
use tracing::info;

/// Counts from one batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BatchSummary {
    /// Lines run.
    pub total: usize,
    /// Lines that returned an error.
    pub failed: usize,
}

/// Run each line in order. Results go to `out`, errors to `err`; a
/// failing line does not stop the ones after it.
pub(crate) fn run_batch<S: AsRef<str>>(
    session: &mut Session,
    lines: &[S],
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for line in lines {
        let line = line.as_ref();
        summary.total += 1;
        match session.execute_line(line) {
            Ok(outcome) => writeln!(out, "{outcome}")?,
            Err(e) => {
                summary.failed += 1;
                writeln!(err, "[ERROR] {line}: {e}")?;
            }
        }
    }
    info!(total = summary.total, failed = summary.failed, "batch finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxine_editor::EditorConfig;
    use maxine_tensor::Shape;
    use maxine_test_utils::DumpDir;

    fn run(session: &mut Session, lines: &[&str]) -> (BatchSummary, String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let summary = run_batch(session, lines, &mut out, &mut err).unwrap();
        (
            summary,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn runs_lines_in_order() {
        let mut s = Session::new(EditorConfig::default(), Shape::new(1, 2, 2).unwrap()).unwrap();
        let (summary, out, err) = run(&mut s, &["fill 2", ":stats"]);
        assert_eq!(summary, BatchSummary { total: 2, failed: 0 });
        assert!(out.contains("Filled layer 0 with 2."));
        assert!(out.contains("Stats (Layer 0): Min=2"));
        assert!(err.is_empty());
    }

    #[test]
    fn failures_are_counted_and_do_not_stop_the_run() {
        let mut s = Session::new(EditorConfig::default(), Shape::unit()).unwrap();
        let (summary, out, err) = run(&mut s, &["explode", "clip 1", "fill 9"]);
        assert_eq!(summary, BatchSummary { total: 3, failed: 2 });
        assert!(err.contains("[ERROR] explode: unknown command 'explode'"));
        assert!(err.contains("usage: :clip min max"));
        assert!(out.contains("Filled layer 0 with 9."));
        assert_eq!(s.value(0, 0, 0).unwrap(), 9.0);
    }

    #[test]
    fn edit_and_save_headless() {
        let dir = DumpDir::new();
        let src = dir.gradient("w.bin", 1, 2, 2);
        let mut s = Session::open(EditorConfig::default(), &src, Shape::new(1, 2, 2).unwrap())
            .unwrap();
        let (summary, _, _) = run(&mut s, &["relu", "norm", "save"]);
        assert_eq!(summary.failed, 0);
        assert_eq!(std::fs::metadata(&src).unwrap().len(), 16);
    }
}
