//! Batch execution.
//!
//! Replays argument lines from a file or stdin against the registry,
//! one line at a time and strictly in source order. A failing line is
//! reported to stderr and counted; the batch never aborts on it. This is
//! the opposite of single-invocation mode, where any dispatch error is
//! fatal for the process.

use crate::dispatch::App;
use crate::error::DispatchError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Lines that dispatched and rendered successfully.
    pub executed: usize,
    /// Lines that failed (unknown command, arity, coercion, execution,
    /// or render errors).
    pub failed: usize,
}

impl BatchReport {
    /// Total non-blank lines processed.
    pub fn total(&self) -> usize {
        self.executed + self.failed
    }
}

impl App {
    /// Runs argument lines from `source`, or from stdin when absent.
    ///
    /// Blank lines are skipped; every other line is whitespace-tokenized
    /// and dispatched. Rendered outcomes go to stdout, per-line failures
    /// to stderr.
    ///
    /// # Errors
    ///
    /// Only source-level failures (the batch file cannot be opened or
    /// read) abort the run; per-line dispatch failures do not.
    pub fn run_batch(&self, source: Option<&Path>) -> Result<BatchReport, DispatchError> {
        match source {
            Some(path) => {
                let file = File::open(path).map_err(|source| DispatchError::BatchSource {
                    path: path.to_path_buf(),
                    source,
                })?;
                self.run_batch_lines(BufReader::new(file))
            }
            None => self.run_batch_lines(io::stdin().lock()),
        }
    }

    fn run_batch_lines<R: BufRead>(&self, reader: R) -> Result<BatchReport, DispatchError> {
        let mut report = BatchReport::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            match self.dispatch(tokens) {
                Ok(outcome) => {
                    self.emit(outcome)?;
                    report.executed += 1;
                }
                Err(err) => {
                    eprintln!("{}: line {}: {err}", self.name(), idx + 1);
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::{ArgValue, TypeTag};
    use crate::render::Output;
    use crate::schema::{CommandDecl, OutputKind};
    use std::io::Cursor;
    use std::io::Write as _;

    const FACTORIAL_DOC: &str = "\
Calculates the factorial of a nonnegative integer n.

Args:
    n (int): Integer to calculate the factorial of.

Returns:
    int: Factorial of the argument.";

    fn sample_app() -> App {
        let mut app = App::new("sample");
        app.register(
            CommandDecl::new("factorial", FACTORIAL_DOC).param("n", TypeTag::Int),
            OutputKind::Default,
            |args: &[ArgValue]| {
                let n = args[0].as_int().unwrap();
                anyhow::ensure!(n >= 0, "factorial argument n must be a natural number");
                Output::render((1..=n).product::<i64>())
            },
        )
        .unwrap();
        app
    }

    #[test]
    fn test_batch_continues_past_bad_line() {
        let app = sample_app();
        let input = Cursor::new("factorial 3\nunknown_cmd 1\nfactorial 4\n");
        let report = app.run_batch_lines(input).unwrap();
        assert_eq!(report, BatchReport { executed: 2, failed: 1 });
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_batch_skips_blank_lines() {
        let app = sample_app();
        let input = Cursor::new("\nfactorial 3\n\n   \nfactorial 4\n");
        let report = app.run_batch_lines(input).unwrap();
        assert_eq!(report, BatchReport { executed: 2, failed: 0 });
    }

    #[test]
    fn test_batch_counts_coercion_and_execution_failures() {
        let app = sample_app();
        let input = Cursor::new("factorial abc\nfactorial -3\nfactorial 2\n");
        let report = app.run_batch_lines(input).unwrap();
        assert_eq!(report, BatchReport { executed: 1, failed: 2 });
    }

    #[test]
    fn test_batch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "factorial 5").unwrap();
        writeln!(file, "factorial 0").unwrap();

        let app = sample_app();
        let report = app.run_batch(Some(file.path())).unwrap();
        assert_eq!(report, BatchReport { executed: 2, failed: 0 });
    }

    #[test]
    fn test_batch_missing_file() {
        let app = sample_app();
        let err = app.run_batch(Some(Path::new("/no/such/batch.txt"))).unwrap_err();
        assert!(matches!(err, DispatchError::BatchSource { .. }));
    }
}
