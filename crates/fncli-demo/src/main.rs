//! Worked example of an fncli application.
//!
//! Three ordinary functions become subcommands: `factorial` renders its
//! return value to stdout, `avg_col` averages a CSV column loaded
//! through the table coercion, and `plot_cols` draws a small SVG chart
//! that the artifact renderer persists to `--filename`.
//!
//! ```text
//! fncli-demo factorial 5
//! fncli-demo avg_col data.csv y
//! fncli-demo plot_cols data.csv x y --filename chart.svg
//! fncli-demo --batch commands.txt
//! ```

use anyhow::{ensure, Context, Result};
use fncli::{App, ArgValue, CommandDecl, Output, OutputKind, TypeTag};

const FACTORIAL_DOC: &str = "\
Calculates the factorial of a nonnegative integer n.

Args:
    n (int): Integer to calculate the factorial of.

Returns:
    int: Factorial of the argument.";

fn factorial(args: &[ArgValue]) -> Result<Output> {
    let n = args
        .first()
        .and_then(ArgValue::as_int)
        .context("expected an integer argument")?;
    ensure!(n >= 0, "factorial argument n must be a natural number");

    let mut acc: i64 = 1;
    for i in 2..=n {
        acc = acc
            .checked_mul(i)
            .context("factorial overflows a 64-bit integer")?;
    }
    Output::render(acc)
}

const AVG_DOC: &str = "\
Averages a numeric column of a CSV table.

Args:
    table (table): Path of the CSV table to read.
    column (str): Name of the column to average.

Returns:
    float: Arithmetic mean of the column.";

fn avg_col(args: &[ArgValue]) -> Result<Output> {
    let table = args
        .first()
        .and_then(ArgValue::as_table)
        .context("expected a table argument")?;
    let column = args
        .get(1)
        .and_then(ArgValue::as_str)
        .context("expected a column name")?;

    let values = table.numeric_column(column)?;
    ensure!(!values.is_empty(), "column `{column}` is empty");
    Output::render(values.iter().sum::<f64>() / values.len() as f64)
}

const PLOT_DOC: &str = "\
Plots a value column against an index column of a CSV table.

Args:
    table (table): Path of the CSV table to plot.
    index_col (str): Name of the column to use as the index.
    value_col (str): Name of the column to use for values.

Returns:
    none: Nothing.";

fn plot_cols(args: &[ArgValue]) -> Result<Output> {
    let table = args
        .first()
        .and_then(ArgValue::as_table)
        .context("expected a table argument")?;
    let index_col = args
        .get(1)
        .and_then(ArgValue::as_str)
        .context("expected an index column name")?;
    let value_col = args
        .get(2)
        .and_then(ArgValue::as_str)
        .context("expected a value column name")?;

    let xs = table.numeric_column(index_col)?;
    let ys = table.numeric_column(value_col)?;
    ensure!(!xs.is_empty(), "nothing to plot");

    Ok(Output::artifact(line_chart_svg(&xs, &ys)))
}

/// Renders the series as an SVG polyline, scaled into a fixed viewport.
fn line_chart_svg(xs: &[f64], ys: &[f64]) -> String {
    const WIDTH: f64 = 640.0;
    const HEIGHT: f64 = 480.0;
    const MARGIN: f64 = 40.0;

    let span = |values: &[f64]| {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Degenerate span: center the points instead of dividing by zero.
        if max > min {
            (min, max - min)
        } else {
            (min - 0.5, 1.0)
        }
    };
    let (x_min, x_span) = span(xs);
    let (y_min, y_span) = span(ys);

    let points: Vec<String> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| {
            let px = MARGIN + (x - x_min) / x_span * (WIDTH - 2.0 * MARGIN);
            let py = HEIGHT - MARGIN - (y - y_min) / y_span * (HEIGHT - 2.0 * MARGIN);
            format!("{px:.1},{py:.1}")
        })
        .collect();

    format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" ",
            "width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            "  <rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>\n",
            "  <polyline fill=\"none\" stroke=\"black\" points=\"{points}\"/>\n",
            "</svg>\n"
        ),
        w = WIDTH,
        h = HEIGHT,
        points = points.join(" ")
    )
}

fn build_app() -> Result<App, fncli::RegistrationError> {
    let mut app = App::new("fncli-demo").about("Function based commands.");
    app.register(
        CommandDecl::new("factorial", FACTORIAL_DOC).param("n", TypeTag::Int),
        OutputKind::Default,
        factorial,
    )?;
    app.register(
        CommandDecl::new("avg_col", AVG_DOC)
            .param("table", TypeTag::Table)
            .param("column", TypeTag::Str),
        OutputKind::Default,
        avg_col,
    )?;
    app.register(
        CommandDecl::new("plot_cols", PLOT_DOC)
            .param("table", TypeTag::Table)
            .param("index_col", TypeTag::Str)
            .param("value_col", TypeTag::Str),
        OutputKind::ArtifactSave,
        plot_cols,
    )?;
    Ok(app)
}

fn main() {
    let app = match build_app() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("fncli-demo: {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = app.run(std::env::args()) {
        eprintln!("fncli-demo: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fncli::{Outcome, Table};

    #[test]
    fn test_factorial_function() {
        let out = factorial(&[ArgValue::Int(5)]).unwrap();
        assert_eq!(out, Output::Render(serde_json::json!(120)));
    }

    #[test]
    fn test_factorial_rejects_negative() {
        let err = factorial(&[ArgValue::Int(-3)]).unwrap_err();
        assert!(err.to_string().contains("natural number"));
    }

    #[test]
    fn test_factorial_overflow() {
        let err = factorial(&[ArgValue::Int(21)]).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_avg_col_function() {
        let table = Table::new(
            vec!["x".into(), "y".into()],
            vec![
                vec!["1".into(), "6".into()],
                vec!["4".into(), "2".into()],
                vec!["9".into(), "10".into()],
            ],
        )
        .unwrap();
        let out = avg_col(&[ArgValue::Table(table), ArgValue::Str("y".into())]).unwrap();
        assert_eq!(out, Output::Render(serde_json::json!(6.0)));
    }

    #[test]
    fn test_line_chart_svg_shape() {
        let svg = line_chart_svg(&[1.0, 4.0, 9.0], &[6.0, 2.0, 10.0]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("polyline"));
        assert_eq!(svg.matches(',').count(), 3);
    }

    #[test]
    fn test_app_dispatches_factorial() {
        let app = build_app().unwrap();
        let outcome = app.dispatch(["factorial", "5"]).unwrap();
        assert_eq!(outcome, Outcome::Rendered("120".into()));
    }

    #[test]
    fn test_plot_cols_end_to_end() {
        use std::io::Write as _;

        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&csv).unwrap();
        writeln!(file, "x,y").unwrap();
        writeln!(file, "1,6").unwrap();
        writeln!(file, "4,2").unwrap();
        drop(file);

        let out = dir.path().join("chart.svg");
        let app = build_app().unwrap();
        let outcome = app
            .dispatch([
                "plot_cols",
                csv.to_str().unwrap(),
                "x",
                "y",
                "--filename",
                out.to_str().unwrap(),
            ])
            .unwrap();

        assert_eq!(outcome, Outcome::Saved(out.clone()));
        assert!(std::fs::read_to_string(out).unwrap().contains("<svg"));
    }
}
