//! CLI dispatch for the `cmx draw` command.
//!
//! Parses the ordered operation list and replays it through one document.

use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

use crate::config::CharmatrixConfig;
use crate::document::{Brush, Document};
use crate::export::{save_snapshot, ExportOptions};
use crate::models::{Cell, Coord};
use crate::shapes::ShapeKind;

use super::{open_document, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// One editing step on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    Paint(Coord),
    Erase(Coord),
    Line(Coord, Coord),
    Rect(Coord, Coord),
    Ellipse(Coord, Coord),
    Resize(usize, usize),
    Clear,
    Undo,
    Redo,
}

/// Parse `"a,b,..."` into exactly `N` integers.
fn parse_ints<const N: usize>(args: &str) -> Result<[i32; N], String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {} comma-separated integers, got '{}'", N, args));
    }
    let mut out = [0i32; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| format!("invalid integer '{}'", part))?;
    }
    Ok(out)
}

/// Parse `"RxC"` into grid dimensions.
fn parse_dims(args: &str) -> Result<(usize, usize), String> {
    let (rows, cols) = args
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected RxC, got '{}'", args))?;
    let rows = rows.trim().parse().map_err(|_| format!("invalid row count '{}'", rows))?;
    let cols = cols.trim().parse().map_err(|_| format!("invalid column count '{}'", cols))?;
    Ok((rows, cols))
}

impl FromStr for DrawOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, args) = match s.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (s, None),
        };

        match (name.to_ascii_lowercase().as_str(), args) {
            ("clear", None) => Ok(DrawOp::Clear),
            ("undo", None) => Ok(DrawOp::Undo),
            ("redo", None) => Ok(DrawOp::Redo),
            ("paint", Some(a)) => parse_ints::<2>(a).map(|[r, c]| DrawOp::Paint((r, c))),
            ("erase", Some(a)) => parse_ints::<2>(a).map(|[r, c]| DrawOp::Erase((r, c))),
            ("line", Some(a)) => {
                parse_ints::<4>(a).map(|[r1, c1, r2, c2]| DrawOp::Line((r1, c1), (r2, c2)))
            }
            ("rect" | "rectangle", Some(a)) => {
                parse_ints::<4>(a).map(|[r1, c1, r2, c2]| DrawOp::Rect((r1, c1), (r2, c2)))
            }
            ("ellipse" | "circle", Some(a)) => {
                parse_ints::<4>(a).map(|[r1, c1, r2, c2]| DrawOp::Ellipse((r1, c1), (r2, c2)))
            }
            ("resize", Some(a)) => parse_dims(a).map(|(r, c)| DrawOp::Resize(r, c)),
            ("clear" | "undo" | "redo", Some(_)) => Err(format!("'{}' takes no arguments", name)),
            (
                "paint" | "erase" | "line" | "rect" | "rectangle" | "ellipse" | "circle" | "resize",
                None,
            ) => Err(format!("'{}' needs arguments, e.g. {}:...", name, name)),
            _ => Err(format!("unknown operation '{}'", name)),
        }
    }
}

/// Apply one operation. Returns false if it had no effect (out of grid, locked, empty history).
pub(crate) fn apply(doc: &mut Document, op: DrawOp, brush: &Brush) -> bool {
    match op {
        DrawOp::Paint(at) => doc.paint(at, brush),
        DrawOp::Erase(at) => doc.erase(at, brush.lock()),
        DrawOp::Line(a, b) => !doc.draw_shape(ShapeKind::Line, a, b, brush).is_empty(),
        DrawOp::Rect(a, b) => !doc.draw_shape(ShapeKind::Rectangle, a, b, brush).is_empty(),
        DrawOp::Ellipse(a, b) => !doc.draw_shape(ShapeKind::Ellipse, a, b, brush).is_empty(),
        DrawOp::Resize(rows, cols) => {
            doc.resize(rows, cols);
            true
        }
        DrawOp::Clear => {
            doc.clear();
            true
        }
        DrawOp::Undo => doc.undo(),
        DrawOp::Redo => doc.redo(),
    }
}

/// Execute the draw command.
pub fn run_draw(
    input: &Path,
    ops: &[DrawOp],
    character: &str,
    color: &str,
    lock: Option<&str>,
    output: Option<&Path>,
    config: &CharmatrixConfig,
) -> ExitCode {
    if !Cell::is_valid_character(character) {
        eprintln!("Error: --char {:?} must not contain whitespace or control characters", character);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let mut doc = match open_document(input, config) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let mut brush = Brush::new(character, color);
    brush.lock = lock.map(str::to_string);

    for op in ops {
        if !apply(&mut doc, *op, &brush) {
            eprintln!("Warning: {:?} had no effect", op);
        }
    }

    let target = output.unwrap_or(input);
    match save_snapshot(&doc.snapshot(), target, &ExportOptions::default()) {
        Ok(()) => {
            eprintln!("Wrote: {} ({}x{})", target.display(), doc.rows(), doc.cols());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
