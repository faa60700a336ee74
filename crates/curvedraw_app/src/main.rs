// SPDX-License-Identifier: MIT OR Apache-2.0
//! curvedraw demo.
//!
//! Loads a curve set (or builds a demo one), rebuilds an 800x300 curve
//! drawing and writes the resulting draw commands to stdout as JSON.
//!
//! ```text
//! curvedraw [curves.ron] [style.ron]
//! ```
//!
//! Logging is controlled with `RUST_LOG`.

mod demo;

use curvedraw_curve::{CurveError, CurveSet, KeyframeRef};
use curvedraw_view::{CurveDrawing, CurveStyle, DrawCommand, DrawList, StyleError};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 300;

/// Errors that end the demo
#[derive(Debug, thiserror::Error)]
enum AppError {
    /// Curve file could not be loaded
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Style file could not be loaded
    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    /// Draw list could not be written
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
struct Args {
    curves: Option<PathBuf>,
    style: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut args = args.into_iter().map(PathBuf::from);
        Self {
            curves: args.next(),
            style: args.next(),
        }
    }
}

fn main() {
    // Targets match by prefix, so this covers every curvedraw crate
    let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "curvedraw=debug"
            .parse()
            .unwrap_or_else(|_| tracing::Level::DEBUG.into()),
    );

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting curvedraw v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse(std::env::args().skip(1));
    if let Err(e) = run(&args) {
        tracing::error!("curvedraw failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let curves = match &args.curves {
        Some(path) => {
            tracing::info!("Loading curves from {}", path.display());
            CurveSet::load(path)?
        }
        None => demo::demo_curves()?,
    };

    let style = match &args.style {
        Some(path) => {
            tracing::info!("Loading style from {}", path.display());
            CurveStyle::load(path)?
        }
        None => CurveStyle::default(),
    };

    let list = build(curves, style);
    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}

/// Rebuild the drawing with every keyframe of the last curve selected so its
/// tangent handles show up
fn build(curves: CurveSet, style: CurveStyle) -> DrawList {
    let mut drawing = CurveDrawing::new(WIDTH, HEIGHT, curves);
    drawing.set_style(style);

    if let Some(curve_idx) = drawing.curves().len().checked_sub(1) {
        let num_keys = drawing
            .curves()
            .get_index(curve_idx)
            .map_or(0, |curve| curve.keyframes().len());
        for key_idx in 0..num_keys {
            drawing.select_keyframe(KeyframeRef::new(curve_idx, key_idx), true);
        }
    }

    let mut list = DrawList::new();
    drawing.rebuild(&mut list);

    let (lines, poly_lines, strips) =
        list.commands()
            .iter()
            .fold((0, 0, 0), |(l, p, s), command| match command {
                DrawCommand::Line { .. } => (l + 1, p, s),
                DrawCommand::PolyLine { .. } => (l, p + 1, s),
                DrawCommand::TriangleStrip { .. } => (l, p, s + 1),
            });
    tracing::info!(
        "Drew {} curves: {lines} lines, {poly_lines} poly-lines, {strips} triangle strips",
        drawing.curves().len()
    );

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::parse(Vec::new());
        assert!(args.curves.is_none());
        assert!(args.style.is_none());

        let args = Args::parse(vec!["a.ron".to_string(), "b.ron".to_string()]);
        assert_eq!(args.curves, Some(PathBuf::from("a.ron")));
        assert_eq!(args.style, Some(PathBuf::from("b.ron")));
    }

    #[test]
    fn test_build_demo() {
        let list = build(demo::demo_curves().unwrap(), CurveStyle::default());
        assert!(!list.is_empty());

        // One poly-line per curve at the curve layer
        let style = CurveStyle::default();
        let curve_lines = list
            .commands()
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    DrawCommand::PolyLine { depth, .. } if *depth == style.background_depth
                )
            })
            .count();
        assert_eq!(curve_lines, 3);

        // Last command is the marked frame
        assert_eq!(
            list.commands().last().map(DrawCommand::depth),
            Some(style.marker_depth)
        );
    }

    #[test]
    fn test_missing_curve_file() {
        let args = Args {
            curves: Some(PathBuf::from("/nonexistent/curves.ron")),
            style: None,
        };
        assert!(matches!(run(&args), Err(AppError::Curve(CurveError::Io(_)))));
    }
}
