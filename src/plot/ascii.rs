//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal or a pipe
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - bars: `#`, each followed by the literal value
//! - depot edges: `.` line segments
//! - depot nodes: `o` with the node name above

use crate::domain::{NamedValue, format_literal};
use crate::graph::{DepotGraph, GraphLayout};

/// Render a horizontal bar chart, one row per value, in input order.
///
/// Bars are scaled to the largest value; negative values draw no bar.
pub fn render_bar_chart(title: &str, values: &[NamedValue], bar_width: usize) -> String {
    let bar_width = bar_width.max(1);
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    if values.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let label_width = values.iter().map(|v| v.name.chars().count()).max().unwrap_or(0);
    let max = values.iter().map(|v| v.value).fold(0.0_f64, f64::max);

    for v in values {
        let len = if max > 0.0 && v.value > 0.0 {
            ((v.value / max) * bar_width as f64).round().max(1.0) as usize
        } else {
            0
        };
        let row = format!(
            "{:<label_width$} | {} {}",
            v.name,
            "#".repeat(len),
            format_literal(v.value)
        );
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Render the depot layout on a `width` x `height` character grid.
pub fn render_depot(graph: &DepotGraph, layout: &GraphLayout, width: usize, height: usize) -> String {
    let width = width.max(20);
    let height = height.max(8);
    let mut grid = vec![vec![' '; width]; height];

    // Layout coordinates are within [-1, 1]; keep a one-row margin for labels.
    let (lo, hi) = (-1.05, 1.05);

    for ((x0, y0), (x1, y1)) in layout.segments(graph) {
        draw_line(
            &mut grid,
            map_x(x0, lo, hi, width),
            map_y(y0, lo, hi, height),
            map_x(x1, lo, hi, width),
            map_y(y1, lo, hi, height),
            '.',
        );
    }

    let cells: Vec<(usize, usize)> = layout
        .points()
        .into_iter()
        .map(|(x, y)| (map_x(x, lo, hi, width), map_y(y, lo, hi, height)))
        .collect();

    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    // Labels go above their node ("top center"); fall back to nearby rows when
    // that span is taken by another label or node.
    for (name, &(x, y)) in graph.nodes.iter().zip(&cells) {
        let len = name.chars().count();
        let start = x.saturating_sub(len / 2).min(width.saturating_sub(len));
        let candidates = [y as isize - 1, y as isize + 1, y as isize - 2, y as isize + 2];
        let in_bounds = |r: &isize| *r >= 0 && (*r as usize) < height;
        let row = candidates
            .iter()
            .copied()
            .filter(in_bounds)
            .find(|&r| span_is_free(&grid[r as usize], start, len))
            .or_else(|| candidates.iter().copied().find(in_bounds))
            .unwrap_or(0) as usize;
        for (i, ch) in name.chars().enumerate() {
            if let Some(cell) = grid[row].get_mut(start + i) {
                *cell = ch;
            }
        }
    }

    let mut out = String::new();
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn span_is_free(row: &[char], start: usize, len: usize) -> bool {
    row.iter()
        .skip(start)
        .take(len)
        .all(|&c| c == ' ' || c == '.')
}

fn map_x(x: f64, lo: f64, hi: f64, width: usize) -> usize {
    let u = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, lo: f64, hi: f64, height: usize) -> usize {
    let u = ((y - lo) / (hi - lo)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample;
    use crate::graph::{spring_layout, DEFAULT_LAYOUT_SEED};
    use nalgebra::Vector2;

    #[test]
    fn kpi_bars_carry_literal_values() {
        let kpis = sample::fallback_plan().kpis;
        let chart = render_bar_chart("KPI Dashboard", &kpis, 40);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "KPI Dashboard");
        assert!(lines[1].starts_with("failure_risk_avg  | ") && lines[1].ends_with(" 0.05"));
        assert!(lines[2].starts_with("shunting_time") && lines[2].ends_with(" 120"));
        assert!(lines[3].ends_with(" 0.9"));
        assert!(lines[4].ends_with(" 12"));
        // The largest value gets the full bar.
        assert_eq!(lines[2].matches('#').count(), 40);
    }

    #[test]
    fn non_positive_values_draw_no_bar() {
        let values = vec![NamedValue::new("a", -2.0), NamedValue::new("b", 0.0)];
        let chart = render_bar_chart("t", &values, 10);
        assert_eq!(chart.matches('#').count(), 0);
        assert!(chart.contains("a |  -2"));
        assert_eq!(render_bar_chart("t", &[], 10), "t\n(no data)\n");
    }

    #[test]
    fn depot_render_labels_every_node() {
        let graph = DepotGraph::toy();
        let layout = spring_layout(&graph, DEFAULT_LAYOUT_SEED);
        let text = render_depot(&graph, &layout, 80, 24);
        assert_eq!(text.lines().count(), 24);
        for name in ["Depot", "Bay1", "Bay2", "Track1", "Track2"] {
            assert!(text.contains(name), "missing label {name}:\n{text}");
        }
        assert!(text.contains('.'));
    }

    #[test]
    fn fixed_layout_maps_to_corners() {
        let graph = DepotGraph::from_edges(&[("A", "B")]);
        let layout = GraphLayout {
            positions: vec![Vector2::new(-1.0, 1.0), Vector2::new(1.0, -1.0)],
        };
        let text = render_depot(&graph, &layout, 21, 9);
        let lines: Vec<&str> = text.lines().collect();
        // A sits near the top-left, its label below it.
        assert!(lines[0].starts_with('o'));
        assert!(lines[1].starts_with('A'));
        // B sits near the bottom-right, its label above it.
        assert!(lines[8].ends_with('o'));
        assert!(lines[7].ends_with('B'));
    }
}
