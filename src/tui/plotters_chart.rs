//! Plotters-powered depot diagram widget for Ratatui.
//!
//! Edges are drawn as line segments and nodes as labeled points. Rendering goes
//! through `plotters-ratatui-backend`, which maps Plotters primitives onto the
//! terminal buffer.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Layout coordinates are normalized to [-1, 1]; leave room for labels.
const AXIS_LIMIT: f64 = 1.3;
const LABEL_OFFSET: f64 = 0.12;

/// A render-only description of the depot diagram.
///
/// All positions are computed outside the render call.
pub struct DepotPlottersChart<'a> {
    /// Edge segments `(from, to)`.
    pub segments: &'a [((f64, f64), (f64, f64))],
    /// Node positions, parallel to `labels`.
    pub nodes: &'a [(f64, f64)],
    pub labels: &'a [String],
}

impl<'a> Widget for DepotPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Diagram area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(-AXIS_LIMIT..AXIS_LIMIT, -AXIS_LIMIT..AXIS_LIMIT)?;

            let edge_color = RGBColor(0, 255, 255); // cyan
            let node_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(
                self.segments
                    .iter()
                    .map(|&(from, to)| PathElement::new(vec![from, to], &edge_color)),
            )?;

            // `Circle` radii are mapped incorrectly by the ratatui backend, so
            // nodes are single colored pixels.
            chart.draw_series(self.nodes.iter().map(|&p| Pixel::new(p, node_color)))?;

            chart.draw_series(self.nodes.iter().zip(self.labels).map(|(&(x, y), label)| {
                Text::new(
                    label.clone(),
                    (x, y + LABEL_OFFSET),
                    ("sans-serif", 10).into_font().color(&WHITE),
                )
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
