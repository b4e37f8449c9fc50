//! Tab bodies. Each view renders independently from its own inputs.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

use crate::data::{TRAIN_IDS, fleet, prediction_for};
use crate::domain::{InductionRow, NamedValue, RiskLevel, format_literal};
use crate::graph::{DepotGraph, spring_layout};

use super::plotters_chart::DepotPlottersChart;

/// Bar heights are integers; values are scaled by this factor first.
const BAR_SCALE: f64 = 1000.0;

pub(super) fn draw_fleet(frame: &mut Frame<'_>, area: Rect) {
    let header = Row::new(vec![
        "train_id",
        "mileage",
        "certificate_days_left",
        "failure_prob",
        "cleaning_status",
        "Risk Level",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows = fleet().into_iter().map(|r| {
        let risk = r.risk_level();
        Row::new(vec![
            Cell::from(r.train_id.clone()),
            Cell::from(r.mileage.to_string()),
            Cell::from(r.certificate_days_left.to_string()),
            Cell::from(format_literal(r.failure_prob)),
            Cell::from(r.cleaning_status.as_str()),
            Cell::from(Span::styled(risk.label(), Style::default().fg(risk_color(risk)))),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(22),
            Constraint::Length(13),
            Constraint::Length(16),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().title("Fleet Dashboard").borders(Borders::ALL));

    frame.render_widget(table, area);
}

pub(super) fn draw_plan(frame: &mut Frame<'_>, area: Rect, rows: &[InductionRow]) {
    let header = Row::new(vec!["Train", "Reason"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let body = rows
        .iter()
        .map(|r| Row::new(vec![r.train_id.clone(), r.reason.clone()]));

    let table = Table::new(body, [Constraint::Length(8), Constraint::Min(10)])
        .header(header)
        .block(Block::default().title("Smart Induction Plan").borders(Borders::ALL));

    frame.render_widget(table, area);
}

pub(super) fn draw_drill_down(frame: &mut Frame<'_>, area: Rect, train_id: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let mut selector = vec![Span::raw("Select a Train for Maintenance Insights: ")];
    for id in TRAIN_IDS {
        if id == train_id {
            selector.push(Span::styled(
                format!("[{id}]"),
                Style::default().fg(Color::Black).bg(Color::White),
            ));
        } else {
            selector.push(Span::raw(format!(" {id} ")));
        }
        selector.push(Span::raw(" "));
    }
    selector.push(Span::styled("(t/T)", Style::default().fg(Color::Gray)));

    let Some(prediction) = prediction_for(train_id) else {
        let p = Paragraph::new(Line::from(selector))
            .block(Block::default().title("Predictive Maintenance").borders(Borders::ALL));
        frame.render_widget(p, area);
        return;
    };

    let lines = vec![
        Line::from(selector),
        Line::from(""),
        Line::from(format!("Failure Probability (next 7 days) for {train_id}")),
        Line::from(Span::styled(
            prediction.failure_prob_label(),
            Style::default()
                .fg(risk_color(RiskLevel::from_probability(prediction.failure_prob)))
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let p = Paragraph::new(lines)
        .block(Block::default().title("Predictive Maintenance").borders(Borders::ALL));
    frame.render_widget(p, chunks[0]);

    draw_named_bars(frame, chunks[1], "Feature contributions", &prediction.features);
}

pub(super) fn draw_simulation(frame: &mut Frame<'_>, area: Rect, layout_seed: u64) {
    let block = Block::default()
        .title(format!("Depot Simulator (seed {layout_seed})"))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    // Recomputed on every draw; nothing is kept between render passes.
    let graph = DepotGraph::toy();
    let layout = spring_layout(&graph, layout_seed);
    let segments = layout.segments(&graph);
    let nodes = layout.points();

    let widget = DepotPlottersChart {
        segments: &segments,
        nodes: &nodes,
        labels: &graph.nodes,
    };
    frame.render_widget(widget, inner);
}

pub(super) fn draw_kpis(frame: &mut Frame<'_>, area: Rect, kpis: &[NamedValue]) {
    draw_named_bars(frame, area, "KPI Dashboard", kpis);
}

/// Horizontal bar chart with each bar labeled by its literal value.
fn draw_named_bars(frame: &mut Frame<'_>, area: Rect, title: &str, values: &[NamedValue]) {
    let bars: Vec<Bar> = bar_specs(values)
        .into_iter()
        .map(|spec| {
            Bar::default()
                .label(Line::from(spec.label))
                .value(spec.height)
                .text_value(spec.text)
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BarSpec {
    label: String,
    height: u64,
    text: String,
}

/// Prepare bar data: scaled integer heights (negative values draw nothing)
/// and the literal value as the bar text.
fn bar_specs(values: &[NamedValue]) -> Vec<BarSpec> {
    values
        .iter()
        .map(|v| BarSpec {
            label: v.name.clone(),
            height: (v.value.max(0.0) * BAR_SCALE).round() as u64,
            text: format_literal(v.value),
        })
        .collect()
}

fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fallback_plan;

    #[test]
    fn kpi_bar_specs_keep_order_and_literals() {
        let specs = bar_specs(&fallback_plan().kpis);
        let texts: Vec<&str> = specs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["0.05", "120", "0.9", "12"]);
        assert_eq!(specs[0].label, "failure_risk_avg");
        assert_eq!(specs[0].height, 50);
        assert_eq!(specs[1].height, 120_000);
    }

    #[test]
    fn negative_values_have_no_height() {
        let specs = bar_specs(&[NamedValue::new("x", -0.3)]);
        assert_eq!(specs[0].height, 0);
        assert_eq!(specs[0].text, "-0.3");
    }
}
