//! Ratatui-based terminal dashboard.
//!
//! The sidebar holds the objective weights, the required capacity and the
//! "Generate Induction Plan" button; the main pane shows five tabs (fleet,
//! plan, maintenance drill-down, depot simulation, KPIs).
//!
//! Every widget interaction is one render pass. A pass that was not triggered
//! by the button shows the fallback plan; a triggered pass blocks on the
//! planning API and any failure ends the session with that error.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};

use crate::app::pipeline::{self, PlanOutcome};
use crate::data::{PlannerClient, TRAIN_IDS};
use crate::domain::{
    CAPACITY_MAX, CAPACITY_MIN, PlanSource, WEIGHT_STEP, WEIGHT_STEP_COARSE, WeightConfig,
    WeightField,
};
use crate::error::AppError;

mod plotters_chart;
mod views;

/// Start the TUI.
pub fn run(client: PlannerClient, layout_seed: u64) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client, layout_seed)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit,
/// including when a render pass fails.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    FleetStatus,
    OptimizationPlan,
    MaintenanceDrillDown,
    Simulation,
    Kpis,
}

impl Tab {
    const ALL: [Tab; 5] = [
        Tab::FleetStatus,
        Tab::OptimizationPlan,
        Tab::MaintenanceDrillDown,
        Tab::Simulation,
        Tab::Kpis,
    ];

    fn title(self) -> &'static str {
        match self {
            Tab::FleetStatus => "Fleet Status",
            Tab::OptimizationPlan => "Optimization Plan",
            Tab::MaintenanceDrillDown => "Maintenance Drill-Down",
            Tab::Simulation => "Simulation",
            Tab::Kpis => "KPIs",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Sidebar controls, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Weight(WeightField),
    Capacity,
    Generate,
}

const CONTROLS: [Control; 6] = [
    Control::Weight(WeightField::Safety),
    Control::Weight(WeightField::Shunting),
    Control::Weight(WeightField::Branding),
    Control::Weight(WeightField::MileageBalance),
    Control::Capacity,
    Control::Generate,
];

const SIDEBAR_WIDTH: u16 = 34;
const SLIDER_CELLS: usize = 20;

struct App {
    weights: WeightConfig,
    selected_control: usize,
    tab: Tab,
    train_index: usize,
    layout_seed: u64,
    outcome: PlanOutcome,
    status: String,
    client: PlannerClient,
}

impl App {
    fn new(client: PlannerClient, layout_seed: u64) -> Result<Self, AppError> {
        let weights = WeightConfig::default();
        let outcome = pipeline::sample_outcome(weights.to_request())?;
        Ok(Self {
            weights,
            selected_control: 0,
            tab: Tab::FleetStatus,
            train_index: 0,
            layout_seed,
            outcome,
            status: format!("Planner endpoint: {}", client.endpoint()),
            client,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.triggers_generate(key.code) {
                        // The call blocks; show that before it starts.
                        self.status = format!("Requesting plan from {}...", self.client.endpoint());
                        terminal
                            .draw(|f| self.draw(f))
                            .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Whether `code` starts a plan request in the current state.
    fn triggers_generate(&self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('g') => true,
            KeyCode::Enter => CONTROLS[self.selected_control] == Control::Generate,
            _ => false,
        }
    }

    /// Apply one key press. Returns `Ok(true)` when the user quits.
    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => {
                self.selected_control = self.selected_control.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_control + 1 < CONTROLS.len() {
                    self.selected_control += 1;
                }
            }
            KeyCode::Left => self.adjust_control(-1, false)?,
            KeyCode::Right => self.adjust_control(1, false)?,
            KeyCode::PageDown => self.adjust_control(-1, true)?,
            KeyCode::PageUp => self.adjust_control(1, true)?,
            KeyCode::Enter | KeyCode::Char('g') => {
                if self.triggers_generate(code) {
                    self.generate()?;
                } else {
                    self.status = "Select the Generate button (↓) or press g.".to_string();
                }
            }
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::ALL[idx];
            }
            KeyCode::Char('t') => {
                self.train_index = (self.train_index + 1) % TRAIN_IDS.len();
                self.widget_changed()?;
                self.status = format!("Train: {}", self.selected_train());
            }
            KeyCode::Char('T') => {
                self.train_index = (self.train_index + TRAIN_IDS.len() - 1) % TRAIN_IDS.len();
                self.widget_changed()?;
                self.status = format!("Train: {}", self.selected_train());
            }
            KeyCode::Char('l') => {
                self.layout_seed = self.layout_seed.wrapping_add(1);
                tracing::debug!(seed = self.layout_seed, "depot layout reseeded");
                self.status = format!("Layout seed: {}", self.layout_seed);
            }
            KeyCode::Char('e') => self.export_plan(),
            _ => {}
        }

        Ok(false)
    }

    fn adjust_control(&mut self, direction: i32, coarse: bool) -> Result<(), AppError> {
        match CONTROLS[self.selected_control] {
            Control::Weight(field) => {
                let step = if coarse { WEIGHT_STEP_COARSE } else { WEIGHT_STEP };
                self.weights.adjust_weight(field, step * direction as f64);
                self.widget_changed()?;
                self.status = format!("{}: {:.2}", field.label(), self.weights.weight(field));
            }
            Control::Capacity => {
                let step = if coarse { 5 } else { 1 };
                self.weights.adjust_capacity(step * direction);
                self.widget_changed()?;
                self.status = format!("Required Capacity: {}", self.weights.capacity);
            }
            Control::Generate => {}
        }
        Ok(())
    }

    /// A widget changed without the button: new render pass, fallback plan.
    fn widget_changed(&mut self) -> Result<(), AppError> {
        if matches!(self.outcome.source, PlanSource::Live { .. }) {
            tracing::debug!("widget interaction without trigger; showing sample plan");
        }
        self.outcome = pipeline::sample_outcome(self.weights.to_request())?;
        Ok(())
    }

    fn generate(&mut self) -> Result<(), AppError> {
        self.outcome = pipeline::resolve_plan(&self.weights, true, &self.client)?;
        self.status = format!(
            "Plan received: {} train(s) selected.",
            self.outcome.rows.len()
        );
        Ok(())
    }

    fn export_plan(&mut self) {
        let path = crate::io::default_export_path(Path::new("."));
        self.status = match crate::io::write_plan_json(
            &path,
            &self.outcome.source,
            &self.outcome.request,
            &self.outcome.response,
        ) {
            Ok(()) => format!("Exported plan: {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn selected_train(&self) -> &'static str {
        TRAIN_IDS[self.train_index]
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_sidebar(frame, body[0]);
        self.draw_main(frame, body[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let source_style = match self.outcome.source {
            PlanSource::Sample => Style::default().fg(Color::Gray),
            PlanSource::Live { .. } => Style::default().fg(Color::Green),
        };
        let line = Line::from(vec![
            Span::styled(
                "KMRL AI-Driven Train Induction Planner",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | plan: "),
            Span::styled(self.outcome.source.display_name().to_string(), source_style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::with_capacity(CONTROLS.len());
        for control in CONTROLS {
            let text = match control {
                Control::Weight(field) => {
                    let value = self.weights.weight(field);
                    Text::from(vec![
                        Line::from(field.label()),
                        Line::from(format!("{} {value:.2}", slider_bar(value, SLIDER_CELLS))),
                    ])
                }
                Control::Capacity => Text::from(vec![
                    Line::from(format!("Required Capacity ({CAPACITY_MIN}-{CAPACITY_MAX})")),
                    Line::from(format!("◀ {} ▶", self.weights.capacity)),
                ]),
                Control::Generate => Text::from(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "[ Generate Induction Plan ]",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )),
                ]),
            };
            items.push(ListItem::new(text));
        }

        let list = List::new(items)
            .block(Block::default().title("Objective Weights").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_control));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_main(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let titles = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} {}", i + 1, t.title()));
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[0]);

        let content = chunks[1];
        match self.tab {
            Tab::FleetStatus => views::draw_fleet(frame, content),
            Tab::OptimizationPlan => views::draw_plan(frame, content, &self.outcome.rows),
            Tab::MaintenanceDrillDown => {
                views::draw_drill_down(frame, content, self.selected_train())
            }
            Tab::Simulation => views::draw_simulation(frame, content, self.layout_seed),
            Tab::Kpis => views::draw_kpis(frame, content, &self.outcome.response.kpis),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  g generate  Tab/1-5 view  t train  l layout  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn slider_bar(value: f64, cells: usize) -> String {
    let filled = ((value.clamp(0.0, 1.0) * cells as f64).round() as usize).min(cells);
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}
