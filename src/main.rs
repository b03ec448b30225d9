use std::env;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph};

use scout_terminal::explore;
use scout_terminal::export;
use scout_terminal::filters::distinct_values;
use scout_terminal::radar::{self, RadarData};
use scout_terminal::scatter::{self, PointClass, RefLine};
use scout_terminal::state::{AppState, Screen};
use scout_terminal::swarm::{self, Band};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.switch(Screen::Explore),
            KeyCode::Char('2') => self.switch(Screen::Swarm),
            KeyCode::Char('3') => self.switch(Screen::Scatter),
            KeyCode::Char('4') => self.switch(Screen::Radar),
            KeyCode::Char('5') => self.switch(Screen::Similarity),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('+') => self.bump_minutes(50.0),
            KeyCode::Char('-') => self.bump_minutes(-50.0),
            KeyCode::Char('s') => self.cycle_season_filter(),
            KeyCode::Char('m') if self.state.screen == Screen::Swarm => {
                self.state.cycle_metric();
            }
            KeyCode::Char('i') if self.state.screen == Screen::Swarm => {
                self.toggle_lower_is_better();
            }
            KeyCode::Char('x') if self.state.screen == Screen::Scatter => {
                self.state.cycle_scatter_x();
            }
            KeyCode::Char('y') if self.state.screen == Screen::Scatter => {
                self.state.cycle_scatter_y();
            }
            KeyCode::Char('r') if self.state.screen == Screen::Scatter => {
                self.state.toggle_ref_line();
            }
            KeyCode::Char('c')
                if matches!(self.state.screen, Screen::Radar | Screen::Similarity) =>
            {
                self.state.toggle_compare();
            }
            KeyCode::Enter if self.state.screen == Screen::Similarity => {
                self.state.run_similarity();
            }
            KeyCode::Char('e') if self.state.screen == Screen::Similarity => {
                self.export_similarity();
            }
            _ => {}
        }
    }

    fn switch(&mut self, screen: Screen) {
        if self.state.screen != screen {
            self.state.screen = screen;
            self.state.selected = 0;
        }
    }

    fn bump_minutes(&mut self, delta: f64) {
        let current = self.state.filters.min_minutes.unwrap_or(0.0);
        let next = (current + delta).max(0.0);
        self.state.filters.min_minutes = Some(next);
        self.state.refresh_subset();
        self.state
            .push_log(format!("[INFO] Minutes floor set to {next:.0}"));
    }

    /// Walk the season filter through: all seasons -> each one -> all.
    fn cycle_season_filter(&mut self) {
        let Some(spec) = &self.state.spec else {
            return;
        };
        let seasons = distinct_values(&self.state.table, spec.season);
        if seasons.is_empty() {
            return;
        }
        let next = match self.state.filters.seasons.first() {
            None => Some(seasons[0].clone()),
            Some(current) => {
                let idx = seasons.iter().position(|s| s == current);
                match idx {
                    Some(i) if i + 1 < seasons.len() => Some(seasons[i + 1].clone()),
                    _ => None,
                }
            }
        };
        self.state.filters.seasons = next.clone().into_iter().collect();
        self.state.refresh_subset();
        match next {
            Some(season) => self.state.push_log(format!("[INFO] Season filter: {season}")),
            None => self.state.push_log("[INFO] Season filter cleared"),
        }
    }

    fn toggle_lower_is_better(&mut self) {
        let cols = self.state.numeric_cols();
        let Some(&col) = cols.get(self.state.metric_idx) else {
            return;
        };
        let name = self.state.table.columns[col].clone();
        if let Some(pos) = self
            .state
            .lower_is_better
            .iter()
            .position(|m| m == &name)
        {
            self.state.lower_is_better.remove(pos);
            self.state
                .push_log(format!("[INFO] {name}: higher is better again"));
        } else {
            self.state.lower_is_better.push(name.clone());
            self.state
                .push_log(format!("[INFO] {name}: marked lower-is-better"));
        }
    }

    fn export_similarity(&mut self) {
        let Some(output) = self.state.similarity.clone() else {
            self.state
                .push_log("[INFO] Nothing to export; run a similarity search first");
            return;
        };
        let path = export::default_export_path();
        match export::export_similarity(&path, &output) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} modeled / {} ranked rows to {}",
                report.modeled_rows,
                report.ranked_rows,
                report.path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut app = App::new();
    let dataset = env::args()
        .nth(1)
        .or_else(|| env::var("SCOUT_DATASET").ok());
    match dataset {
        Some(path) => match app.state.load_dataset(Path::new(&path)) {
            Ok(()) => app.state.push_log(format!(
                "[INFO] Loaded {path}: {} rows, {} columns",
                app.state.table.rows.len(),
                app.state.table.columns.len()
            )),
            Err(err) => app.state.push_log(format!("[WARN] {err:#}")),
        },
        None => app.state.push_log(
            "[INFO] No dataset; pass a .csv/.parquet path or set SCOUT_DATASET",
        ),
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Explore => render_explore(frame, chunks[1], &app.state),
        Screen::Swarm => render_swarm(frame, chunks[1], &app.state),
        Screen::Scatter => render_scatter(frame, chunks[1], &app.state),
        Screen::Radar => render_radar(frame, chunks[1], &app.state),
        Screen::Similarity => render_similarity(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Explore => "EXPLORE",
        Screen::Swarm => "SWARM",
        Screen::Scatter => "SCATTER",
        Screen::Radar => "RADAR",
        Screen::Similarity => "SIMILARITY",
    };
    let pool = format!(
        "{} | pool {}/{} rows | min minutes {}",
        screen,
        state.subset.len(),
        state.table.rows.len(),
        state
            .filters
            .min_minutes
            .map(|m| format!("{m:.0}"))
            .unwrap_or_else(|| "off".to_string()),
    );
    let last_log = state.logs.back().cloned().unwrap_or_default();
    format!("SCOUT TERMINAL | {pool}\n{last_log}")
}

fn footer_text(state: &AppState) -> String {
    let common = "1-5 Screens | j/k Move | +/- Minutes | s Season | ? Help | q Quit";
    match state.screen {
        Screen::Explore => common.to_string(),
        Screen::Swarm => format!("m Metric | i Lower-is-better | {common}"),
        Screen::Scatter => format!("x/y Axes | r Median/Mean | {common}"),
        Screen::Radar => format!("c Compare | {common}"),
        Screen::Similarity => format!("Enter Run | c Compare | e Export | {common}"),
    }
}

fn render_explore(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let ov = explore::overview(&state.table);
    let overview = Paragraph::new(format!(
        "Rows {} | Columns {} | Missing cells {} | Duplicate rows {}",
        ov.rows, ov.columns, ov.missing_cells, ov.duplicate_rows
    ))
    .block(Block::default().borders(Borders::ALL).title("Dataset"));
    frame.render_widget(overview, chunks[0]);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let missing_lines: Vec<String> = explore::missing_by_column(&state.table, 20)
        .into_iter()
        .map(|(name, pct)| format!("{pct:5.1}%  {name}"))
        .collect();
    let missing = Paragraph::new(missing_lines.join("\n"))
        .block(Block::default().borders(Borders::ALL).title("Missing by column"));
    frame.render_widget(missing, halves[0]);

    let describe_lines: Vec<String> = explore::numeric_describe(&state.table)
        .into_iter()
        .map(|s| {
            format!(
                "{:<24} n={:<5} mean={:<9.2} std={:<9.2} min={:<8.2} med={:<8.2} max={:.2}",
                s.name, s.count, s.mean, s.std, s.min, s.median, s.max
            )
        })
        .collect();
    let describe = Paragraph::new(describe_lines.join("\n"))
        .block(Block::default().borders(Borders::ALL).title("Numeric columns"));
    frame.render_widget(describe, halves[1]);
}

fn render_swarm(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = state.numeric_cols();
    let (Some(spec), Some(&metric_col)) = (&state.spec, cols.get(state.metric_idx)) else {
        render_empty(frame, area, "No numeric metric to plot");
        return;
    };
    let metric = &state.table.columns[metric_col];
    let lower = state.lower_is_better.iter().any(|m| m == metric);
    let data = swarm::swarm_data(
        &state.table,
        spec,
        &state.subset,
        metric_col,
        lower,
        &state.compare_players,
    );
    if data.points.is_empty() {
        render_empty(frame, area, "No values for this metric in the pool");
        return;
    }

    let mut weak = Vec::new();
    let mut middle = Vec::new();
    let mut strong = Vec::new();
    let mut marked = Vec::new();
    for p in &data.points {
        let point = (p.value, p.jitter);
        if p.highlight.is_some() {
            marked.push(point);
            continue;
        }
        match p.band {
            Band::Weak => weak.push(point),
            Band::Middle => middle.push(point),
            Band::Strong => strong.push(point),
        }
    }

    let (min_x, max_x) = value_bounds(data.points.iter().map(|p| p.value));
    let cut_low = vec![(data.p_low, -0.5), (data.p_low, 0.5)];
    let cut_high = vec![(data.p_high, -0.5), (data.p_high, 0.5)];

    let datasets = vec![
        scatter_dataset("weak", &weak, Color::Red),
        scatter_dataset("middle", &middle, Color::Yellow),
        scatter_dataset("strong", &strong, Color::Green),
        Dataset::default()
            .name("p33")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&cut_low),
        Dataset::default()
            .name("p67")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&cut_high),
        Dataset::default()
            .name("picked")
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&marked),
    ];

    let title = format!(
        "{} | p33 {:.2} p67 {:.2}{}",
        data.metric,
        data.p_low,
        data.p_high,
        if data.lower_is_better {
            " | lower is better"
        } else {
            ""
        }
    );
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec![
                    Span::raw(format!("{min_x:.1}")),
                    Span::raw(format!("{:.1}", (min_x + max_x) / 2.0)),
                    Span::raw(format!("{max_x:.1}")),
                ]),
        )
        .y_axis(Axis::default().bounds([-0.6, 0.6]));
    frame.render_widget(chart, area);
}

fn render_scatter(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = state.numeric_cols();
    let (Some(spec), Some(&x_col), Some(&y_col)) = (
        &state.spec,
        cols.get(state.scatter_x % cols.len().max(1)),
        cols.get(state.scatter_y % cols.len().max(1)),
    ) else {
        render_empty(frame, area, "Need two numeric metrics for the scatter");
        return;
    };

    let highlight = state.compare_players.first().map(String::as_str);
    let data = scatter::scatter_data(
        &state.table,
        spec,
        &state.subset,
        x_col,
        y_col,
        highlight,
        None,
        5,
        state.ref_line,
    );
    if data.points.is_empty() {
        render_empty(frame, area, "No rows with both metrics in the pool");
        return;
    }

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(area);

    let mut background = Vec::new();
    let mut top = Vec::new();
    let mut marked = Vec::new();
    let mut labeled_names = Vec::new();
    for p in &data.points {
        let point = (p.x, p.y);
        match p.class {
            PointClass::Background => background.push(point),
            PointClass::Top => {
                top.push(point);
                labeled_names.push(format!("{:<20} {:8.2} {:8.2}", p.player, p.x, p.y));
            }
            PointClass::Highlight | PointClass::TeamHighlight => {
                marked.push(point);
                labeled_names.push(format!("{:<20} {:8.2} {:8.2} *", p.player, p.x, p.y));
            }
        }
    }

    let (min_x, max_x) = value_bounds(data.points.iter().map(|p| p.x));
    let (min_y, max_y) = value_bounds(data.points.iter().map(|p| p.y));
    let v_ref = vec![(data.ref_x, min_y), (data.ref_x, max_y)];
    let h_ref = vec![(min_x, data.ref_y), (max_x, data.ref_y)];

    let datasets = vec![
        scatter_dataset("pool", &background, Color::DarkGray),
        scatter_dataset("top", &top, Color::Yellow),
        scatter_dataset("picked", &marked, Color::Cyan),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Gray))
            .data(&v_ref),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Gray))
            .data(&h_ref),
    ];

    let ref_label = match data.ref_line {
        RefLine::Median => "median",
        RefLine::Mean => "mean",
    };
    let title = format!(
        "{} vs {} | {} x={:.2} y={:.2}",
        data.x_metric, data.y_metric, ref_label, data.ref_x, data.ref_y
    );
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title(data.x_metric.clone())
                .bounds([min_x, max_x])
                .labels(vec![
                    Span::raw(format!("{min_x:.1}")),
                    Span::raw(format!("{max_x:.1}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(data.y_metric.clone())
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::raw(format!("{min_y:.1}")),
                    Span::raw(format!("{max_y:.1}")),
                ]),
        );
    frame.render_widget(chart, halves[0]);

    let labels = Paragraph::new(labeled_names.join("\n"))
        .block(Block::default().borders(Borders::ALL).title("Labeled"));
    frame.render_widget(labels, halves[1]);
}

fn render_radar(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(spec) = &state.spec else {
        render_empty(frame, area, "No dataset loaded");
        return;
    };
    let metric_cols: Vec<usize> = state
        .kpi_names
        .iter()
        .filter_map(|name| state.table.column_index(name))
        .collect();
    let data = match radar::radar_data(
        &state.table,
        spec,
        &state.subset,
        &metric_cols,
        &state.lower_is_better,
        &state.compare_players,
    ) {
        Ok(data) => data,
        Err(err) => {
            render_empty(frame, area, &format!("{err}"));
            return;
        }
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Radar (q10..q90)"))
        .x_bounds([-1.4, 1.4])
        .y_bounds([-1.4, 1.4])
        .paint(|ctx| {
            let n = data.axes.len();
            // Spokes and outer ring.
            let unit: Vec<(f64, f64)> = (0..n)
                .map(|k| {
                    let angle = std::f64::consts::TAU * k as f64 / n as f64;
                    (angle.cos(), angle.sin())
                })
                .collect();
            for (k, &(x, y)) in unit.iter().enumerate() {
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: x,
                    y2: y,
                    color: Color::DarkGray,
                });
                let next = unit[(k + 1) % n];
                ctx.draw(&CanvasLine {
                    x1: x,
                    y1: y,
                    x2: next.0,
                    y2: next.1,
                    color: Color::DarkGray,
                });
                ctx.print(
                    x * 1.2,
                    y * 1.2,
                    Line::from(data.axes[k].metric.clone()),
                );
            }
            let colors = [Color::Cyan, Color::LightRed];
            for (idx, profile) in data.profiles.iter().enumerate() {
                let color = colors[idx % colors.len()];
                let m = profile.vertices.len();
                for k in 0..m {
                    let (x1, y1) = profile.vertices[k];
                    let (x2, y2) = profile.vertices[(k + 1) % m];
                    ctx.draw(&CanvasLine { x1, y1, x2, y2, color });
                }
            }
        });
    frame.render_widget(canvas, halves[0]);

    frame.render_widget(
        Paragraph::new(radar_panel_text(&data))
            .block(Block::default().borders(Borders::ALL).title("Values")),
        halves[1],
    );
}

fn radar_panel_text(data: &RadarData) -> String {
    let mut lines = Vec::new();
    let names: Vec<&str> = data.profiles.iter().map(|p| p.name.as_str()).collect();
    lines.push(format!(
        "{:<20} {:>8} {:>8} {:>8} {:>8}",
        "Metric",
        "median",
        "mean",
        names.first().copied().unwrap_or("-"),
        names.get(1).copied().unwrap_or("-"),
    ));
    for (k, axis) in data.axes.iter().enumerate() {
        let p0 = data
            .profiles
            .first()
            .map(|p| fmt_value(p.values[k]))
            .unwrap_or_else(|| "-".to_string());
        let p1 = data
            .profiles
            .get(1)
            .map(|p| fmt_value(p.values[k]))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<20} {:>8.2} {:>8.2} {:>8} {:>8}",
            axis.metric, data.median[k], data.mean[k], p0, p1
        ));
    }
    lines.join("\n")
}

fn fmt_value(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "NA".to_string()
    }
}

fn render_similarity(frame: &mut Frame, area: Rect, state: &AppState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    // Left: reference picker over the working subset.
    let pairs = state.player_seasons();
    let height = halves[0].height.saturating_sub(2) as usize;
    let (start, end) = visible_range(state.selected, pairs.len(), height.max(1));
    let mut lines: Vec<Line> = Vec::new();
    for (idx, (player, season)) in pairs.iter().enumerate().take(end).skip(start) {
        let text = format!("{player} ({season})");
        let mut style = Style::default();
        if idx == state.selected {
            style = style.fg(Color::Black).bg(Color::Cyan);
        } else if state.compare_players.iter().any(|p| p == player) {
            style = style.fg(Color::Cyan);
        }
        lines.push(Line::styled(text, style));
    }
    let picker = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Reference ({} in pool)", pairs.len())),
    );
    frame.render_widget(picker, halves[0]);

    // Right: ranked output of the last run.
    let body = match &state.similarity {
        None => "Press Enter to rank the pool around the selected player-season".to_string(),
        Some(output) => {
            let mut out = vec![format!(
                "KPIs: {} | {} candidates",
                output.kpi_names.join(", "),
                output.ranked.len()
            )];
            out.push(format!(
                "{:<4} {:<22} {:<10} {:>8} {:>8} {:>9}",
                "#", "Player", "Season", "PCA1", "PCA2", "Distance"
            ));
            let height = halves[1].height.saturating_sub(4) as usize;
            for (rank, record) in output.ranked.iter().take(height.max(1)).enumerate() {
                out.push(format!(
                    "{:<4} {:<22} {:<10} {:>8.3} {:>8.3} {:>9.4}",
                    rank + 1,
                    record.player,
                    record.season,
                    record.pca1,
                    record.pca2,
                    record.distance
                ));
            }
            out.join("\n")
        }
    };
    let results = Paragraph::new(body).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Similar players"),
    );
    frame.render_widget(results, halves[1]);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let text = "\
Screens: 1 Explore  2 Swarm  3 Scatter  4 Radar  5 Similarity
Move: j/k or arrows       Pool: +/- minutes floor, s season filter
Swarm: m next metric, i toggle lower-is-better
Scatter: x/y cycle axes, r median/mean cross-hairs
Radar/Similarity: c compare player (max 2)
Similarity: Enter run, e export .xlsx
q quit, ? close help";
    let width = area.width.min(66);
    let height = area.height.min(10);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help")),
        popup,
    );
}

fn render_empty(frame: &mut Frame, area: Rect, msg: &str) {
    let widget = Paragraph::new(msg.to_string())
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn scatter_dataset<'a>(
    name: &'a str,
    data: &'a [(f64, f64)],
    color: Color,
) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(color))
        .data(data)
}

fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < 1e-9 {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total <= visible {
        return (0, total);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(total - visible);
    (start, start + visible)
}
