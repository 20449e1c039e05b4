//! Watch command implementation - Interactive TUI player.

// CLI watch uses intentional casts for display and timing
#![allow(
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use super::{CliError, load_levels, seed_or_clock};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use verdant::autoplay::{Strategy, StrategyKind};
use verdant::frame::{GameLoop, LatestSnapshot};
use verdant::game::{CardStatus, Cell, Millis, PlantKind, RunState, Session, Snapshot};
use verdant::level::LevelSet;
use verdant::view::{LawnGrid, Marker, plant_glyph, state_label};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the level cannot be loaded or the TUI fails.
pub(crate) fn execute(
    level: usize,
    levels: Option<PathBuf>,
    seed: Option<u64>,
    autoplay: Option<StrategyKind>,
    speed: f64,
) -> Result<(), CliError> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(CliError::new(format!("speed must be positive, got {speed}")));
    }

    let table = load_levels(levels.as_deref())?;
    let config = table.get(level)?.clone();
    let seed = seed_or_clock(seed);
    let session = Session::new(config, verdant::Rules::default(), seed)?;
    let game = GameLoop::new(session).with_speed(speed);

    run_tui(App::new(game, table, level, autoplay))
}

/// App state for the TUI.
struct App {
    game: GameLoop,
    levels: LevelSet,
    level_number: usize,
    player: Option<Box<dyn Strategy>>,
    cursor: Cell,
    message: Option<String>,
    started: Instant,
    latest: LatestSnapshot,
}

impl App {
    fn new(game: GameLoop, levels: LevelSet, level_number: usize, autoplay: Option<StrategyKind>) -> Self {
        Self {
            game,
            levels,
            level_number,
            player: autoplay.map(StrategyKind::build),
            cursor: Cell::new(0, 0),
            message: None,
            started: Instant::now(),
            latest: LatestSnapshot::default(),
        }
    }

    /// Input time: real milliseconds since the TUI opened.
    fn now(&self) -> Millis {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn frame(&mut self) {
        let now = self.now();
        if let Some(player) = self.player.as_mut()
            && self.game.session().state() == RunState::Running
        {
            player.act(self.game.session_mut(), now);
        }
        let report = self.game.frame(now, &mut self.latest).unwrap_or_else(|never| match never {});
        if report.tick.breached {
            self.message = Some("The zombies ate your brains!".to_string());
        }
    }

    fn start(&mut self) {
        let now = self.now();
        if self.game.start(now) {
            self.message = None;
        }
    }

    fn toggle_pause(&mut self) {
        let now = self.now();
        self.game.toggle_pause(now);
    }

    fn restart(&mut self) {
        self.game.restart();
        self.message = Some("Level restarted".to_string());
    }

    fn next_level(&mut self) {
        let next = self.level_number % self.levels.len() + 1;
        let result = self
            .levels
            .get(next)
            .cloned()
            .and_then(|config| self.game.session_mut().load_level(config));
        match result {
            Ok(()) => {
                self.level_number = next;
                self.game.restart();
                self.message = Some(format!("Level {next}: {}", self.game.session().level().name));
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn select(&mut self, index: usize) {
        let Some(&kind) = PlantKind::ALL.get(index) else {
            return;
        };
        let now = self.now();
        self.message = match self.game.session_mut().select_plant(kind, now) {
            Ok(Some(kind)) => Some(format!("{kind} selected")),
            Ok(None) => None,
            Err(e) => Some(e.to_string()),
        };
    }

    fn place(&mut self) {
        let now = self.now();
        let cursor = self.cursor;
        self.message = match self.game.session_mut().place_selected(cursor, now) {
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        };
    }

    fn collect(&mut self) {
        let session = self.game.session_mut();
        let rules = *session.rules();
        let spots: Vec<(f64, f64)> = session
            .lawn()
            .suns
            .iter()
            .filter(|sun| rules.cell_at(sun.x, sun.y) == Some(self.cursor))
            .map(|sun| (sun.x, sun.y))
            .collect();
        let gained: u32 = spots
            .into_iter()
            .filter_map(|(x, y)| session.collect_sun_at(x, y))
            .sum();
        if gained > 0 {
            self.message = Some(format!("+{gained} sun"));
        }
    }

    fn move_cursor(&mut self, rows: i16, cols: i16) {
        let rules = self.game.session().rules();
        let row = (i16::from(self.cursor.row) + rows).clamp(0, i16::from(rules.rows) - 1);
        let col = (i16::from(self.cursor.col) + cols).clamp(0, i16::from(rules.cols) - 1);
        self.cursor = Cell::new(row as u8, col as u8);
    }
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    loop {
        app.frame();

        // Draw
        terminal.draw(|f| ui(f, &app)).map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(16)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Char('s') => app.start(),
                KeyCode::Enter => {
                    if app.game.session().state() == RunState::Ready {
                        app.start();
                    } else {
                        app.place();
                    }
                }
                KeyCode::Char('p') => app.place(),
                KeyCode::Char('c') => app.collect(),
                KeyCode::Char('x') => app.game.session_mut().clear_selection(),
                KeyCode::Char('r') => app.restart(),
                KeyCode::Char('n') => app.next_level(),
                KeyCode::Char(c @ '1'..='4') => app.select(usize::from(c as u8 - b'1')),
                KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1, 0),
                KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1, 0),
                KeyCode::Left | KeyCode::Char('h') => app.move_cursor(0, -1),
                KeyCode::Right | KeyCode::Char('l') => app.move_cursor(0, 1),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let Some(snapshot) = app.latest.snapshot.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Main content
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], snapshot);

    // Main content - lawn and side panel
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_lawn(f, main_chunks[0], snapshot, app.cursor);
    render_side(f, main_chunks[1], snapshot, app);

    render_footer(f, chunks[2], snapshot, app);
}

fn render_header(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let title = format!(
        " Verdant | {} | Wave {}/{} | Sun {} | {} | {:.1}s ",
        snapshot.level_name,
        snapshot.wave,
        snapshot.total_waves,
        snapshot.sun,
        state_label(snapshot.state),
        snapshot.elapsed_ms / 1000.0
    );

    let color = match snapshot.state {
        RunState::Victory => Color::Green,
        RunState::Defeat => Color::Red,
        RunState::Paused => Color::Yellow,
        _ => Color::Cyan,
    };
    let header = Paragraph::new(title)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn plant_color(kind: PlantKind) -> Color {
    match kind {
        PlantKind::Sunflower => Color::Yellow,
        PlantKind::Peashooter => Color::Green,
        PlantKind::SnowPea => Color::LightCyan,
        PlantKind::WallNut => Color::LightRed,
    }
}

fn marker_color(marker: Marker) -> Color {
    match marker {
        Marker::Zombie | Marker::Horde => Color::Red,
        Marker::Shot => Color::LightGreen,
        Marker::Sun => Color::Yellow,
        Marker::Empty => Color::Reset,
    }
}

fn render_lawn(f: &mut Frame, area: Rect, snapshot: &Snapshot, cursor: Cell) {
    let grid = LawnGrid::from_snapshot(snapshot);
    let mut lines: Vec<Line> = Vec::new();

    for row in 0..snapshot.rows {
        // Each lane is drawn twice as tall for readability
        lines.push(Line::from(""));
        let mut spans = vec![Span::raw(format!("{row:>2} "))];
        for col in 0..snapshot.cols {
            let cell = Cell::new(row, col);
            let base = if cell == cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            spans.push(Span::styled(" ", base));
            match snapshot.plant_at(cell) {
                Some(plant) => spans.push(Span::styled(
                    plant_glyph(plant.kind).to_string(),
                    base.fg(plant_color(plant.kind)).add_modifier(Modifier::BOLD),
                )),
                None => spans.push(Span::styled(".", base.fg(Color::DarkGray))),
            }
            let marker = grid.marker(cell);
            spans.push(Span::styled(marker.glyph().to_string(), base.fg(marker_color(marker))));
            spans.push(Span::styled(" ", base));
        }

        let waiting = grid.waiting[usize::from(row)];
        if waiting > 0 {
            spans.push(Span::styled(format!(" {}", "Z".repeat(waiting)), Style::default().fg(Color::Red)));
        }
        lines.push(Line::from(spans));
    }

    let lawn_widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Lawn "));

    f.render_widget(lawn_widget, area);
}

fn card_line(number: usize, card: &CardStatus) -> Line<'static> {
    let color = if card.selected {
        Color::Cyan
    } else if card.usable {
        plant_color(card.kind)
    } else {
        Color::DarkGray
    };
    let mut spans = vec![Span::styled(
        format!("[{number}] {:<12} {:>3}", card.kind.to_string(), card.cost),
        Style::default().fg(color),
    )];
    if !card.ready {
        let filled = (card.cooldown_ratio * 8.0).ceil() as usize;
        spans.push(Span::styled(
            format!(" {}", "#".repeat(filled.min(8))),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn render_side(f: &mut Frame, area: Rect, snapshot: &Snapshot, app: &App) {
    let stats = app.game.session().stats();
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Cards",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (i, card) in snapshot.cards.iter().enumerate() {
        lines.push(card_line(i + 1, card));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Lawn",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("  Cursor: {}", app.cursor)));
    lines.push(Line::from(format!("  Zombies: {}", snapshot.zombies.len())));
    lines.push(Line::from(format!("  Suns: {}", snapshot.suns.len())));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Totals",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("  Killed: {}/{}", stats.zombies_killed, stats.zombies_spawned)));
    lines.push(Line::from(format!("  Planted: {} (lost {})", stats.plants_placed, stats.plants_lost)));
    lines.push(Line::from(format!("  Sun: +{} -{}", stats.sun_collected, stats.sun_spent)));
    if let Some(player) = &app.player {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Autoplay: {}", player.name())));
    }

    let side_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Garden "))
        .wrap(Wrap { trim: false });

    f.render_widget(side_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, snapshot: &Snapshot, app: &App) {
    let text = if let Some(message) = &app.message {
        format!(" {message} ")
    } else {
        match snapshot.state {
            RunState::Ready => " [Enter/s] Start  [1-4] Select  [arrows] Move  [p] Plant  [q] Quit ".to_string(),
            RunState::Victory | RunState::Defeat => " [r] Restart  [n] Next level  [q] Quit ".to_string(),
            _ => " [Space] Pause  [1-4] Select  [arrows] Move  [p] Plant  [c] Collect  [r] Restart  [q] Quit "
                .to_string(),
        }
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
