//! Plain-text rendering of a snapshot.

// Allow format! with push_str for readability
#![allow(
    clippy::format_push_string,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use std::io;

use crate::frame::Renderer;
use crate::game::{Cell, PlantKind, RunState, Snapshot};

/// Glyph for a plant kind.
#[must_use]
pub const fn plant_glyph(kind: PlantKind) -> char {
    match kind {
        PlantKind::Sunflower => 'S',
        PlantKind::Peashooter => 'P',
        PlantKind::SnowPea => 'I',
        PlantKind::WallNut => 'W',
    }
}

/// Short label for a run state.
#[must_use]
pub const fn state_label(state: RunState) -> &'static str {
    match state {
        RunState::Ready => "ready",
        RunState::Running => "running",
        RunState::Paused => "paused",
        RunState::Victory => "VICTORY",
        RunState::Defeat => "DEFEAT",
    }
}

/// Column a pixel x falls in, or `None` left of the lawn.
fn column_of(x: f64, cell_size: f64) -> Option<usize> {
    (x >= 0.0).then(|| (x / cell_size).floor() as usize)
}

/// What a cell shows besides its plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Nothing.
    Empty,
    /// One zombie.
    Zombie,
    /// Several zombies.
    Horde,
    /// A projectile in flight.
    Shot,
    /// A sun pickup.
    Sun,
}

impl Marker {
    /// Text glyph.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Marker::Empty => ' ',
            Marker::Zombie => 'z',
            Marker::Horde => 'Z',
            Marker::Shot => '-',
            Marker::Sun => '*',
        }
    }
}

/// Per-cell markers of a snapshot, zombies taking precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LawnGrid {
    /// `markers[row][col]`.
    pub markers: Vec<Vec<Marker>>,
    /// Zombies per lane still right of the lawn.
    pub waiting: Vec<usize>,
}

impl LawnGrid {
    /// Bucket a snapshot's entities into cells.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let cols = usize::from(snapshot.cols);
        let rows = usize::from(snapshot.rows);

        let mut zombies = vec![vec![0usize; cols + 1]; rows];
        for zombie in &snapshot.zombies {
            let Some(lane) = zombies.get_mut(usize::from(zombie.lane)) else {
                continue;
            };
            if let Some(col) = column_of(zombie.x, snapshot.cell_size) {
                lane[col.min(cols)] += 1;
            }
        }

        let mut markers = vec![vec![Marker::Empty; cols]; rows];
        for sun in &snapshot.suns {
            let row = column_of(sun.y, snapshot.cell_size);
            let col = column_of(sun.x, snapshot.cell_size);
            if let (Some(row), Some(col)) = (row, col)
                && row < rows
                && col < cols
            {
                markers[row][col] = Marker::Sun;
            }
        }
        for projectile in &snapshot.projectiles {
            if let Some(col) = column_of(projectile.x, snapshot.cell_size)
                && col < cols
                && let Some(lane) = markers.get_mut(usize::from(projectile.lane))
            {
                lane[col] = Marker::Shot;
            }
        }
        for (lane, counts) in markers.iter_mut().zip(&zombies) {
            for (marker, &count) in lane.iter_mut().zip(counts) {
                match count {
                    0 => {}
                    1 => *marker = Marker::Zombie,
                    _ => *marker = Marker::Horde,
                }
            }
        }

        let waiting = zombies.iter().map(|lane| lane[cols]).collect();
        Self { markers, waiting }
    }

    /// Marker of a cell.
    #[must_use]
    pub fn marker(&self, cell: Cell) -> Marker {
        self.markers
            .get(usize::from(cell.row))
            .and_then(|lane| lane.get(usize::from(cell.col)))
            .copied()
            .unwrap_or(Marker::Empty)
    }
}

/// Render the lawn as text.
///
/// ```text
/// Day 1 | wave 1/2 | sun 150 | running | 12.3s
///  0 | S  .  P  .  .  .  .  z  . |
///  1 | S  .  .  .  .  .  .  .  . | Z
/// ```
///
/// Each cell shows the plant glyph (or `.`), then its [`Marker`].
/// Zombies still right of the lawn are listed after the border.
#[must_use]
pub fn render_text(snapshot: &Snapshot) -> String {
    let mut output = String::new();
    let grid = LawnGrid::from_snapshot(snapshot);

    output.push_str(&format!(
        "{} | wave {}/{} | sun {} | {} | {:.1}s\n",
        snapshot.level_name,
        snapshot.wave,
        snapshot.total_waves,
        snapshot.sun,
        state_label(snapshot.state),
        snapshot.elapsed_ms / 1000.0
    ));

    for row in 0..snapshot.rows {
        output.push_str(&format!("{row:>2} |"));
        for col in 0..snapshot.cols {
            let cell = Cell::new(row, col);
            let glyph = snapshot.plant_at(cell).map_or('.', |p| plant_glyph(p.kind));
            output.push_str(&format!(" {glyph}{}", grid.marker(cell).glyph()));
        }
        output.push_str(" |");
        let waiting = grid.waiting[usize::from(row)];
        if waiting > 0 {
            output.push_str(&format!(" {}", "Z".repeat(waiting)));
        }
        output.push('\n');
    }

    let cards: Vec<String> = snapshot
        .cards
        .iter()
        .map(|card| {
            let mark = if card.selected {
                '>'
            } else if card.usable {
                ' '
            } else {
                'x'
            };
            format!("{mark}{}:{}", plant_glyph(card.kind), card.cost)
        })
        .collect();
    output.push_str(&format!("cards: {}\n", cards.join(" ")));

    output
}

/// Writes each frame as text to an output stream.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
}

impl<W: io::Write> TextRenderer<W> {
    /// Render to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give the stream back.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Renderer for TextRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        self.out.write_all(render_text(snapshot).as_bytes())?;
        self.out.write_all(b"\n")
    }
}
