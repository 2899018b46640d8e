//! Drawing the board with crossterm.
//!
//! The screen is redrawn from scratch on every change: header, one text row
//! per board row, then the status line and an input prompt. Each cell is
//! [`CELL_WIDTH`] columns wide. How a cell looks is decided by
//! [`cell_label`] and [`cell_style`], both pure, so the layout can be
//! checked without a terminal.

use std::io::{self, Write};

use arena_viewer::{ApiStatus, CellView, Grid, Hsl};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{QueueableCommand, cursor, terminal};

/// Columns taken by one cell.
pub const CELL_WIDTH: usize = 4;

/// Marker drawn on empty cells.
pub const EMPTY_MARK: char = '·';

/// Text drawn for a cell, exactly [`CELL_WIDTH`] columns.
///
/// Bots show their initial followed by their hit points, arrows their
/// direction glyph.
pub fn cell_label(cell: &CellView) -> String {
    let text = match cell {
        CellView::Empty => format!(" {EMPTY_MARK}"),
        CellView::Entity(marker) => {
            let initial = marker.initial().unwrap_or('?');
            format!("{initial}{}", marker.hp)
        }
        CellView::Arrow(arrow) => format!(" {}", arrow.direction.glyph()),
    };
    let clipped: String = text.chars().take(CELL_WIDTH).collect();
    format!("{clipped:<CELL_WIDTH$}")
}

/// Colors and attributes for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    /// Text color.
    pub foreground: Option<Color>,
    /// Fill color.
    pub background: Option<Color>,
    /// Bold text.
    pub bold: bool,
    /// Underlined text.
    pub underline: bool,
}

/// Styling for a cell.
///
/// A bot is filled with its identity color. Damage turns its text bold
/// red, attacking underlines it. Arrows take their owner's color.
pub fn cell_style(cell: &CellView) -> CellStyle {
    match cell {
        CellView::Empty => CellStyle {
            foreground: Some(Color::DarkGrey),
            ..CellStyle::default()
        },
        CellView::Entity(marker) => CellStyle {
            foreground: Some(if marker.damaged { Color::Red } else { Color::Black }),
            background: Some(terminal_color(marker.color)),
            bold: marker.damaged,
            underline: marker.attacking,
        },
        CellView::Arrow(arrow) => CellStyle {
            foreground: Some(terminal_color(arrow.color)),
            ..CellStyle::default()
        },
    }
}

/// Convert an identity color for a true-color terminal.
pub fn terminal_color(color: Hsl) -> Color {
    let rgb = color.to_rgb();
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Everything shown under the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    /// Result of the last liveness probe. `None` until one completes.
    pub api: Option<ApiStatus>,
    /// Outcome of the last operator command.
    pub message: String,
    /// Where the viewer points.
    pub target: String,
}

impl StatusLine {
    /// Render as one line of text.
    pub fn text(&self) -> String {
        let api = self.api.map_or("…", ApiStatus::as_str);
        let mut line = format!("API: {api}  [{}]", self.target);
        if !self.message.is_empty() {
            line.push_str("  ");
            line.push_str(&self.message);
        }
        line
    }
}

/// A drawing surface over any writer, normally stdout.
#[derive(Debug)]
pub struct Screen<W: Write> {
    out: W,
}

impl<W: Write> Screen<W> {
    /// Wrap a writer.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give the writer back.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Redraw the whole screen.
    pub fn draw(&mut self, grid: &Grid, status: &StatusLine) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.out.queue(SetAttribute(Attribute::Bold))?;
        self.out.queue(Print(format!("Round {}", grid.round)))?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(cursor::MoveToNextLine(2))?;

        for row in grid.rows() {
            for cell in row {
                self.draw_cell(cell)?;
            }
            self.out.queue(cursor::MoveToNextLine(1))?;
        }

        self.out.queue(cursor::MoveToNextLine(1))?;
        self.out.queue(Print(status.text()))?;
        self.out.queue(cursor::MoveToNextLine(1))?;
        self.out.queue(Print("> "))?;
        self.out.flush()
    }

    fn draw_cell(&mut self, cell: &CellView) -> io::Result<()> {
        let style = cell_style(cell);
        if let Some(color) = style.foreground {
            self.out.queue(SetForegroundColor(color))?;
        }
        if let Some(color) = style.background {
            self.out.queue(SetBackgroundColor(color))?;
        }
        if style.bold {
            self.out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.underline {
            self.out.queue(SetAttribute(Attribute::Underlined))?;
        }
        self.out.queue(Print(cell_label(cell)))?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(ResetColor)?;
        Ok(())
    }
}
