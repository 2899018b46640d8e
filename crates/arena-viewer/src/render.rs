//! Projection of a snapshot and its annotations onto the board grid.
//!
//! [`render`] is a pure function. Each cell resolves to exactly one of:
//!
//! 1. the bot standing on it, flagged damaged and/or attacking
//! 2. otherwise an arrow, if some bot left this cell towards its current one
//! 3. otherwise nothing
//!
//! Bots are checked first, so an arrow never covers a bot. Arrows only
//! exist for single-cell steps; a bot that jumped further leaves no trail.

use std::collections::HashMap;

use arena_types::{Cell, Direction, MAX_BOARD_SIZE, Snapshot};

use crate::color::{Hsl, color_of};
use crate::reconcile::Annotations;

/// A bot drawn on its cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMarker {
    /// Bot name.
    pub name: String,
    /// Current hit points.
    pub hp: i64,
    /// Identity color.
    pub color: Hsl,
    /// Hit points dropped since the previous snapshot.
    pub damaged: bool,
    /// Listed as an attacker in this snapshot.
    pub attacking: bool,
}

impl EntityMarker {
    /// First character of the name, used where a cell is too small for it.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// Trail left on the cell a bot just stepped off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowMarker {
    /// The bot that moved.
    pub owner: String,
    /// Which way it went.
    pub direction: Direction,
    /// The owner's identity color.
    pub color: Hsl,
}

/// What a single cell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    /// Nothing here.
    Empty,
    /// A bot.
    Entity(EntityMarker),
    /// A movement arrow.
    Arrow(ArrowMarker),
}

/// The rendered board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Round the board was rendered for.
    pub round: u64,
    /// Edge length.
    pub size: u32,
    /// Row-major cells: all of row 0 first, then row 1, and so on.
    pub cells: Vec<CellView>,
}

impl Grid {
    /// The cell at column `x`, row `y`.
    pub fn cell(&self, x: u32, y: u32) -> Option<&CellView> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let index = u64::from(y)
            .checked_mul(u64::from(self.size))?
            .checked_add(u64::from(x))?;
        self.cells.get(usize::try_from(index).ok()?)
    }

    /// Cells grouped by row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellView]> {
        let width = usize::try_from(self.size).unwrap_or(0).max(1);
        self.cells.chunks(width)
    }
}

/// Project `snapshot` with `annotations` onto a grid.
///
/// Boards wider than [`MAX_BOARD_SIZE`] are cut down to it.
pub fn render(snapshot: &Snapshot, annotations: &Annotations) -> Grid {
    let size = snapshot.board_size.min(MAX_BOARD_SIZE);

    // First name wins when a malformed snapshot stacks bots on one cell.
    let mut occupants: HashMap<Cell, &str> = HashMap::with_capacity(snapshot.bots.len());
    for (name, state) in &snapshot.bots {
        occupants.entry(state.pos).or_insert(name.as_str());
    }
    let mut trails: HashMap<Cell, &str> = HashMap::with_capacity(annotations.moves.len());
    for (name, from) in &annotations.moves {
        trails.entry(*from).or_insert(name.as_str());
    }

    let edge = usize::try_from(size).unwrap_or(0);
    let mut cells = Vec::with_capacity(edge.saturating_mul(edge));
    for y in 0..size {
        for x in 0..size {
            let cell = Cell::new(i64::from(x), i64::from(y));
            cells.push(project_cell(cell, snapshot, annotations, &occupants, &trails));
        }
    }

    Grid {
        round: snapshot.round,
        size,
        cells,
    }
}

fn project_cell(
    cell: Cell,
    snapshot: &Snapshot,
    annotations: &Annotations,
    occupants: &HashMap<Cell, &str>,
    trails: &HashMap<Cell, &str>,
) -> CellView {
    if let Some(&name) = occupants.get(&cell) {
        if let Some(state) = snapshot.bots.get(name) {
            return CellView::Entity(EntityMarker {
                name: name.to_owned(),
                hp: state.hp,
                color: color_of(name),
                damaged: annotations.damaged.contains(name),
                attacking: annotations.attacking.contains(name),
            });
        }
    }

    if let Some(&owner) = trails.get(&cell) {
        let arrow = snapshot
            .bots
            .get(owner)
            .and_then(|state| Direction::between(cell, state.pos));
        if let Some(direction) = arrow {
            return CellView::Arrow(ArrowMarker {
                owner: owner.to_owned(),
                direction,
                color: color_of(owner),
            });
        }
    }

    CellView::Empty
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::{BTreeMap, BTreeSet};

    use arena_types::Attack;

    use super::*;
    use crate::reconcile::{Reconciler, diff};

    fn entity(grid: &Grid, x: u32, y: u32) -> &EntityMarker {
        match grid.cell(x, y) {
            Some(CellView::Entity(marker)) => marker,
            other => panic!("expected entity at ({x}, {y}), got {other:?}"),
        }
    }

    fn arrow(grid: &Grid, x: u32, y: u32) -> &ArrowMarker {
        match grid.cell(x, y) {
            Some(CellView::Arrow(marker)) => marker,
            other => panic!("expected arrow at ({x}, {y}), got {other:?}"),
        }
    }

    #[test]
    fn empty_board() {
        let grid = render(&Snapshot::empty(0, 3), &Annotations::default());
        assert_eq!(grid.cells.len(), 9);
        assert!(grid.cells.iter().all(|c| *c == CellView::Empty));
        assert_eq!(grid.rows().count(), 3);
        assert!(grid.cell(3, 0).is_none());
    }

    #[test]
    fn oversized_board_is_capped() {
        let snapshot = Snapshot::empty(0, u32::MAX).with_bot("A", Cell::new(1, 1), 5);
        let grid = render(&snapshot, &Annotations::default());
        assert_eq!(grid.size, MAX_BOARD_SIZE);
        assert_eq!(grid.rows().count(), usize::try_from(MAX_BOARD_SIZE).unwrap());
        assert_eq!(entity(&grid, 1, 1).name, "A");
    }

    #[test]
    fn row_major_layout() {
        let snapshot = Snapshot::empty(0, 4).with_bot("A", Cell::new(3, 1), 5);
        let grid = render(&snapshot, &Annotations::default());
        assert!(matches!(grid.cells[4 + 3], CellView::Entity(_)));
        assert_eq!(entity(&grid, 3, 1).name, "A");
    }

    #[test]
    fn rightward_move_leaves_right_arrow() {
        let mut reconciler = Reconciler::new();
        let _ = reconciler.reconcile(&Snapshot::empty(0, 5).with_bot("e", Cell::new(1, 1), 10));
        let next = Snapshot::empty(1, 5).with_bot("e", Cell::new(2, 1), 10);
        let annotations = reconciler.reconcile(&next);

        let grid = render(&next, &annotations);

        let trail = arrow(&grid, 1, 1);
        assert_eq!(trail.owner, "e");
        assert_eq!(trail.direction, Direction::Right);
        assert_eq!(trail.direction.glyph(), '→');
        assert_eq!(entity(&grid, 2, 1).name, "e");
    }

    #[test]
    fn concrete_scenario() {
        let prior = Snapshot::empty(0, 5).with_bot("A", Cell::new(0, 0), 10).bots;
        let next = Snapshot::empty(1, 5)
            .with_bot("A", Cell::new(0, 1), 7)
            .with_attack(Attack::by("A"));
        let annotations = diff(&prior, &next);

        let grid = render(&next, &annotations);

        let marker = entity(&grid, 0, 1);
        assert_eq!(marker.name, "A");
        assert_eq!(marker.initial(), Some('A'));
        assert_eq!(marker.hp, 7);
        assert_eq!(marker.color, color_of("A"));
        assert!(marker.damaged);
        assert!(marker.attacking);

        let trail = arrow(&grid, 0, 0);
        assert_eq!(trail.direction, Direction::Down);
        assert_eq!(trail.color, color_of("A"));
        assert_eq!(grid.round, 1);
    }

    #[test]
    fn flags_are_independent() {
        let snapshot = Snapshot::empty(0, 3)
            .with_bot("a", Cell::new(0, 0), 1)
            .with_bot("d", Cell::new(1, 0), 1)
            .with_bot("n", Cell::new(2, 0), 1);
        let annotations = Annotations {
            moves: BTreeMap::new(),
            damaged: BTreeSet::from([String::from("d")]),
            attacking: BTreeSet::from([String::from("a")]),
        };

        let grid = render(&snapshot, &annotations);

        assert!(entity(&grid, 0, 0).attacking && !entity(&grid, 0, 0).damaged);
        assert!(entity(&grid, 1, 0).damaged && !entity(&grid, 1, 0).attacking);
        assert!(!entity(&grid, 2, 0).damaged && !entity(&grid, 2, 0).attacking);
    }

    #[test]
    fn bot_takes_precedence_over_arrow() {
        // "b" stepped onto the cell "a" just left.
        let snapshot = Snapshot::empty(1, 3)
            .with_bot("a", Cell::new(1, 0), 5)
            .with_bot("b", Cell::new(0, 0), 5);
        let annotations = Annotations {
            moves: BTreeMap::from([
                (String::from("a"), Cell::new(0, 0)),
                (String::from("b"), Cell::new(0, 1)),
            ]),
            ..Annotations::default()
        };

        let grid = render(&snapshot, &annotations);

        assert_eq!(entity(&grid, 0, 0).name, "b");
        assert_eq!(arrow(&grid, 0, 1).direction, Direction::Up);
    }

    #[test]
    fn long_jump_draws_no_arrow() {
        let prior = Snapshot::empty(0, 5).with_bot("t", Cell::new(0, 0), 5).bots;
        let next = Snapshot::empty(1, 5).with_bot("t", Cell::new(2, 3), 5);
        let annotations = diff(&prior, &next);

        let grid = render(&next, &annotations);

        assert_eq!(grid.cell(0, 0), Some(&CellView::Empty));
        assert_eq!(entity(&grid, 2, 3).name, "t");
    }

    #[test]
    fn arrow_for_missing_owner_is_dropped() {
        let annotations = Annotations {
            moves: BTreeMap::from([(String::from("ghost"), Cell::new(1, 1))]),
            ..Annotations::default()
        };
        let grid = render(&Snapshot::empty(0, 3), &annotations);
        assert_eq!(grid.cell(1, 1), Some(&CellView::Empty));
    }

    #[test]
    fn stacked_bots_draw_first_name() {
        let snapshot = Snapshot::empty(0, 2)
            .with_bot("zed", Cell::new(1, 1), 2)
            .with_bot("amy", Cell::new(1, 1), 9);
        let grid = render(&snapshot, &Annotations::default());
        assert_eq!(entity(&grid, 1, 1).name, "amy");
    }

    #[test]
    fn off_board_bots_are_skipped() {
        let snapshot = Snapshot::empty(0, 2)
            .with_bot("out", Cell::new(5, 5), 2)
            .with_bot("neg", Cell::new(-1, 0), 2);
        let grid = render(&snapshot, &Annotations::default());
        assert!(grid.cells.iter().all(|c| *c == CellView::Empty));
    }

    #[test]
    fn unchanged_input_renders_without_annotations() {
        let mut reconciler = Reconciler::new();
        let snapshot = Snapshot::empty(3, 4)
            .with_bot("A", Cell::new(0, 0), 3)
            .with_bot("B", Cell::new(3, 3), 8);
        let _ = reconciler.reconcile(&snapshot);
        let annotations = reconciler.reconcile(&snapshot);

        let grid = render(&snapshot, &annotations);

        for view in &grid.cells {
            match view {
                CellView::Entity(marker) => assert!(!marker.damaged && !marker.attacking),
                CellView::Arrow(_) => panic!("no arrows expected"),
                CellView::Empty => {}
            }
        }
    }
}
