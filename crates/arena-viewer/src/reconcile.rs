//! Change inference between consecutive snapshots.
//!
//! The arena only ever sends full state. Which bots moved, which were hurt
//! and which attacked are recovered here by diffing the previous board
//! against the new one, keyed by bot name:
//!
//! - a bot on both boards whose cell changed gets a move annotation holding
//!   its *previous* cell
//! - a bot on both boards whose hit points strictly dropped is damaged
//! - attackers come straight from the snapshot's attack list
//!
//! Bots that just appeared have nothing to compare against and bots that
//! vanished are forgotten. Annotations live for exactly one render; the
//! next snapshot recomputes them from scratch.

use std::collections::{BTreeMap, BTreeSet};

use arena_types::{Cell, EntityState, Snapshot};

/// Previously displayed bots, keyed by name.
pub type BotMap = BTreeMap<String, EntityState>;

/// Facts derived from one pair of snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Bots that changed cell, mapped to the cell they left.
    pub moves: BTreeMap<String, Cell>,
    /// Bots whose hit points went down.
    pub damaged: BTreeSet<String>,
    /// Bots that attacked this round.
    pub attacking: BTreeSet<String>,
}

impl Annotations {
    /// Whether nothing changed worth annotating.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.damaged.is_empty() && self.attacking.is_empty()
    }
}

/// Diff `prior` against `next` without touching either.
pub fn diff(prior: &BotMap, next: &Snapshot) -> Annotations {
    let mut annotations = Annotations::default();

    for (name, before) in prior {
        let Some(after) = next.bots.get(name) else {
            continue;
        };
        if before.pos != after.pos {
            annotations.moves.insert(name.clone(), before.pos);
        }
        if after.hp < before.hp {
            annotations.damaged.insert(name.clone());
        }
    }

    annotations.attacking = next.attackers().map(ToOwned::to_owned).collect();
    annotations
}

/// Holds the last displayed board and diffs each arrival against it.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    prior: BotMap,
}

impl Reconciler {
    /// A reconciler that has not seen any snapshot yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `next` against the remembered board, then remember `next`.
    pub fn reconcile(&mut self, next: &Snapshot) -> Annotations {
        let annotations = diff(&self.prior, next);
        self.prior.clone_from(&next.bots);
        annotations
    }

    /// The remembered board.
    pub const fn prior(&self) -> &BotMap {
        &self.prior
    }
}
