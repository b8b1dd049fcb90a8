//! Foreign-key dependency ordering for table creation and removal.
//!
//! Tables must be created after the tables they reference and dropped before
//! them. [`resolve`] walks the reference graph depth-first (referencing →
//! referenced) and emits each table once all of its dependencies have been
//! emitted, i.e. in post-order.
//!
//! # Determinism
//!
//! Roots are visited in input order and each table's foreign keys in
//! declaration order. Names are looked up through a map, but nothing ever
//! iterates that map, so the result depends only on the input sequence.
//!
//! # Cycles
//!
//! A foreign key that leads back to a table still on the walk stack closes a
//! cycle. That key is deferred (created later with `ALTER TABLE`) and the
//! walk carries on, so cycles never fail. Self-references are not ordering
//! constraints at all and stay inline.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::schema::Table;
use crate::error::{ExportError, Result};

/// Why a foreign key is created after all tables instead of inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeferReason {
    /// The key closes a reference cycle among the requested tables.
    Cycle,
    /// The referenced table is not part of the request.
    External,
}

impl fmt::Display for DeferReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeferReason::Cycle => f.write_str("cycle"),
            DeferReason::External => f.write_str("external"),
        }
    }
}

/// A foreign key that is not declared inline in its `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredForeignKey {
    /// Owning (referencing) table.
    pub table: String,
    /// Position of the key in the owning table's `foreign_keys`.
    pub position: usize,
    /// Referenced table.
    pub referenced_table: String,
    pub reason: DeferReason,
}

/// Result of dependency resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Every input table exactly once, referenced tables first.
    pub creation_order: Vec<String>,
    /// Foreign keys to emit after every table exists, in discovery order.
    pub deferred: Vec<DeferredForeignKey>,
}

impl Resolution {
    /// Reverse of the creation order: referencing tables first.
    pub fn drop_order(&self) -> Vec<String> {
        self.creation_order.iter().rev().cloned().collect()
    }

    /// Whether the key at `position` on `table` is deferred.
    pub fn is_deferred(&self, table: &str, position: usize) -> bool {
        self.deferred
            .iter()
            .any(|d| d.table == table && d.position == position)
    }

    /// Deferred keys that close a cycle.
    pub fn cycle_breaking(&self) -> impl Iterator<Item = &DeferredForeignKey> {
        self.deferred
            .iter()
            .filter(|d| d.reason == DeferReason::Cycle)
    }

    /// Whether any cycle had to be broken.
    pub fn has_cycles(&self) -> bool {
        self.cycle_breaking().next().is_some()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnStack,
    Done,
}

/// Compute creation order and deferred foreign keys for `tables`.
///
/// # Errors
///
/// Returns `ExportError::InvalidSchema` for duplicate table names and for
/// structurally malformed foreign keys (no columns, no referenced table, or
/// a referenced column list of a different length).
pub fn resolve(tables: &[Table]) -> Result<Resolution> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(tables.len());
    for (i, table) in tables.iter().enumerate() {
        if index.insert(table.name.as_str(), i).is_some() {
            return Err(ExportError::InvalidSchema(format!(
                "Duplicate table '{}' in export request",
                table.name
            )));
        }
        for fk in &table.foreign_keys {
            fk.validate(&table.name)?;
        }
    }

    let mut state = vec![VisitState::Unvisited; tables.len()];
    let mut resolution = Resolution {
        creation_order: Vec::with_capacity(tables.len()),
        deferred: Vec::new(),
    };

    // Explicit stack of (table index, next foreign key position); deep
    // reference chains must not exhaust the thread stack.
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..tables.len() {
        if state[root] != VisitState::Unvisited {
            continue;
        }
        state[root] = VisitState::OnStack;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (current, position) = *frame;
            let table = &tables[current];

            let Some(fk) = table.foreign_keys.get(position) else {
                stack.pop();
                state[current] = VisitState::Done;
                resolution.creation_order.push(table.name.clone());
                continue;
            };
            frame.1 += 1;

            if fk.referenced_table == table.name {
                continue;
            }

            match index.get(fk.referenced_table.as_str()) {
                None => resolution.deferred.push(DeferredForeignKey {
                    table: table.name.clone(),
                    position,
                    referenced_table: fk.referenced_table.clone(),
                    reason: DeferReason::External,
                }),
                Some(&target) => match state[target] {
                    VisitState::Done => {}
                    VisitState::OnStack => {
                        warn!(
                            "Foreign key {} on '{}' closes a cycle through '{}'; deferring it",
                            fk.constraint_name(&table.name),
                            table.name,
                            fk.referenced_table
                        );
                        resolution.deferred.push(DeferredForeignKey {
                            table: table.name.clone(),
                            position,
                            referenced_table: fk.referenced_table.clone(),
                            reason: DeferReason::Cycle,
                        });
                    }
                    VisitState::Unvisited => {
                        state[target] = VisitState::OnStack;
                        stack.push((target, 0));
                    }
                },
            }
        }
    }

    debug!(
        "Resolved creation order: {:?} ({} deferred foreign keys)",
        resolution.creation_order,
        resolution.deferred.len()
    );
    Ok(resolution)
}

/// Tables that take part in at least one reference cycle, in input order.
///
/// Self-references count. Useful for reporting; [`resolve`] handles cycles
/// on its own.
pub fn cyclic_tables(tables: &[Table]) -> Vec<String> {
    let index: HashMap<&str, usize> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();

    let edges: Vec<Vec<usize>> = tables
        .iter()
        .map(|t| {
            t.foreign_keys
                .iter()
                .filter_map(|fk| index.get(fk.referenced_table.as_str()).copied())
                .collect()
        })
        .collect();

    // A table is cyclic when it can reach itself.
    let mut cyclic = Vec::new();
    for start in 0..tables.len() {
        let mut seen = HashSet::new();
        let mut pending: Vec<usize> = edges[start].clone();
        while let Some(next) = pending.pop() {
            if next == start {
                cyclic.push(tables[start].name.clone());
                break;
            }
            if seen.insert(next) {
                pending.extend(edges[next].iter().copied());
            }
        }
    }
    cyclic
}
