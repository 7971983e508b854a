//! Locked candidates: symbols confined to a single line/block intersection.
//!
//! Works chute by chute. A chute's N lines and N blocks overlap in N²
//! intersections of N cells each; one pass over the chute's N³ cells
//! accumulates the candidate union of every intersection and the deductions
//! fall out of comparing those unions.

use crate::bitset::SymSet;
use crate::board::LineKind;
use crate::engine::queues::{LockedCands, LockedTarget};
use crate::engine::{index, Engine};

impl Engine {
    /// Scans every chute for symbols locked into one intersection and
    /// queues the resulting eliminations.
    ///
    /// A record is only queued when the elimination actually removes a
    /// candidate, so a non-empty queue afterwards means progress.
    pub fn find_locked_candidates(&mut self) {
        let order = self.order();
        let n = usize::from(order.get());
        let n2 = u16::from(order.symbol_count());
        // candidate union per intersection, indexed line-major
        let mut isec = vec![SymSet::NONE; n * n];
        for &line_kind in &LineKind::ALL {
            for chute in 0..order.get() {
                for syms in &mut isec {
                    *syms = SymSet::NONE;
                }
                for idx in 0..n2 * u16::from(order.get()) {
                    let cell = order.chute_cell(line_kind, chute, idx);
                    let line_in_chute = usize::from(idx / n2);
                    let block_in_chute = usize::from((idx % n2) / u16::from(order.get()));
                    isec[line_in_chute * n + block_in_chute] |= self.cell_candidates(cell);
                }

                // symbols confined to one block within their line clear
                // the rest of that block
                for line_in_chute in 0..n {
                    let unique = unique_syms((0..n).map(|b| isec[line_in_chute * n + b]));
                    if unique.is_empty() {
                        continue;
                    }
                    for block_in_chute in 0..n {
                        let mut locked = isec[line_in_chute * n + block_in_chute] & unique;
                        locked &= union_except(&isec, n, block_in_chute, line_in_chute, true);
                        if locked.is_empty() {
                            continue;
                        }
                        self.queues.push_locked_cands(LockedCands {
                            syms: locked,
                            line_kind,
                            line: chute * order.get() + line_in_chute as u8,
                            block: order.chute_block(line_kind, chute, block_in_chute as u8),
                            target: LockedTarget::RestOfBlock,
                        });
                    }
                }

                // symbols confined to one line within their block clear
                // the rest of that line
                for block_in_chute in 0..n {
                    let unique = unique_syms((0..n).map(|l| isec[l * n + block_in_chute]));
                    if unique.is_empty() {
                        continue;
                    }
                    for line_in_chute in 0..n {
                        let mut locked = isec[line_in_chute * n + block_in_chute] & unique;
                        locked &= union_except(&isec, n, line_in_chute, block_in_chute, false);
                        if locked.is_empty() {
                            continue;
                        }
                        self.queues.push_locked_cands(LockedCands {
                            syms: locked,
                            line_kind,
                            line: chute * order.get() + line_in_chute as u8,
                            block: order.chute_block(line_kind, chute, block_in_chute as u8),
                            target: LockedTarget::RestOfLine,
                        });
                    }
                }
            }
        }
    }
}

/// Symbols occurring in exactly one of the given sets.
fn unique_syms(sets: impl Iterator<Item = SymSet>) -> SymSet {
    let mut seen = SymSet::NONE;
    let mut multi = SymSet::NONE;
    for set in sets {
        multi |= seen & set;
        seen |= set;
    }
    seen.without(multi)
}

/// Union of the intersections of one block (`along_lines`) or one line
/// excluding position `except`.
fn union_except(isec: &[SymSet], n: usize, fixed: usize, except: usize, along_lines: bool) -> SymSet {
    let mut union = SymSet::NONE;
    for other in 0..n {
        if other == except {
            continue;
        }
        let idx = if along_lines {
            other * n + fixed
        } else {
            fixed * n + other
        };
        union |= *index(isec, idx);
    }
    union
}
