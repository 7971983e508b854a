//! Naked and hidden subsets within a house.
//!
//! Unlike the other finders this one eliminates eagerly while it holds a
//! house's search state taken out of the tracker, and queues bare markers
//! so progress still shows up as a non-empty queue.
//!
//! Termination within a house: every restart of the search pass follows
//! either a run split (runs only ever grow in number, bounded by N²) or a
//! mask shrink (masks only ever shrink), so passes cannot repeat forever.

use crate::bitset::{CellSet, SymSet};
use crate::engine::subsets::HouseCells;
use crate::engine::{index, index_mut, Engine, UnwindInfo};

/// Result of one search pass over a house.
enum Pass {
    /// Nothing found, move on to the next house.
    Clean,
    /// Eliminations ran, counts and runs must be resynced.
    Restart,
}

impl Engine {
    /// Searches every house for naked and hidden subsets of up to
    /// `max_subset_size` candidates, eliminating on the spot.
    ///
    /// Aborts with the unwind info of the first contradiction.
    pub fn find_subsets(&mut self, max_subset_size: u8) -> UnwindInfo {
        let order = self.order();
        for house_idx in 0..usize::from(order.house_count()) {
            let info = self.find_subsets_in_house(house_idx, max_subset_size);
            if info.did_unwind() {
                return info;
            }
        }
        UnwindInfo::NoUnwind
    }

    fn find_subsets_in_house(&mut self, house_idx: usize, max_subset_size: u8) -> UnwindInfo {
        let mut house = self.subsets.take_house(house_idx);
        let mut force_all = false;
        loop {
            let changed_runs = self.sync_runs(&mut house);
            match self.search_house(&mut house, changed_runs, force_all, max_subset_size) {
                Ok(Pass::Clean) => break,
                Ok(Pass::Restart) => force_all = true,
                // no put back; an unwind replaced the whole tracker with
                // the snapshot (or the engine went terminal)
                Err(info) => return info,
            }
        }
        self.subsets.put_house(house_idx, house);
        UnwindInfo::NoUnwind
    }

    /// Refreshes the cached candidate counts, re-sorts every run by count
    /// and splits freshly solved cells off into size-one runs.
    ///
    /// Returns the begin positions of runs whose counts changed.
    fn sync_runs(&self, house: &mut HouseCells) -> CellSet {
        let mut changed_cells = CellSet::NONE;
        for (pos, tag) in house.tags.iter_mut().enumerate() {
            let count = self.cell_candidates(tag.rmi).len();
            if count != tag.cand_count {
                tag.cand_count = count;
                changed_cells.set(pos as u8);
            }
        }
        let len = house.tags.len() as u8;
        let mut changed_runs = CellSet::NONE;
        let mut begin = 0;
        while begin < len {
            let end = house.run_end(begin);
            let changed = (begin..end).any(|pos| changed_cells.contains(pos));
            house.tags[usize::from(begin)..usize::from(end)].sort_by_key(|tag| tag.cand_count);
            let mut rest = begin;
            while rest < end && house.tags[usize::from(rest)].cand_count == 1 {
                house.run_begin.set(rest);
                rest += 1;
            }
            if rest < len {
                house.run_begin.set(rest);
            }
            if changed && rest < end {
                changed_runs.set(rest);
            }
            begin = end;
        }
        changed_runs
    }

    /// One pass of alternating naked/hidden searches over the house's runs.
    fn search_house(
        &mut self,
        house: &mut HouseCells,
        changed_runs: CellSet,
        force_all: bool,
        max_subset_size: u8,
    ) -> Result<Pass, UnwindInfo> {
        let len = house.tags.len() as u8;
        let mut begin = 0;
        while begin < len {
            let end = house.run_end(begin);
            let run_len = end - begin;
            if run_len < 3 || !(force_all || changed_runs.contains(begin)) {
                begin = end;
                continue;
            }
            let max_size = max_subset_size.min(run_len - 1);
            for subset_size in 2..=max_size {
                if let Pass::Restart = self.search_naked(house, begin, end, subset_size)? {
                    return Ok(Pass::Restart);
                }
                if let Pass::Restart = self.search_hidden(house, begin, end, subset_size)? {
                    return Ok(Pass::Restart);
                }
            }
            begin = end;
        }
        Ok(Pass::Clean)
    }

    /// Naked subsets of `size` cells within the run `[begin, end)`.
    fn search_naked(
        &mut self,
        house: &mut HouseCells,
        begin: u8,
        end: u8,
        size: u8,
    ) -> Result<Pass, UnwindInfo> {
        // cells are sorted by count, only the prefix with few enough
        // candidates can participate
        let eligible = (begin..end)
            .take_while(|&pos| house.tags[usize::from(pos)].cand_count <= size)
            .count() as u8;
        let mut walker = ComboWalker::new(eligible, size);
        while !walker.is_exhausted() {
            let mut union = SymSet::NONE;
            for &offset in walker.current() {
                union |= self.cell_candidates(house.tags[usize::from(begin + offset)].rmi);
            }
            if union.len() < size {
                // more cells than candidates between them
                return Err(self.unwind_one_frame());
            }
            if union.len() == size {
                let offsets: Vec<u8> = walker.current().to_vec();
                split_run_front(house, begin, &offsets);
                for pos in 0..house.tags.len() as u8 {
                    if (begin..begin + size).contains(&pos) {
                        continue;
                    }
                    let info = self.eliminate_set(house.tags[usize::from(pos)].rmi, union);
                    if info.did_unwind() {
                        return Err(info);
                    }
                }
                self.queues.push_subset_marker();
                return Ok(Pass::Restart);
            }
            walker.advance();
        }
        Ok(Pass::Clean)
    }

    /// Hidden subsets of `size` symbols within the run `[begin, end)`.
    ///
    /// The run only serves as the search window. Run state can lag behind
    /// the masks, so a hit is revalidated against the whole house before
    /// anything is claimed from it.
    fn search_hidden(
        &mut self,
        house: &mut HouseCells,
        begin: u8,
        end: u8,
        size: u8,
    ) -> Result<Pass, UnwindInfo> {
        // per-symbol cell positions, restricted to the run
        let mut positions_of = [CellSet::NONE; 128];
        let mut run_syms = SymSet::NONE;
        for pos in begin..end {
            let cands = self.cell_candidates(house.tags[usize::from(pos)].rmi);
            run_syms |= cands;
            for sym in cands {
                index_mut(&mut positions_of, usize::from(sym)).set(pos - begin);
            }
        }
        let eligible: Vec<u8> = run_syms
            .iter()
            .filter(|&sym| {
                let count = index(&positions_of, usize::from(sym)).len();
                (2..=size).contains(&count)
            })
            .collect();
        if (eligible.len() as u8) < size {
            return Ok(Pass::Clean);
        }

        let mut walker = ComboWalker::new(eligible.len() as u8, size);
        'combos: while !walker.is_exhausted() {
            let mut run_positions = CellSet::NONE;
            let mut combo_syms = SymSet::NONE;
            for &offset in walker.current() {
                let sym = eligible[usize::from(offset)];
                run_positions |= *index(&positions_of, usize::from(sym));
                combo_syms.set(sym);
            }
            if run_positions.len() > size {
                walker.advance();
                continue;
            }
            // revalidate house-wide; the run may be missing cells
            let mut house_positions = CellSet::NONE;
            let mut shrinks_something = false;
            for pos in 0..house.tags.len() as u8 {
                let cands = self.cell_candidates(house.tags[usize::from(pos)].rmi);
                if cands.overlaps(combo_syms) {
                    house_positions.set(pos);
                    shrinks_something |= !cands.without(combo_syms).is_empty();
                }
            }
            if house_positions.len() < size {
                // fewer possible cells than symbols
                return Err(self.unwind_one_frame());
            }
            if house_positions.len() > size || !shrinks_something {
                walker.advance();
                continue 'combos;
            }
            for pos in house_positions {
                let info = self.retain_set(house.tags[usize::from(pos)].rmi, combo_syms);
                if info.did_unwind() {
                    return Err(info);
                }
            }
            let in_run = house_positions
                .iter()
                .all(|pos| (begin..end).contains(&pos));
            if in_run {
                let offsets: Vec<u8> = house_positions.iter().map(|pos| pos - begin).collect();
                split_run_front(house, begin, &offsets);
            }
            self.queues.push_subset_marker();
            return Ok(Pass::Restart);
        }
        Ok(Pass::Clean)
    }
}

/// Swaps the cells at `begin + offsets[i]` to the front of their run and
/// marks the boundary behind them, making them a run of their own.
///
/// `offsets` must be ascending.
fn split_run_front(house: &mut HouseCells, begin: u8, offsets: &[u8]) {
    for (target, &offset) in offsets.iter().enumerate() {
        house
            .tags
            .swap(usize::from(begin) + target, usize::from(begin + offset));
    }
    house.run_begin.set(begin + offsets.len() as u8);
}

/// Walks the k-combinations of `0..n` in lexicographic order.
struct ComboWalker {
    combo: Vec<u8>,
    n: u8,
    exhausted: bool,
}

impl ComboWalker {
    fn new(n: u8, k: u8) -> Self {
        ComboWalker {
            combo: (0..k).collect(),
            n,
            exhausted: k == 0 || k > n,
        }
    }

    fn current(&self) -> &[u8] {
        &self.combo
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn advance(&mut self) {
        let k = self.combo.len();
        let mut idx = k;
        while idx > 0 {
            idx -= 1;
            // highest value slot idx can take and still leave room behind
            if self.combo[idx] < self.n - (k - idx) as u8 {
                self.combo[idx] += 1;
                for follow in idx + 1..k {
                    self.combo[follow] = self.combo[follow - 1] + 1;
                }
                return;
            }
        }
        self.exhausted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::ComboWalker;
    use crate::bitset::SymSet;
    use crate::board::{Grid, Order};
    use crate::engine::{Engine, UnwindInfo};

    #[test]
    fn combo_walker_enumerates_lexicographically() {
        let mut walker = ComboWalker::new(4, 2);
        let mut combos = vec![];
        while !walker.is_exhausted() {
            combos.push(walker.current().to_vec());
            walker.advance();
        }
        assert_eq!(
            combos,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
        assert!(ComboWalker::new(2, 3).is_exhausted());
    }

    #[test]
    fn naked_pair_eliminates_from_rest_of_house() {
        let order = Order::new(3).unwrap();
        let mut engine = Engine::new(order);
        engine.reinit(&Grid::empty(order));
        // force cells 0 and 1 down to the pair {0, 1}
        let pair = SymSet::from_index(0) | SymSet::from_index(1);
        assert!(!engine.retain_set(0, pair).did_unwind());
        assert!(!engine.retain_set(1, pair).did_unwind());

        let info = engine.find_subsets(4);
        assert_eq!(info, UnwindInfo::NoUnwind);
        assert!(engine.has_queued_deductions());
        assert!(!engine.apply_all_queued().did_unwind());
        // rest of row 0 and of block 0 lost the pair
        for &cell in &[2u16, 3, 4, 8, 9, 10, 18, 19, 20] {
            let cands = engine.cell_candidates(cell);
            assert!(!cands.contains(0) && !cands.contains(1), "cell {}", cell);
        }
        // unrelated cell kept them
        assert!(engine.cell_candidates(40).contains(0));
    }

    #[test]
    fn overconstrained_cells_unwind() {
        let order = Order::new(3).unwrap();
        let mut engine = Engine::new(order);
        engine.reinit(&Grid::empty(order));
        // three cells sharing only two candidates
        let pair = SymSet::from_index(3) | SymSet::from_index(4);
        for cell in 0..3 {
            assert!(!engine.retain_set(cell, pair).did_unwind());
        }
        let info = engine.find_subsets(4);
        assert_eq!(info, UnwindInfo::UnwoundPastRoot);
        assert!(engine.no_solutions_remain());
    }

    #[test]
    fn hidden_pair_strips_other_candidates() {
        let order = Order::new(3).unwrap();
        let mut engine = Engine::new(order);
        engine.reinit(&Grid::empty(order));
        // confine symbols 7 and 8 in row 0 to cells 0 and 1
        let pair = SymSet::from_index(7) | SymSet::from_index(8);
        for cell in 2..9 {
            assert!(!engine.eliminate_set(cell, pair).did_unwind());
        }
        let info = engine.find_subsets(4);
        assert_eq!(info, UnwindInfo::NoUnwind);
        assert!(!engine.apply_all_queued().did_unwind());
        assert_eq!(engine.cell_candidates(0), pair);
        assert_eq!(engine.cell_candidates(1), pair);
    }
}
