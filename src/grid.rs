//! Dense working grid for one allocator run, plus master-grid maintenance.
//!
//! Cells are addressed by (section index, day, slot) into a flat vector, so
//! every lookup the allocator makes is a constant-time index computation.

use crate::data::{Day, SlotIndex, TimetableEntry};
use log::debug;
use std::collections::HashMap;

/// Section x day x slot array of cells.
#[derive(Debug, Clone)]
pub struct SectionGrid {
    section_count: usize,
    total_slots: SlotIndex,
    cells: Vec<Option<TimetableEntry>>,
}

impl SectionGrid {
    pub fn new(section_count: usize, total_slots: SlotIndex) -> Self {
        Self {
            section_count,
            total_slots,
            cells: vec![None; section_count * Day::ALL.len() * total_slots],
        }
    }

    pub fn total_slots(&self) -> SlotIndex {
        self.total_slots
    }

    fn row_start(&self, section: usize, day: Day) -> usize {
        (section * Day::ALL.len() + day.index()) * self.total_slots
    }

    pub fn get(&self, section: usize, day: Day, slot: SlotIndex) -> Option<&TimetableEntry> {
        if section >= self.section_count || slot >= self.total_slots {
            return None;
        }
        self.cells[self.row_start(section, day) + slot].as_ref()
    }

    /// True for an in-bounds cell with no occupant.
    pub fn is_vacant(&self, section: usize, day: Day, slot: SlotIndex) -> bool {
        section < self.section_count && slot < self.total_slots && self.get(section, day, slot).is_none()
    }

    /// Stores `entry` in the cell. Out-of-bounds placements are ignored.
    pub fn place(&mut self, section: usize, day: Day, slot: SlotIndex, entry: TimetableEntry) {
        if section >= self.section_count || slot >= self.total_slots {
            return;
        }
        let offset = self.row_start(section, day) + slot;
        self.cells[offset] = Some(entry);
    }

    /// All cells of one section on one day.
    pub fn row(&self, section: usize, day: Day) -> &[Option<TimetableEntry>] {
        if section >= self.section_count {
            return &[];
        }
        let start = self.row_start(section, day);
        &self.cells[start..start + self.total_slots]
    }

    pub fn row_has_subject(&self, section: usize, day: Day, subject_id: &str) -> bool {
        self.row(section, day)
            .iter()
            .flatten()
            .any(|e| e.subject_id.as_deref() == Some(subject_id))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Flattens the grid in section, day, slot order.
    pub fn into_entries(self) -> Vec<TimetableEntry> {
        self.cells.into_iter().flatten().collect()
    }
}

/// Faculty occupancy and per-day load, keyed by an interned faculty index.
#[derive(Debug, Clone, Default)]
pub struct FacultyLedger {
    total_slots: SlotIndex,
    index: HashMap<String, usize>,
    occupied: Vec<bool>,
    daily_load: Vec<u32>,
}

impl FacultyLedger {
    pub fn new(total_slots: SlotIndex) -> Self {
        Self {
            total_slots,
            ..Self::default()
        }
    }

    /// Returns the index for `faculty_id`, registering it on first sight.
    pub fn intern(&mut self, faculty_id: &str) -> usize {
        if let Some(&idx) = self.index.get(faculty_id) {
            return idx;
        }
        let idx = self.index.len();
        self.index.insert(faculty_id.to_string(), idx);
        self.occupied
            .resize(self.occupied.len() + Day::ALL.len() * self.total_slots, false);
        self.daily_load.resize(self.daily_load.len() + Day::ALL.len(), 0);
        idx
    }

    fn slot_offset(&self, faculty: usize, day: Day, slot: SlotIndex) -> usize {
        (faculty * Day::ALL.len() + day.index()) * self.total_slots + slot
    }

    pub fn is_occupied(&self, faculty: usize, day: Day, slot: SlotIndex) -> bool {
        slot < self.total_slots
            && self
                .occupied
                .get(self.slot_offset(faculty, day, slot))
                .copied()
                .unwrap_or(false)
    }

    pub fn load(&self, faculty: usize, day: Day) -> u32 {
        self.daily_load
            .get(faculty * Day::ALL.len() + day.index())
            .copied()
            .unwrap_or(0)
    }

    /// Marks the faculty busy at (day, slot) and counts it toward the day's load.
    pub fn occupy(&mut self, faculty: usize, day: Day, slot: SlotIndex) {
        if slot >= self.total_slots || faculty >= self.index.len() {
            return;
        }
        let offset = self.slot_offset(faculty, day, slot);
        self.occupied[offset] = true;
        self.daily_load[faculty * Day::ALL.len() + day.index()] += 1;
    }

    /// Length of the back-to-back run the faculty would have if placed at `slot`.
    pub fn run_length(&self, faculty: usize, day: Day, slot: SlotIndex) -> usize {
        let before = (0..slot)
            .rev()
            .take_while(|&s| self.is_occupied(faculty, day, s))
            .count();
        let after = (slot + 1..self.total_slots)
            .take_while(|&s| self.is_occupied(faculty, day, s))
            .count();
        before + 1 + after
    }
}

/// Shrinks or grows the day to `total_slots` periods (at least one), dropping
/// entries that no longer fit. Returns the size actually applied.
pub fn resize_grid(entries: &mut Vec<TimetableEntry>, total_slots: SlotIndex) -> SlotIndex {
    let total_slots = total_slots.max(1);
    let before = entries.len();
    entries.retain(|e| e.slot_index < total_slots);
    debug!(
        "Resized grid to {} slots, dropped {} entries",
        total_slots,
        before - entries.len()
    );
    total_slots
}

/// Pins `entry` into its cell as a locked entry, replacing any occupant.
pub fn place_manual_entry(entries: &mut Vec<TimetableEntry>, mut entry: TimetableEntry) {
    entries.retain(|e| !e.occupies(&entry.section_id, entry.day, entry.slot_index));
    entry.is_locked = true;
    entries.push(entry);
}

/// Flips the lock flag of the entry with `id`. Returns the new flag, or
/// `None` when no entry matches.
pub fn toggle_lock(entries: &mut [TimetableEntry], id: &str) -> Option<bool> {
    let entry = entries.iter_mut().find(|e| e.id == id)?;
    entry.is_locked = !entry.is_locked;
    Some(entry.is_locked)
}

/// Deletes the entry with `id`. Returns whether anything was removed.
pub fn remove_entry(entries: &mut Vec<TimetableEntry>, id: &str) -> bool {
    let before = entries.len();
    entries.retain(|e| e.id != id);
    before != entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_place_and_row() {
        let mut grid = SectionGrid::new(2, 4);
        let entry = TimetableEntry::lecture("e", "s2", Day::Wednesday, 3, "math", "f");
        grid.place(1, Day::Wednesday, 3, entry.clone());

        assert_eq!(grid.get(1, Day::Wednesday, 3), Some(&entry));
        assert!(grid.is_vacant(0, Day::Wednesday, 3));
        assert!(grid.row_has_subject(1, Day::Wednesday, "math"));
        assert!(!grid.row_has_subject(1, Day::Thursday, "math"));
        assert_eq!(grid.filled_count(), 1);
    }

    #[test]
    fn test_grid_out_of_bounds_is_ignored() {
        let mut grid = SectionGrid::new(1, 2);
        grid.place(0, Day::Monday, 5, TimetableEntry::lecture("e", "s", Day::Monday, 5, "m", "f"));
        assert_eq!(grid.filled_count(), 0);
        assert!(!grid.is_vacant(0, Day::Monday, 5));
        assert!(grid.row(3, Day::Monday).is_empty());
    }

    #[test]
    fn test_into_entries_order() {
        let mut grid = SectionGrid::new(2, 2);
        grid.place(1, Day::Monday, 0, TimetableEntry::lecture("c", "s2", Day::Monday, 0, "m", "f"));
        grid.place(0, Day::Tuesday, 1, TimetableEntry::lecture("b", "s1", Day::Tuesday, 1, "m", "f"));
        grid.place(0, Day::Monday, 1, TimetableEntry::lecture("a", "s1", Day::Monday, 1, "m", "f"));
        let ids: Vec<_> = grid.into_entries().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ledger_load_and_run_length() {
        let mut ledger = FacultyLedger::new(6);
        let f = ledger.intern("f1");
        assert_eq!(ledger.intern("f1"), f);

        ledger.occupy(f, Day::Monday, 1);
        ledger.occupy(f, Day::Monday, 2);
        ledger.occupy(f, Day::Monday, 4);

        assert_eq!(ledger.load(f, Day::Monday), 3);
        assert_eq!(ledger.load(f, Day::Tuesday), 0);
        assert!(ledger.is_occupied(f, Day::Monday, 2));
        // slot 3 would bridge 1-2 and 4 into a run of four
        assert_eq!(ledger.run_length(f, Day::Monday, 3), 4);
        assert_eq!(ledger.run_length(f, Day::Monday, 0), 3);
        assert_eq!(ledger.run_length(f, Day::Monday, 5), 2);
    }

    #[test]
    fn test_resize_drops_overflowing_entries() {
        let mut entries = vec![
            TimetableEntry::lecture("a", "s", Day::Monday, 0, "m", "f"),
            TimetableEntry::lecture("b", "s", Day::Monday, 5, "m", "f"),
        ];
        assert_eq!(resize_grid(&mut entries, 3), 3);
        assert_eq!(entries.len(), 1);
        assert_eq!(resize_grid(&mut entries, 0), 1);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_manual_entry_replaces_cell_and_locks() {
        let mut entries = vec![TimetableEntry::lecture("a", "s", Day::Monday, 0, "m", "f")];
        place_manual_entry(
            &mut entries,
            TimetableEntry::lecture("manual", "s", Day::Monday, 0, "p", "g"),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "manual");
        assert!(entries[0].is_locked);

        assert_eq!(toggle_lock(&mut entries, "manual"), Some(false));
        assert_eq!(toggle_lock(&mut entries, "missing"), None);
    }

    #[test]
    fn test_remove_entry() {
        let mut entries = vec![
            TimetableEntry::lecture("a", "s", Day::Monday, 0, "m", "f"),
            TimetableEntry::lecture("b", "s", Day::Monday, 1, "m", "f").locked(),
        ];
        assert!(remove_entry(&mut entries, "b"));
        assert!(!remove_entry(&mut entries, "b"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "a");
    }
}
