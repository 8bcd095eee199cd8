use crate::data::{
    Assignment, DAILY_LOAD_LIMIT, Day, EntryType, FORCED_LOAD_LIMIT, MANDATORY_PERIODS,
    MAX_CONSECUTIVE, Section, SlotIndex, Snapshot, TimetableEntry,
};
use crate::grid::{FacultyLedger, SectionGrid};
use log::{debug, info, trace};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::Instant;

/// Per-run bookkeeping for one teaching obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CandidateState {
    remaining_frequency: i64,
    total_scheduled: u32,
}

impl CandidateState {
    fn record_placement(&mut self) {
        self.remaining_frequency -= 1;
        self.total_scheduled += 1;
    }
}

/// A (section, subject, faculty) obligation derived from one assignment.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    assignment: &'a Assignment,
    faculty: usize,
    state: CandidateState,
}

/// Candidates of a run, pre-indexed by section.
struct CandidatePool<'a> {
    candidates: Vec<Candidate<'a>>,
    by_section: Vec<Vec<usize>>,
}

impl<'a> CandidatePool<'a> {
    fn build(
        snapshot: &'a Snapshot,
        section_index: &HashMap<&str, usize>,
        ledger: &mut FacultyLedger,
    ) -> Self {
        let mut candidates = Vec::new();
        let mut by_section = vec![Vec::new(); snapshot.sections.len()];

        for assignment in &snapshot.assignments {
            let Some(&section) = section_index.get(assignment.section_id.as_str()) else {
                debug!(
                    "Skipping assignment {}: unknown section {}",
                    assignment.id, assignment.section_id
                );
                continue;
            };
            let weekly = snapshot
                .subject(&assignment.subject_id)
                .map_or(0, |s| i64::from(s.weekly_frequency));
            let already_locked = snapshot
                .master_timetable
                .iter()
                .filter(|e| {
                    e.is_locked
                        && e.section_id == assignment.section_id
                        && e.subject_id.as_deref() == Some(assignment.subject_id.as_str())
                })
                .count();

            by_section[section].push(candidates.len());
            candidates.push(Candidate {
                assignment,
                faculty: ledger.intern(&assignment.faculty_id),
                state: CandidateState {
                    remaining_frequency: weekly - already_locked as i64,
                    total_scheduled: already_locked as u32,
                },
            });
        }

        Self {
            candidates,
            by_section,
        }
    }

    /// Picks the best candidate for an empty cell, or `None` if nobody fits.
    ///
    /// Candidates are ranked by remaining frequency (highest first), then by
    /// the faculty's load that day (lowest first). The sort is stable, so
    /// full ties keep assignment order.
    #[allow(clippy::too_many_arguments)]
    fn find_best(
        &self,
        grid: &SectionGrid,
        ledger: &FacultyLedger,
        section: usize,
        day: Day,
        slot: SlotIndex,
        force_fill: bool,
        load_limit: u32,
    ) -> Option<usize> {
        let mut order = self.by_section.get(section)?.clone();
        order.sort_by_key(|&i| {
            let c = &self.candidates[i];
            (
                Reverse(c.state.remaining_frequency),
                ledger.load(c.faculty, day),
            )
        });

        order.into_iter().find(|&i| {
            let c = &self.candidates[i];
            !ledger.is_occupied(c.faculty, day, slot)
                && ledger.load(c.faculty, day) < load_limit
                && ledger.run_length(c.faculty, day, slot) < MAX_CONSECUTIVE
                && !grid.row_has_subject(section, day, &c.assignment.subject_id)
                && (force_fill || c.state.remaining_frequency > 0)
        })
    }
}

/// Generates the weekly master grid for every section of the snapshot.
///
/// Lunch and locked entries are placed first. Periods below
/// [`MANDATORY_PERIODS`] are then filled for every day and section, falling
/// back to a forced fill with a relaxed load cap when no regular candidate
/// qualifies. Finally every remaining empty cell is filled opportunistically;
/// cells nobody can take stay empty.
pub fn generate(snapshot: &Snapshot) -> Vec<TimetableEntry> {
    let start_time = Instant::now();
    let total_slots = snapshot.config.total_slots;
    info!(
        "Generating timetable for {} sections, {} assignments, {} slots per day...",
        snapshot.sections.len(),
        snapshot.assignments.len(),
        total_slots
    );

    let section_index: HashMap<&str, usize> = snapshot
        .sections
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();
    let mut grid = SectionGrid::new(snapshot.sections.len(), total_slots);
    let mut ledger = FacultyLedger::new(total_slots);

    place_lunch(snapshot, &mut grid);
    place_locked(snapshot, &section_index, &mut grid, &mut ledger);
    let prefilled = grid.filled_count();
    trace!("Pre-filled {} cells with lunch and locked entries", prefilled);

    let mut pool = CandidatePool::build(snapshot, &section_index, &mut ledger);

    // mandatory spine: forced fill allowed
    for slot in 0..MANDATORY_PERIODS.min(total_slots) {
        for day in Day::ALL {
            for (s_idx, section) in snapshot.sections.iter().enumerate() {
                if !grid.is_vacant(s_idx, day, slot) {
                    continue;
                }
                let found = pool
                    .find_best(&grid, &ledger, s_idx, day, slot, false, DAILY_LOAD_LIMIT)
                    .or_else(|| {
                        let forced = pool.find_best(
                            &grid,
                            &ledger,
                            s_idx,
                            day,
                            slot,
                            true,
                            FORCED_LOAD_LIMIT,
                        );
                        if forced.is_some() {
                            debug!("Forced fill for {} on {} P{}", section.id, day, slot + 1);
                        }
                        forced
                    });
                match found {
                    Some(c) => place(
                        &mut pool, c, "auto-morn", section, s_idx, day, slot, &mut grid,
                        &mut ledger,
                    ),
                    None => trace!(
                        "No candidate for mandatory {} {} P{}",
                        section.id,
                        day,
                        slot + 1
                    ),
                }
            }
        }
    }

    // flexible pass: regular candidates only, gaps allowed
    for slot in 0..total_slots {
        for day in Day::ALL {
            for (s_idx, section) in snapshot.sections.iter().enumerate() {
                if !grid.is_vacant(s_idx, day, slot) {
                    continue;
                }
                match pool.find_best(&grid, &ledger, s_idx, day, slot, false, DAILY_LOAD_LIMIT) {
                    Some(c) => place(
                        &mut pool, c, "auto-flex", section, s_idx, day, slot, &mut grid,
                        &mut ledger,
                    ),
                    None => trace!("Leaving {} {} P{} empty", section.id, day, slot + 1),
                }
            }
        }
    }

    let placed = grid.filled_count() - prefilled;
    let entries = grid.into_entries();
    for c in &pool.candidates {
        trace!(
            "{}/{} by {}: {} scheduled, {} remaining",
            c.assignment.section_id,
            c.assignment.subject_id,
            c.assignment.faculty_id,
            c.state.total_scheduled,
            c.state.remaining_frequency
        );
    }
    let unmet: i64 = pool
        .candidates
        .iter()
        .map(|c| c.state.remaining_frequency.max(0))
        .sum();
    info!(
        "Generated {} entries ({} placed, {} pre-filled, {} weekly sessions unmet) in {:.2?}",
        entries.len(),
        placed,
        prefilled,
        unmet,
        start_time.elapsed()
    );
    entries
}

fn place_lunch(snapshot: &Snapshot, grid: &mut SectionGrid) {
    for (s_idx, section) in snapshot.sections.iter().enumerate() {
        let Some(slot) = snapshot.program_of(section).and_then(|p| p.lunch_slot()) else {
            continue;
        };
        if slot >= grid.total_slots() {
            continue;
        }
        for day in Day::ALL {
            grid.place(s_idx, day, slot, lunch_entry(section, day, slot));
        }
    }
}

fn place_locked(
    snapshot: &Snapshot,
    section_index: &HashMap<&str, usize>,
    grid: &mut SectionGrid,
    ledger: &mut FacultyLedger,
) {
    for entry in &snapshot.master_timetable {
        if !entry.is_locked || entry.is_lunch() || entry.slot_index >= grid.total_slots() {
            continue;
        }
        let Some(&s_idx) = section_index.get(entry.section_id.as_str()) else {
            continue;
        };
        if !grid.is_vacant(s_idx, entry.day, entry.slot_index) {
            continue;
        }
        grid.place(s_idx, entry.day, entry.slot_index, entry.clone());
        if let Some(faculty_id) = &entry.faculty_id {
            let faculty = ledger.intern(faculty_id);
            ledger.occupy(faculty, entry.day, entry.slot_index);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn place(
    pool: &mut CandidatePool<'_>,
    candidate: usize,
    id_prefix: &str,
    section: &Section,
    s_idx: usize,
    day: Day,
    slot: SlotIndex,
    grid: &mut SectionGrid,
    ledger: &mut FacultyLedger,
) {
    let c = &mut pool.candidates[candidate];
    let entry = TimetableEntry::lecture(
        format!("{id_prefix}-{}-{day}-{slot}", section.id),
        section.id.clone(),
        day,
        slot,
        c.assignment.subject_id.clone(),
        c.assignment.faculty_id.clone(),
    );
    grid.place(s_idx, day, slot, entry);
    ledger.occupy(c.faculty, day, slot);
    c.state.record_placement();
}

fn lunch_entry(section: &Section, day: Day, slot: SlotIndex) -> TimetableEntry {
    TimetableEntry {
        id: format!("lunch-{}-{day}", section.id),
        section_id: section.id.clone(),
        day,
        slot_index: slot,
        faculty_id: None,
        original_faculty_id: None,
        subject_id: None,
        is_locked: true,
        entry_type: EntryType::Lunch,
        title: Some("LUNCH".to_string()),
    }
}
