use crate::data::{
    ConflictResult, DAILY_LOAD_LIMIT, Day, MANDATORY_PERIODS, MAX_CONSECUTIVE, Snapshot,
    TimetableEntry,
};
use itertools::Itertools;
use log::{debug, info};
use std::collections::HashMap;

/// Scans any set of entries (master grid or a daily copy) for rule violations.
///
/// Hard violations are faculty double-booking, an empty mandatory period on a
/// day the section is otherwise in session, and three back-to-back lectures.
/// Teaching more than [`DAILY_LOAD_LIMIT`] periods in a day is a warning.
/// Unknown ids never abort the scan; they render as `?` in messages.
pub fn check(entries: &[TimetableEntry], snapshot: &Snapshot, date: Option<&str>) -> ConflictResult {
    debug!(
        "Checking {} entries{}",
        entries.len(),
        date.map(|d| format!(" for {d}")).unwrap_or_default()
    );
    let mut result = ConflictResult::default();

    detect_clashes(entries, snapshot, &mut result.hard);
    detect_morning_gaps(entries, snapshot, &mut result.hard);
    detect_faculty_overload(entries, snapshot, &mut result);

    info!(
        "Found {} hard conflicts and {} warnings",
        result.hard.len(),
        result.warnings.len()
    );
    result
}

// one message per faculty per (day, slot) booked in two or more sections
fn detect_clashes(entries: &[TimetableEntry], snapshot: &Snapshot, hard: &mut Vec<String>) {
    let total_slots = snapshot.config.total_slots;
    let mut cells: Vec<Vec<&TimetableEntry>> = vec![Vec::new(); Day::ALL.len() * total_slots];
    for entry in entries
        .iter()
        .filter(|e| e.faculty_id.is_some() && e.slot_index < total_slots)
    {
        cells[entry.day.index() * total_slots + entry.slot_index].push(entry);
    }

    for day in Day::ALL {
        for slot in 0..total_slots {
            let mut by_faculty: Vec<(&str, Vec<&str>)> = Vec::new();
            for entry in &cells[day.index() * total_slots + slot] {
                let Some(faculty_id) = entry.faculty_id.as_deref() else {
                    continue;
                };
                match by_faculty.iter_mut().find(|(id, _)| *id == faculty_id) {
                    Some((_, sections)) => sections.push(entry.section_id.as_str()),
                    None => by_faculty.push((faculty_id, vec![entry.section_id.as_str()])),
                }
            }

            for (faculty_id, sections) in by_faculty {
                let sections: Vec<&str> = sections.into_iter().unique().collect();
                if sections.len() < 2 {
                    continue;
                }
                let labels = sections
                    .iter()
                    .map(|s| snapshot.section_label(s))
                    .join(", ");
                hard.push(format!(
                    "{} CLASH on {} P{} in: {}",
                    snapshot.faculty_name(faculty_id),
                    day,
                    slot + 1,
                    labels
                ));
            }
        }
    }
}

// an empty mandatory period only counts when a later, non-lunch period that day is taken
fn detect_morning_gaps(entries: &[TimetableEntry], snapshot: &Snapshot, hard: &mut Vec<String>) {
    let by_section_day: HashMap<(&str, Day), Vec<&TimetableEntry>> = entries
        .iter()
        .into_group_map_by(|e| (e.section_id.as_str(), e.day));

    for section in &snapshot.sections {
        let lunch_slot = snapshot.program_of(section).and_then(|p| p.lunch_slot());
        for day in Day::ALL {
            let day_entries = by_section_day
                .get(&(section.id.as_str(), day))
                .map(Vec::as_slice)
                .unwrap_or_default();
            for slot in 0..MANDATORY_PERIODS {
                if lunch_slot == Some(slot) {
                    continue;
                }
                let filled = day_entries.iter().any(|e| e.slot_index == slot);
                let in_session_later = day_entries
                    .iter()
                    .any(|e| e.slot_index > slot && !e.is_lunch());
                if !filled && in_session_later {
                    hard.push(format!(
                        "{}: Mandatory Morning P{} is Empty",
                        snapshot.section_label(&section.id),
                        slot + 1
                    ));
                }
            }
        }
    }
}

fn detect_faculty_overload(entries: &[TimetableEntry], snapshot: &Snapshot, result: &mut ConflictResult) {
    let by_faculty_day: HashMap<(&str, Day), Vec<&TimetableEntry>> = entries
        .iter()
        .filter(|e| !e.is_lunch())
        .filter_map(|e| e.faculty_id.as_deref().map(|f| ((f, e.day), e)))
        .into_group_map();

    for day in Day::ALL {
        for faculty in &snapshot.faculty {
            let Some(day_classes) = by_faculty_day.get(&(faculty.id.as_str(), day)) else {
                continue;
            };
            let slots: Vec<usize> = day_classes
                .iter()
                .map(|e| e.slot_index)
                .sorted()
                .collect();

            if slots.len() > DAILY_LOAD_LIMIT as usize {
                result.warnings.push(format!(
                    "{}: Excessive load ({}/{}) on {}",
                    faculty.name,
                    slots.len(),
                    DAILY_LOAD_LIMIT,
                    day
                ));
            }

            let back_to_back = slots
                .windows(MAX_CONSECUTIVE)
                .any(|w| w.iter().tuple_windows().all(|(a, b)| *b == *a + 1));
            if back_to_back {
                result.hard.push(format!(
                    "{}: {} Consecutive Lectures on {}",
                    faculty.name, MAX_CONSECUTIVE, day
                ));
            }
        }
    }
}
