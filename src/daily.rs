//! Date-scoped working copies of the master grid.
//!
//! A daily copy is seeded from the master entries of one weekday and then
//! edited in place (absences, substitutions, workshops, lunch overrides).
//! Nothing here writes back to the master grid.

use crate::data::{
    Day, EntryId, EntryType, FacultyId, SectionId, SlotIndex, Snapshot, SubjectId, TimetableEntry,
};
use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Weekday of a `YYYY-MM-DD` date. Weekends map to Monday.
pub fn weekday_for_date(date: &str) -> Result<Day> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|source| Error::InvalidDate {
        date: date.to_string(),
        source,
    })?;
    Ok(match parsed.weekday() {
        Weekday::Tue => Day::Tuesday,
        Weekday::Wed => Day::Wednesday,
        Weekday::Thu => Day::Thursday,
        Weekday::Fri => Day::Friday,
        Weekday::Mon | Weekday::Sat | Weekday::Sun => Day::Monday,
    })
}

/// Copies the master entries of `day` into a working copy for `date`.
///
/// Each copy gets the id `daily-{date}-{original id}` and remembers the
/// master faculty in `original_faculty_id`.
pub fn clone_master(date: &str, day: Day, snapshot: &Snapshot) -> Vec<TimetableEntry> {
    let cloned: Vec<TimetableEntry> = snapshot
        .master_timetable
        .iter()
        .filter(|e| e.day == day)
        .map(|e| TimetableEntry {
            id: format!("daily-{date}-{}", e.id),
            original_faculty_id: e.faculty_id.clone(),
            ..e.clone()
        })
        .collect();
    info!("Cloned {} {} entries into the sheet for {}", cloned.len(), day, date);
    cloned
}

/// Drops every entry taught by `faculty_id` from the daily copy. Returns how
/// many entries were removed.
pub fn mark_absent(daily: &mut Vec<TimetableEntry>, faculty_id: &str) -> usize {
    let before = daily.len();
    daily.retain(|e| e.faculty_id.as_deref() != Some(faculty_id));
    let removed = before - daily.len();
    debug!("Removed {} entries of absent faculty {}", removed, faculty_id);
    removed
}

/// Drops the entry `faculty_id` teaches at `slot_index`, leaving the rest of
/// their day intact.
pub fn mark_unavailable_slot(
    daily: &mut Vec<TimetableEntry>,
    faculty_id: &str,
    slot_index: SlotIndex,
) -> usize {
    let before = daily.len();
    daily.retain(|e| !(e.slot_index == slot_index && e.faculty_id.as_deref() == Some(faculty_id)));
    let removed = before - daily.len();
    debug!(
        "Removed {} entries of {} at P{}",
        removed,
        faculty_id,
        slot_index + 1
    );
    removed
}

/// An ad-hoc change to one cell of a daily copy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlacement {
    pub id: EntryId,
    pub section_id: SectionId,
    pub slot_index: SlotIndex,
    pub entry_type: EntryType,
    #[serde(default)]
    pub faculty_id: Option<FacultyId>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Writes `placement` into the daily copy, replacing the cell's occupant.
///
/// The subject comes from the faculty's assignment for the section, or any
/// assignment they hold. The faculty originally scheduled in the cell is
/// carried over so the substitution stays traceable.
pub fn place_daily_entry(
    daily: &mut Vec<TimetableEntry>,
    day: Day,
    placement: DailyPlacement,
    snapshot: &Snapshot,
) {
    let occupant = daily
        .iter()
        .position(|e| e.section_id == placement.section_id && e.slot_index == placement.slot_index);
    let original_faculty_id = occupant
        .map(|idx| daily.remove(idx))
        .and_then(|e| e.original_faculty_id.or(e.faculty_id));

    let subject_id = placement
        .faculty_id
        .as_deref()
        .and_then(|f| subject_for(snapshot, f, &placement.section_id));

    debug!(
        "Placing {:?} at {} P{} (was {:?})",
        placement.entry_type,
        placement.section_id,
        placement.slot_index + 1,
        original_faculty_id
    );
    daily.push(TimetableEntry {
        id: placement.id,
        section_id: placement.section_id,
        day,
        slot_index: placement.slot_index,
        faculty_id: placement.faculty_id,
        original_faculty_id,
        subject_id,
        is_locked: false,
        entry_type: placement.entry_type,
        title: placement.title,
    });
}

fn subject_for(snapshot: &Snapshot, faculty_id: &str, section_id: &str) -> Option<SubjectId> {
    let mut held = snapshot
        .assignments
        .iter()
        .filter(|a| a.faculty_id == faculty_id);
    held.clone()
        .find(|a| a.section_id == section_id)
        .or_else(|| held.next())
        .map(|a| a.subject_id.clone())
}
