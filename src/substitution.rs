use crate::data::{
    DailyAvailability, FacultyId, PresenceStatus, SectionId, SlotIndex, Snapshot, TimetableEntry,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Starting score for a free faculty member.
pub const BASE_RANK: i32 = 100;
/// Subtracted per period already taught that day.
pub const LOAD_PENALTY: i32 = 10;
/// Added when the faculty already teaches the vacant section.
pub const FAMILIAR_SECTION_BONUS: i32 = 50;

/// A vacant cell of a dated daily grid.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRef {
    pub date: String,
    pub section_id: SectionId,
    pub slot_index: SlotIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "section", rename_all = "camelCase")]
pub enum BusyReason {
    Absent,
    /// Teaching the given "Program-Section" at that slot.
    Teaching(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFaculty {
    pub faculty_id: FacultyId,
    pub name: String,
    pub is_busy: bool,
    pub busy_reason: Option<BusyReason>,
    pub load: usize,
    pub rank: i32,
}

/// Orders every faculty member from best to worst stand-in for `target`.
///
/// Busy faculty (absent for the date, unavailable at the slot, or already
/// teaching at it) score 0. Everyone else starts at [`BASE_RANK`], loses
/// [`LOAD_PENALTY`] per period taught that day and gains
/// [`FAMILIAR_SECTION_BONUS`] if they hold an assignment for the section.
/// Ties keep faculty order. Advisory only; nothing is assigned.
pub fn rank_substitutes(
    target: &SlotRef,
    availability: &[DailyAvailability],
    daily_schedule: &[TimetableEntry],
    snapshot: &Snapshot,
) -> Vec<RankedFaculty> {
    let mut ranked: Vec<RankedFaculty> = snapshot
        .faculty
        .iter()
        .map(|faculty| {
            let avail = availability
                .iter()
                .find(|a| a.faculty_id == faculty.id && a.date == target.date);
            let is_absent = avail.is_some_and(|a| {
                a.status == PresenceStatus::Absent || a.unavailable_slots.contains(&target.slot_index)
            });

            let day_schedule: Vec<&TimetableEntry> = daily_schedule
                .iter()
                .filter(|e| e.faculty_id.as_deref() == Some(faculty.id.as_str()))
                .collect();
            let teaching = day_schedule
                .iter()
                .find(|e| e.slot_index == target.slot_index);
            let load = day_schedule.len();

            let busy_reason = if is_absent {
                Some(BusyReason::Absent)
            } else {
                teaching.map(|e| BusyReason::Teaching(snapshot.section_label(&e.section_id)))
            };

            let rank = if busy_reason.is_some() {
                0
            } else {
                let mut rank = BASE_RANK - load as i32 * LOAD_PENALTY;
                if snapshot.teaches_section(&faculty.id, &target.section_id) {
                    rank += FAMILIAR_SECTION_BONUS;
                }
                rank
            };

            RankedFaculty {
                faculty_id: faculty.id.clone(),
                name: faculty.name.clone(),
                is_busy: busy_reason.is_some(),
                busy_reason,
                load,
                rank,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.rank.cmp(&a.rank));

    let free = ranked.iter().filter(|r| !r.is_busy).count();
    info!(
        "Ranked {} faculty for {} P{} on {} ({} free)",
        ranked.len(),
        target.section_id,
        target.slot_index + 1,
        target.date,
        free
    );
    if let Some(best) = ranked.first().filter(|r| !r.is_busy) {
        debug!("Best substitute: {} (rank {})", best.name, best.rank);
    }
    ranked
}
