use crate::data::{EntryType, FacultyId, Snapshot, TimetableEntry};
use serde::{Deserialize, Serialize};

/// Weekly teaching load of one faculty member against their limit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyWorkload {
    pub faculty_id: FacultyId,
    pub name: String,
    pub department: String,
    pub lectures: usize,
    pub limit: u32,
    /// Rounded percentage of `limit`; 0 when no limit is set.
    pub utilization: u32,
}

/// Lecture counts per faculty, busiest first.
pub fn faculty_workload(entries: &[TimetableEntry], snapshot: &Snapshot) -> Vec<FacultyWorkload> {
    let mut rows: Vec<FacultyWorkload> = snapshot
        .faculty
        .iter()
        .map(|f| {
            let lectures = entries
                .iter()
                .filter(|e| {
                    e.entry_type == EntryType::Lecture
                        && e.faculty_id.as_deref() == Some(f.id.as_str())
                })
                .count();
            let utilization = if f.workload_limit == 0 {
                0
            } else {
                (lectures as f64 * 100.0 / f64::from(f.workload_limit)).round() as u32
            };
            FacultyWorkload {
                faculty_id: f.id.clone(),
                name: f.name.clone(),
                department: f.department.clone(),
                lectures,
                limit: f.workload_limit,
                utilization,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.lectures.cmp(&a.lectures));
    rows
}
