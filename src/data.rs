use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type ProgramId = String;
pub type SectionId = String;
pub type SubjectId = String;
pub type FacultyId = String;
pub type EntryId = String;
pub type SlotIndex = usize;

/// First periods of the day that must be filled whenever a section is in session.
pub const MANDATORY_PERIODS: SlotIndex = 3;
/// Normal per-day teaching cap for one faculty member.
pub const DAILY_LOAD_LIMIT: u32 = 3;
/// Relaxed cap used only when forcing a mandatory period.
pub const FORCED_LOAD_LIMIT: u32 = 4;
/// Length of a back-to-back run that is not allowed.
pub const MAX_CONSECUTIVE: usize = 3;

/// A teaching day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Position of the day in [`Day::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lunch break placement for every section of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LunchConfig {
    pub enabled: bool,
    pub slot_index: SlotIndex,
}

/// A cohort (semester) owning a set of sections.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    #[serde(default)]
    pub lunch: Option<LunchConfig>,
}

impl Program {
    /// The lunch slot, if lunch is switched on for this program.
    pub fn lunch_slot(&self) -> Option<SlotIndex> {
        self.lunch.filter(|l| l.enabled).map(|l| l.slot_index)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub program_id: ProgramId,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub weekly_frequency: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum PresenceStatus {
    #[default]
    Present,
    Absent,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    #[serde(default)]
    pub department: String,
    pub workload_limit: u32,
    #[serde(default)]
    pub status: PresenceStatus,
}

/// Authorises one faculty member to teach one subject to one section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub section_id: SectionId,
    pub subject_id: SubjectId,
    pub faculty_id: FacultyId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Lecture,
    Lunch,
    Workshop,
    Event,
    Substitution,
}

/// One occupied cell of a grid, identified by (section, day, slot).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: EntryId,
    pub section_id: SectionId,
    pub day: Day,
    pub slot_index: SlotIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<FacultyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_faculty_id: Option<FacultyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<SubjectId>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub entry_type: EntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl TimetableEntry {
    /// An unlocked lecture, as placed by the allocator.
    pub fn lecture(
        id: impl Into<EntryId>,
        section_id: impl Into<SectionId>,
        day: Day,
        slot_index: SlotIndex,
        subject_id: impl Into<SubjectId>,
        faculty_id: impl Into<FacultyId>,
    ) -> Self {
        Self {
            id: id.into(),
            section_id: section_id.into(),
            day,
            slot_index,
            faculty_id: Some(faculty_id.into()),
            original_faculty_id: None,
            subject_id: Some(subject_id.into()),
            is_locked: false,
            entry_type: EntryType::Lecture,
            title: None,
        }
    }

    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    pub fn is_lunch(&self) -> bool {
        self.entry_type == EntryType::Lunch
    }

    pub fn occupies(&self, section_id: &str, day: Day, slot_index: SlotIndex) -> bool {
        self.section_id == section_id && self.day == day && self.slot_index == slot_index
    }
}

/// Per-faculty availability for one calendar date.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAvailability {
    pub faculty_id: FacultyId,
    pub date: String,
    #[serde(default)]
    pub status: PresenceStatus,
    #[serde(default)]
    pub unavailable_slots: Vec<SlotIndex>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub total_slots: SlotIndex,
}

impl Default for Config {
    fn default() -> Self {
        Self { total_slots: 8 }
    }
}

/// Everything the engine reads in one run. Never mutated by the engine.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub master_timetable: Vec<TimetableEntry>,
    #[serde(default)]
    pub config: Config,
}

impl Snapshot {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn program(&self, id: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.id == id)
    }

    pub fn program_of(&self, section: &Section) -> Option<&Program> {
        self.program(&section.program_id)
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn faculty_member(&self, id: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.id == id)
    }

    /// Display name for a faculty id, falling back to the raw id.
    pub fn faculty_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.faculty_member(id).map_or(id, |f| f.name.as_str())
    }

    /// "Program-Section" label; unresolved parts render as `?`.
    pub fn section_label(&self, section_id: &str) -> String {
        let section = self.section(section_id);
        let section_name = section.map_or("?", |s| s.name.as_str());
        let program_name = section
            .and_then(|s| self.program_of(s))
            .map_or("?", |p| p.name.as_str());
        format!("{program_name}-{section_name}")
    }

    /// Whether `faculty_id` holds any standing assignment for `section_id`.
    pub fn teaches_section(&self, faculty_id: &str, section_id: &str) -> bool {
        self.assignments
            .iter()
            .any(|a| a.faculty_id == faculty_id && a.section_id == section_id)
    }
}

/// Result of a conflict scan: hard violations and advisory warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResult {
    pub hard: Vec<String>,
    pub warnings: Vec<String>,
}

impl ConflictResult {
    pub fn is_clean(&self) -> bool {
        self.hard.is_empty() && self.warnings.is_empty()
    }
}

impl fmt::Display for ConflictResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.hard {
            writeln!(f, "[hard] {message}")?;
        }
        for message in &self.warnings {
            writeln!(f, "[warning] {message}")?;
        }
        Ok(())
    }
}
