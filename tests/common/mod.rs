#![allow(dead_code)]

use timetable_engine::data::{
    Assignment, Config, Faculty, LunchConfig, PresenceStatus, Program, Section, Snapshot, Subject,
};

pub fn program(id: &str, name: &str, lunch_slot: Option<usize>) -> Program {
    Program {
        id: id.into(),
        name: name.into(),
        lunch: lunch_slot.map(|slot_index| LunchConfig {
            enabled: true,
            slot_index,
        }),
    }
}

pub fn section(id: &str, name: &str, program_id: &str) -> Section {
    Section {
        id: id.into(),
        name: name.into(),
        program_id: program_id.into(),
    }
}

pub fn subject(id: &str, weekly_frequency: u32) -> Subject {
    Subject {
        id: id.into(),
        name: id.to_uppercase(),
        code: format!("{}-101", id.to_uppercase()),
        weekly_frequency,
    }
}

pub fn faculty(id: &str, name: &str) -> Faculty {
    Faculty {
        id: id.into(),
        name: name.into(),
        department: "General".into(),
        workload_limit: 20,
        status: PresenceStatus::Present,
    }
}

pub fn assignment(section_id: &str, subject_id: &str, faculty_id: &str) -> Assignment {
    Assignment {
        id: format!("{section_id}-{subject_id}-{faculty_id}"),
        section_id: section_id.into(),
        subject_id: subject_id.into(),
        faculty_id: faculty_id.into(),
    }
}

/// Two programs, four sections and a shared staff room.
pub fn institute() -> Snapshot {
    let mut snapshot = Snapshot {
        programs: vec![
            program("bba", "BBA-1", Some(4)),
            program("mba", "MBA-1", None),
        ],
        sections: vec![
            section("bba-a", "A", "bba"),
            section("bba-b", "B", "bba"),
            section("mba-a", "A", "mba"),
            section("mba-b", "B", "mba"),
        ],
        subjects: vec![
            subject("acc", 4),
            subject("eco", 4),
            subject("mgmt", 3),
            subject("stats", 3),
            subject("law", 2),
            subject("comm", 2),
        ],
        faculty: vec![
            faculty("f1", "Dr. Mehta"),
            faculty("f2", "Dr. Iyer"),
            faculty("f3", "Prof. Khan"),
            faculty("f4", "Prof. Das"),
            faculty("f5", "Ms. Roy"),
            faculty("f6", "Mr. Sen"),
        ],
        config: Config { total_slots: 7 },
        ..Snapshot::default()
    };

    let plan = [
        ("bba-a", [("acc", "f1"), ("eco", "f2"), ("mgmt", "f3"), ("comm", "f5")]),
        ("bba-b", [("acc", "f1"), ("eco", "f4"), ("law", "f6"), ("comm", "f5")]),
        ("mba-a", [("stats", "f2"), ("mgmt", "f3"), ("law", "f6"), ("acc", "f4")]),
        ("mba-b", [("stats", "f5"), ("eco", "f2"), ("mgmt", "f1"), ("law", "f3")]),
    ];
    for (section_id, subjects) in plan {
        for (subject_id, faculty_id) in subjects {
            snapshot
                .assignments
                .push(assignment(section_id, subject_id, faculty_id));
        }
    }
    snapshot
}
