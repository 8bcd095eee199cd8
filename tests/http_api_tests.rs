mod common;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use common::institute;
use serde_json::{Value, json};
use timetable_engine::server::{
    self, AbsenceResponse, GenerateResponse, ResizeResponse, ToggleLockResponse,
};
use tower::util::ServiceExt;

async fn post(uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = server::router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let response = server::router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_returns_entries_and_conflicts() {
    let (status, body) = post("/v1/timetable/generate", serde_json::to_value(institute()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    let generated: GenerateResponse = serde_json::from_value(body).unwrap();
    assert!(!generated.entries.is_empty());
    assert!(generated.conflicts.hard.iter().all(|m| !m.contains("CLASH")));
}

#[tokio::test]
async fn check_reports_clash() {
    let snapshot = institute();
    let entries = json!([
        {"id": "1", "sectionId": "mba-a", "day": "Monday", "slotIndex": 0, "facultyId": "f2", "isLocked": true},
        {"id": "2", "sectionId": "mba-b", "day": "Monday", "slotIndex": 0, "facultyId": "f2", "isLocked": true}
    ]);
    let (status, body) = post(
        "/v1/timetable/check",
        json!({ "entries": entries, "snapshot": snapshot, "date": "2026-10-19" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["hard"],
        json!(["Dr. Iyer CLASH on Monday P1 in: MBA-1-A, MBA-1-B"])
    );
    assert_eq!(body["warnings"], json!([]));
}

#[tokio::test]
async fn clone_derives_weekday_from_date() {
    let mut snapshot = institute();
    snapshot.master_timetable = timetable_engine::solver::generate(&snapshot);

    // 2026-10-16 is a Friday
    let (status, body) = post(
        "/v1/daily/clone",
        json!({ "date": "2026-10-16", "snapshot": snapshot }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| e["day"] == "Friday"));
    assert!(entries
        .iter()
        .all(|e| e["id"].as_str().unwrap().starts_with("daily-2026-10-16-")));
}

#[tokio::test]
async fn clone_rejects_bad_date() {
    let (status, body) = post(
        "/v1/daily/clone",
        json!({ "date": "next friday", "snapshot": institute() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn substitutes_are_ranked() {
    let payload = json!({
        "target": { "date": "2026-10-19", "sectionId": "bba-a", "slotIndex": 1 },
        "availability": [
            { "facultyId": "f1", "date": "2026-10-19", "status": "Absent" }
        ],
        "dailySchedule": [
            { "id": "d1", "sectionId": "mba-a", "day": "Monday", "slotIndex": 1, "facultyId": "f2" }
        ],
        "snapshot": institute(),
    });
    let (status, body) = post("/v1/daily/substitutes", payload).await;
    assert_eq!(status, StatusCode::OK);

    let ranked = body.as_array().unwrap();
    assert_eq!(ranked.len(), 6);
    // f3 and f5 teach bba-a and are free
    assert_eq!(ranked[0]["facultyId"], "f3");
    assert_eq!(ranked[0]["rank"], 150);
    assert_eq!(ranked[1]["facultyId"], "f5");
    assert_eq!(ranked[4]["busyReason"]["kind"], "absent");
    assert_eq!(ranked[5]["busyReason"]["section"], "MBA-1-A");
}

#[tokio::test]
async fn workload_lists_every_faculty() {
    let mut snapshot = institute();
    let entries = timetable_engine::solver::generate(&snapshot);
    snapshot.master_timetable.clear();

    let (status, body) = post(
        "/v1/faculty/workload",
        json!({ "entries": entries, "snapshot": snapshot }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn absence_clears_whole_day_or_one_period() {
    let daily = json!([
        {"id": "d1", "sectionId": "bba-a", "day": "Monday", "slotIndex": 0, "facultyId": "f1"},
        {"id": "d2", "sectionId": "bba-b", "day": "Monday", "slotIndex": 1, "facultyId": "f1"},
        {"id": "d3", "sectionId": "mba-a", "day": "Monday", "slotIndex": 1, "facultyId": "f2"}
    ]);

    let (status, body) = post(
        "/v1/daily/absence",
        json!({ "daily": daily.clone(), "facultyId": "f1", "slotIndex": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let partial: AbsenceResponse = serde_json::from_value(body).unwrap();
    assert_eq!(partial.removed, 1);
    let ids: Vec<_> = partial.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["d1", "d3"]);

    let (_, body) = post("/v1/daily/absence", json!({ "daily": daily, "facultyId": "f1" })).await;
    let full: AbsenceResponse = serde_json::from_value(body).unwrap();
    assert_eq!(full.removed, 2);
    assert_eq!(full.entries.len(), 1);
}

#[tokio::test]
async fn daily_placement_records_substitute() {
    let payload = json!({
        "daily": [
            {"id": "d1", "sectionId": "bba-a", "day": "Monday", "slotIndex": 1, "facultyId": "f1"}
        ],
        "date": "2026-10-19",
        "placement": {
            "id": "sub-1", "sectionId": "bba-a", "slotIndex": 1,
            "entryType": "substitution", "facultyId": "f3"
        },
        "snapshot": institute(),
    });
    let (status, body) = post("/v1/daily/place", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "sub-1");
    assert_eq!(body[0]["day"], "Monday");
    assert_eq!(body[0]["facultyId"], "f3");
    assert_eq!(body[0]["originalFacultyId"], "f1");
}

#[tokio::test]
async fn master_maintenance_edits_entries() {
    let entries = json!([
        {"id": "m1", "sectionId": "mba-a", "day": "Monday", "slotIndex": 0, "facultyId": "f2"},
        {"id": "m2", "sectionId": "mba-a", "day": "Monday", "slotIndex": 6, "facultyId": "f2"}
    ]);

    let (_, body) = post("/v1/master/resize", json!({ "entries": entries, "totalSlots": 5 })).await;
    let resized: ResizeResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resized.total_slots, 5);
    assert_eq!(resized.entries.len(), 1);

    let (_, body) = post(
        "/v1/master/place",
        json!({
            "entries": resized.entries,
            "entry": {"id": "manual", "sectionId": "mba-a", "day": "Monday", "slotIndex": 0, "facultyId": "f6"}
        }),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "manual");
    assert_eq!(body[0]["isLocked"], true);

    let (status, toggled) = post("/v1/master/toggle-lock", json!({ "entries": body, "id": "manual" })).await;
    assert_eq!(status, StatusCode::OK);
    let toggled: ToggleLockResponse = serde_json::from_value(toggled).unwrap();
    assert!(!toggled.is_locked);

    let (status, body) = post(
        "/v1/master/remove",
        json!({ "entries": toggled.entries, "id": "manual" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn unknown_entry_id_is_not_found() {
    let (status, body) = post("/v1/master/remove", json!({ "entries": [], "id": "nope" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = post("/v1/master/toggle-lock", json!({ "entries": [], "id": "nope" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
