use std::time::Duration;

use agrod_core::hints::HintKey;
use agrod_core::model::{Hotspot, MaturityLevel, MATURITY_TAG};
use agrod_core::simulation::{Cell, SprayOutcome, CONGRATULATION_DELAY};
use agrod_core::{CropType, DetectionResult, FieldData, Level, Session, SimKey, UploadedImage};

fn at(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn photo() -> UploadedImage {
    UploadedImage::from_bytes("field.png", "image/png", b"\x89PNG")
}

fn disease_result(spots: &[(i32, i32)]) -> DetectionResult {
    serde_json::from_value(serde_json::json!({
        "diseases": ["cotton_boll_rot"],
        "disease_info": [{
            "name": "Boll Rot",
            "description": "Fungal rot of developing bolls.",
            "confidence": 64.0,
            "recommended_pesticides": [
                {"name": "Neem Oil", "description": "Botanical."}
            ]
        }],
        "field_data": {
            "grid": [],
            "hotspots": spots.iter().map(|(x, y)| serde_json::json!({"x": x, "y": y})).collect::<Vec<_>>(),
            "is_maturity_analysis": false
        },
        "multiple_detections": false
    }))
    .unwrap_or_else(|error| panic!("fixture should parse: {error}"))
}

fn running_session(result: DetectionResult) -> Session {
    let mut session = Session::with_simulation(CropType::Cotton, 5);
    session.upload_image(photo());
    assert!(session.begin_analysis(at(0)).is_some());
    session.finish_analysis::<String>(Ok(result), at(0));
    assert!(session.set_simulation(true));
    session
}

fn drone(session: &Session) -> Option<Cell> {
    session.field().map(agrod_core::FieldSimulation::drone)
}

#[test]
fn drone_stays_put_at_the_corner() {
    let mut session = running_session(disease_result(&[]));
    for _ in 0..5 {
        session.handle_key(SimKey::Left, at(0));
        session.handle_key(SimKey::Up, at(0));
    }
    assert_eq!(drone(&session), Some(Cell { x: 0, y: 0 }));

    assert!(!session.move_drone(-1, 0));
    assert!(!session.move_drone(0, -1));
    assert_eq!(drone(&session), Some(Cell { x: 0, y: 0 }));
}

#[test]
fn missing_the_hotspot_changes_nothing() {
    let mut session = running_session(disease_result(&[(2, 7)]));
    session.cycle_tool(1);

    let outcome = session.spray(at(100));
    assert_eq!(
        outcome,
        SprayOutcome::Nothing {
            maturity_analysis: false
        }
    );
    assert_eq!(session.field().map(|field| field.hotspots().len()), Some(1));
    assert!(!session.progress().sprayed_pesticide);
    assert_eq!(
        session.notices().active()[0].message,
        "No disease detected at this location. Move to a yellow spot to spray effectively."
    );
}

#[test]
fn clearing_the_field_congratulates_after_a_second() {
    let mut session = running_session(disease_result(&[(5, 5)]));
    session.cycle_tool(1);

    session.handle_key(SimKey::Space, at(2_000));
    assert_eq!(session.field().map(|field| field.hotspots().len()), Some(0));
    assert_eq!(
        session.notices().active()[0].message,
        "Successfully sprayed Neem Oil on diseased area!"
    );

    session.tick(at(2_500));
    assert_eq!(session.notices().active().len(), 1);

    session.tick(at(2_000) + CONGRATULATION_DELAY);
    let newest = &session.notices().active()[0];
    assert_eq!(newest.level, Level::Success);
    assert!(newest.message.starts_with("Great job!"));
}

#[test]
fn inspecting_a_ripe_tree_keeps_it() {
    let result = DetectionResult {
        diseases: vec![MATURITY_TAG.to_string()],
        disease_info: Vec::new(),
        field_data: Some(FieldData {
            grid: serde_json::Value::Null,
            hotspots: vec![
                Hotspot::tree(5, 5, MaturityLevel::ReadyForHarvest),
                Hotspot::tree(3, 8, MaturityLevel::Immature),
            ],
            is_maturity_analysis: true,
        }),
        multiple_detections: true,
        detection_confidence: None,
    };
    let mut session = running_session(result);
    session.cycle_tool(1);
    assert_eq!(session.selector().selected_value(), Some("visual_scanner"));

    session.spray(at(0));
    assert_eq!(session.field().map(|field| field.hotspots().len()), Some(2));
    assert_eq!(
        session.notices().active()[0].message,
        "This coconut tree is ready for harvest! Coconuts can be collected now."
    );
    assert!(!session.progress().sprayed_pesticide);
}

#[test]
fn new_upload_clears_everything_from_any_state() {
    let mut session = running_session(disease_result(&[(5, 5)]));
    session.cycle_tool(1);
    session.spray(at(0));

    session.upload_image(photo());
    assert!(session.diagnosis().is_none());
    assert!(!session.toggle().enabled);
    assert!(!session.toggle().checked);
    assert!(session.field().is_some_and(|field| !field.is_active()));

    let mut fresh = Session::with_simulation(CropType::Coconut, 5);
    fresh.upload_image(photo());
    assert!(fresh.diagnosis().is_none());
    assert!(!fresh.toggle().enabled);
}

#[test]
fn analysis_without_image_never_builds_a_request() {
    let mut session = Session::with_simulation(CropType::Cotton, 5);
    assert!(session.begin_analysis(at(0)).is_none());
    assert_eq!(session.notices().active().len(), 1);
    assert_eq!(session.notices().active()[0].level, Level::Warning);

    // upload hint is fixed no matter how often it is asked for
    for step in 1..=5 {
        assert_eq!(session.request_hint(at(step)), HintKey::Upload.text());
    }
}

#[test]
fn notices_expire_while_the_session_ticks() {
    let mut session = Session::with_simulation(CropType::Cotton, 5);
    session.begin_analysis(at(0));
    session.tick(at(4_999));
    assert!(!session.notices().is_empty());
    session.tick(at(5_000));
    assert!(session.notices().is_empty());
}
