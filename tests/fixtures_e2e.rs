use std::collections::HashSet;
use std::io::Write;

use vitalsim::{
    ActionId, ConfigurationError, FixtureSet, InsightEngine, PersonaId, ProtocolSimulator,
    ViewState, VitalsError,
};

const DEMO: &str = r#"{
    "personas": [
        {"id": "sarah", "name": "Sarah Chen", "focus": "Metabolic health"},
        {"id": "marcus", "name": "Marcus Webb"}
    ],
    "insights": [
        {"id": "s-1", "personaId": "sarah", "category": "metabolic", "title": "Late meals raise fasting glucose",
         "certainty": 0.89, "evidence": {"personalWeight": 0.71}, "dataSources": ["cgm", "food_log"],
         "causeType": "behavior",
         "causalParams": {"theta": 19.5, "effectBelow": -0.8, "effectAbove": 4.2,
                          "currentValue": 21.0, "status": "above_optimal"}},
        {"id": "s-2", "personaId": "sarah", "category": "sleep", "title": "Cool rooms deepen sleep",
         "certainty": 0.93, "evidence": {"personalWeight": 0.44}, "dataSources": ["oura"],
         "generatedAt": "2024-03-01T08:00:00Z"},
        {"id": "s-3", "personaId": "sarah", "category": "metabolic", "title": "Walks flatten spikes",
         "certainty": 0.58, "evidence": {"personalWeight": 0.2}, "dataSources": ["cgm"],
         "holdoutPreview": true},
        {"id": "m-1", "personaId": "marcus", "category": "cardio", "title": "Zone 2 lowers RHR",
         "certainty": 0.77, "evidence": {"personalWeight": 0.9}, "dataSources": ["garmin"]}
    ],
    "protocols": [
        {"id": "sarah-metabolic", "personaId": "sarah", "name": "Metabolic reset", "outcome": "Glucose score",
         "baseline": {"value": 60},
         "actions": [
            {"id": "a1", "label": "Post-meal walk", "category": "activity", "impact": 8, "isActive": true,
             "schedule": {"timeOfDay": "19:30:00", "frequency": "daily", "durationMinutes": 15}},
            {"id": "a2", "label": "Late snack", "category": "nutrition", "impact": -3},
            {"id": "a3", "label": "Fiber first", "category": "nutrition", "impact": 5}
         ],
         "states": [
            {"id": "poor_sleep", "label": "Poor sleep last night", "isActive": true},
            {"id": "high_stress", "label": "High stress", "isActive": false}
         ],
         "triggers": [
            {"if": ["poor_sleep"], "then": ["a1"]},
            {"if": ["poor_sleep", "high_stress"], "then": ["a3"]},
            {"if": ["jet_lag"], "then": ["a2"]}
         ]}
    ]
}"#;

#[test]
fn demo_fixture_round_trip_through_engines() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DEMO.as_bytes()).unwrap();

    let set = FixtureSet::from_path(file.path()).unwrap();
    assert_eq!(set.personas.len(), 2);
    assert_eq!(set.insights.len(), 4);
    assert_eq!(
        set.persona("sarah").unwrap().focus.as_deref(),
        Some("Metabolic health")
    );

    let engine = InsightEngine::standard();
    let view = ViewState::new("sarah", 60).unwrap();
    let ranked = engine.for_view(&set.insights, &view).unwrap();
    let got: Vec<&str> = ranked.iter().map(|r| r.insight.id.as_str()).collect();
    assert_eq!(got, vec!["s-2", "s-1"]);
    assert_eq!(ranked[1].display.cause_type_label.as_deref(), Some("Behavior"));
    assert_eq!(ranked[1].display.category_label, "Metabolic");

    let params = ranked[1].insight.causal_params.unwrap();
    assert!((params.effect_at_current() - 4.2).abs() < f64::EPSILON);

    let protocol = set.protocol("sarah-metabolic").unwrap();
    assert_eq!(protocol.dangling_references().len(), 1);

    let sim = ProtocolSimulator::new(protocol);
    let recommended: Vec<&str> = sim
        .recommended_actions()
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(recommended, vec!["a1"]);

    let view = view.with_toggle("a3", true);
    let result = sim.simulate_view(&view);
    assert!((result.predicted_value - 73.0).abs() < 1e-12);
    assert!((result.percent_of_max - 130.0).abs() < 1e-9);

    let completed: HashSet<ActionId> = [ActionId::new("a1")].into_iter().collect();
    assert!((sim.adherence(&completed) - 100.0 / 3.0).abs() < 1e-9);

    let sarah = PersonaId::new("sarah");
    assert_eq!(set.protocols_for(&sarah).count(), 1);
    assert_eq!(set.insights_for(&sarah).count(), 3);
}

#[test]
fn from_reader_matches_from_str() {
    let a = FixtureSet::from_json_str(DEMO).unwrap();
    let b = FixtureSet::from_reader(DEMO.as_bytes()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn missing_file_is_fixture_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FixtureSet::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(err.is_fixture());
}

#[test]
fn unknown_category_in_fixture_propagates() {
    let json = DEMO.replace("\"cardio\"", "\"longevity\"");
    let err = FixtureSet::from_json_str(&json).unwrap_err();
    match err {
        VitalsError::Configuration(ConfigurationError::UnknownCategory { value }) => {
            assert_eq!(value, "longevity");
        }
        other => panic!("expected unknown category, got {other:?}"),
    }
}

#[test]
fn duplicate_action_in_fixture_is_rejected() {
    let json = DEMO.replace("{\"id\": \"a3\"", "{\"id\": \"a2\"");
    assert!(FixtureSet::from_json_str(&json).unwrap_err().is_validation());
}
