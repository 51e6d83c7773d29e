use serde_json::Value;

use super::common::*;
use crate::coaching::domain::{AssessmentId, AthleteId};
use crate::coaching::repository::{
    CoachingRepository, KeyValueRepository, RepositoryError, ResetSummary, ASSESSMENTS_KEY,
    ATHLETES_KEY, COMPETITIONS_KEY,
};
use crate::coaching::store::{FileStore, KeyValueStore, MemoryStore};

#[test]
fn save_athlete_inserts_then_replaces() {
    let repository = memory_repository();
    repository
        .save_athlete(athlete("a-1", "Ana"))
        .expect("insert");
    repository
        .save_athlete(athlete("a-1", "Ana Lopez"))
        .expect("replace");

    let athletes = repository.list_athletes().expect("list");
    assert_eq!(athletes.len(), 1);
    assert_eq!(athletes[0].name, "Ana Lopez");
}

#[test]
fn assessments_for_athlete_are_returned_oldest_first() {
    let repository = memory_repository();
    repository
        .save_assessment(stored_assessment("s-3", "a-1", date(3, 1), uniform(3)))
        .expect("save");
    repository
        .save_assessment(stored_assessment("s-1", "a-1", date(1, 1), uniform(2)))
        .expect("save");
    repository
        .save_assessment(stored_assessment("s-x", "a-2", date(2, 1), uniform(5)))
        .expect("save");

    let ids: Vec<String> = repository
        .get_assessments_for_athlete(&AthleteId("a-1".to_string()))
        .expect("query")
        .into_iter()
        .map(|assessment| assessment.id.0)
        .collect();
    assert_eq!(ids, vec!["s-1".to_string(), "s-3".to_string()]);
}

#[test]
fn delete_assessment_reports_not_found() {
    let repository = memory_repository();
    match repository.delete_assessment(&AssessmentId("missing".to_string())) {
        Err(RepositoryError::NotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn stored_records_keep_camel_case_field_names() {
    let store = MemoryStore::new();
    let repository = KeyValueRepository::new(store.clone());
    repository
        .save_assessment(stored_assessment(
            "s-1",
            "a-1",
            date(2, 14),
            metrics([5, 4, 3, 4, 5, 3]),
        ))
        .expect("save");

    let raw = store.get(ASSESSMENTS_KEY).expect("get").expect("present");
    let json: Value = serde_json::from_str(&raw).expect("valid json");
    let record = &json[0];
    assert_eq!(record["athleteId"], "a-1");
    assert_eq!(record["date"], "2025-02-14");
    assert_eq!(record["performanceMetrics"]["technicalSkills"], 5);
    assert_eq!(record["performanceMetrics"]["coachability"], 3);
    assert_eq!(record["progress"]["history"][0]["overallScore"], 24);
    assert_eq!(record["progress"]["history"][0]["keyFocus"], "");
    assert_eq!(record["progress"]["trend"], "insufficientData");
    assert!(record["developmentPlan"]["areasForImprovement"].is_array());
}

#[test]
fn loads_records_written_by_the_browser_client() {
    let store = MemoryStore::new();
    store
        .set(
            ASSESSMENTS_KEY,
            r#"[{
                "id": "k3j2h1",
                "athleteId": "p9q8r7",
                "date": "2024-11-02",
                "performanceMetrics": {
                    "technicalSkills": 4, "tacticalAwareness": 3, "physicalFitness": 4,
                    "mentalFortitude": 3, "teamwork": 5, "coachability": 5
                },
                "developmentPlan": {
                    "strengths": ["Vision"], "areasForImprovement": ["Left foot"],
                    "shortTermGoals": [], "mediumTermGoals": [], "longTermGoals": [],
                    "recommendedDrills": []
                },
                "progress": {
                    "history": [{"date": "2024-11-02", "overallScore": 24, "keyFocus": "Left foot"}],
                    "trend": "improving",
                    "notes": ""
                },
                "technicalSkills": [],
                "competitions": [{"id": "c1", "opponent": "Eastern Suburbs", "result": "W 2-0"}]
            }]"#
            .to_string(),
        )
        .expect("seed");

    let repository = KeyValueRepository::new(store.clone());
    let assessments = repository.list_assessments().expect("loads");
    assert_eq!(assessments.len(), 1);
    assert_eq!(assessments[0].progress_entry().overall_score.value(), 24);
    assert_eq!(assessments[0].development_plan.key_focus(), "Left foot");
    assert_eq!(assessments[0].competitions.len(), 1);

    repository
        .save_assessment(assessments[0].clone())
        .expect("write back");
    let raw = store.get(ASSESSMENTS_KEY).expect("get").expect("present");
    let json: Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(json[0]["competitions"][0]["opponent"], "Eastern Suburbs");
    assert_eq!(json[0]["competitions"][0]["result"], "W 2-0");
}

#[test]
fn out_of_range_stored_rating_is_reported_as_corrupt() {
    let store = MemoryStore::new();
    let mut record = serde_json::to_value(stored_assessment("s-1", "a-1", date(1, 5), uniform(3)))
        .expect("encode");
    record["performanceMetrics"]["teamwork"] = Value::from(6);
    store
        .set(ASSESSMENTS_KEY, Value::Array(vec![record]).to_string())
        .expect("seed");

    let repository = KeyValueRepository::new(store);
    match repository.list_assessments() {
        Err(RepositoryError::Corrupt { key, .. }) => assert_eq!(key, ASSESSMENTS_KEY),
        other => panic!("expected corrupt collection, got {other:?}"),
    }
}

#[test]
fn cascade_delete_survives_reopening_a_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let repository = KeyValueRepository::new(FileStore::open(dir.path()).expect("open"));
        repository.save_athlete(athlete("a-1", "Ana")).expect("save");
        repository.save_athlete(athlete("a-2", "Bea")).expect("save");
        repository
            .save_assessment(stored_assessment("s-1", "a-1", date(1, 1), uniform(3)))
            .expect("save");
        repository
            .save_assessment(stored_assessment("s-2", "a-2", date(1, 2), uniform(4)))
            .expect("save");

        let summary = repository
            .delete_athlete(&AthleteId("a-1".to_string()))
            .expect("delete");
        assert_eq!(summary.assessments_removed, 1);
    }

    let reopened = KeyValueRepository::new(FileStore::open(dir.path()).expect("reopen"));
    let athletes = reopened.list_athletes().expect("list");
    assert_eq!(athletes.len(), 1);
    assert_eq!(athletes[0].id.0, "a-2");
    let assessments = reopened.list_assessments().expect("list");
    assert_eq!(assessments.len(), 1);
    assert_eq!(assessments[0].id.0, "s-2");
    assert!(reopened
        .store()
        .get(ATHLETES_KEY)
        .expect("get")
        .is_some());
}

#[test]
fn clear_all_empties_every_collection_in_one_write() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository = KeyValueRepository::new(FileStore::open(dir.path()).expect("open"));
    repository.save_athlete(athlete("a-1", "Ana")).expect("save");
    repository.save_athlete(athlete("a-2", "Bea")).expect("save");
    repository
        .save_assessment(stored_assessment("s-1", "a-1", date(1, 1), uniform(3)))
        .expect("save");

    let summary = repository.clear_all().expect("clear");
    assert_eq!(
        summary,
        ResetSummary {
            athletes_removed: 2,
            assessments_removed: 1,
            competitions_removed: 0,
        }
    );

    let reopened = KeyValueRepository::new(FileStore::open(dir.path()).expect("reopen"));
    assert!(reopened.list_athletes().expect("list").is_empty());
    assert!(reopened.list_assessments().expect("list").is_empty());
    assert!(reopened.list_competitions().expect("list").is_empty());
    for key in [ATHLETES_KEY, ASSESSMENTS_KEY, COMPETITIONS_KEY] {
        assert_eq!(reopened.store().get(key).expect("get").as_deref(), Some("[]"));
    }
}

#[test]
fn clear_all_recovers_from_a_malformed_collection() {
    let store = MemoryStore::new();
    store
        .set(ASSESSMENTS_KEY, "{not json".to_string())
        .expect("seed");
    let repository = KeyValueRepository::new(store);
    assert!(repository.list_assessments().is_err());

    let summary = repository.clear_all().expect("clear");
    assert_eq!(summary.assessments_removed, 0);
    assert!(repository.list_assessments().expect("list").is_empty());
}
