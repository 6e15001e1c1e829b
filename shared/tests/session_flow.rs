//! End-to-end flows through the session assembler: response in, bundle and
//! history out.

use shared::error::StorageError;
use shared::{
    AgreementLabel, ClientError, KeyValueStore, MemoryStore, Origin, PredictResponse,
    SessionAssembler, HISTORY_CAPACITY, HISTORY_KEY,
};

fn response(predictions: [(&str, f64, f64); 3]) -> PredictResponse {
    let block = |(category, confidence, time_ms): (&str, f64, f64)| {
        let mut probabilities = serde_json::Map::new();
        probabilities.insert(category.to_string(), serde_json::json!(confidence));
        probabilities.insert("Other".to_string(), serde_json::json!(1.0 - confidence));
        serde_json::json!({
            "prediction": category,
            "confidence": confidence,
            "probabilities": probabilities,
            "prediction_time_ms": time_ms,
        })
    };
    let body = serde_json::json!({
        "success": true,
        "results": {
            "naive_bayes": block(predictions[0]),
            "svm": block(predictions[1]),
            "random_forest": block(predictions[2]),
        },
        "performance": { "preprocessing_time": 0.0005, "vectorization_time": 0.002, "total_time": 0.01 },
        "category_names": ["Other", "Sport"],
        "text_length": 11,
        "processed_text_length": 2,
    });
    serde_json::from_value(body).unwrap()
}

fn sport_response() -> PredictResponse {
    response([("Sport", 0.8, 10.0), ("Sport", 0.6, 20.0), ("Sport", 0.9, 40.0)])
}

#[test]
fn submit_records_session_and_builds_bundle() {
    let mut assembler = SessionAssembler::open(MemoryStore::new());

    let bundle = assembler.submit(&sport_response(), Some("sample text")).unwrap();

    assert_eq!(bundle.agreement, AgreementLabel::FullAgreement);
    assert_eq!(assembler.history().len(), 1);
    assert_eq!(assembler.history().list()[0].id, bundle.session.id);
    assert_eq!(bundle.session.input_text_preview, "sample text");
    assert!(!bundle.replayed);

    assert_eq!(bundle.timing_series.to_array(), [10.0, 20.0, 40.0]);
    assert_eq!(bundle.radar.naive_bayes.speed, 75.0);
    assert_eq!(bundle.radar.random_forest.speed, 0.0);
    assert_eq!(bundle.top_probabilities.svm[0].category, "Sport");
    assert_eq!(bundle.probability_ceiling[0].category, "Sport");
    assert!((bundle.probability_ceiling[0].probability - 0.9).abs() < 1e-12);
}

#[test]
fn replay_does_not_touch_history() {
    let mut assembler = SessionAssembler::open(MemoryStore::new());
    let first = assembler.submit(&sport_response(), Some("first")).unwrap();
    assembler
        .submit(
            &response([("Sport", 0.8, 1.0), ("Space", 0.6, 1.0), ("Autos", 0.9, 1.0)]),
            Some("second"),
        )
        .unwrap();

    let replayed = assembler.replay(first.session.id).unwrap();

    assert!(replayed.replayed);
    assert_eq!(replayed.session, first.session);
    assert_eq!(assembler.history().len(), 2);
    assert_eq!(
        assembler.history_rows()[0].agreement,
        AgreementLabel::Disagreement
    );
}

#[test]
fn presenting_a_replay_never_appends() {
    let mut assembler = SessionAssembler::open(MemoryStore::new());
    let bundle = assembler.submit(&sport_response(), None).unwrap();
    let before = assembler.history().len();

    assembler.present(bundle.session, Origin::Replay).unwrap();

    assert_eq!(assembler.history().len(), before);
}

#[test]
fn malformed_response_leaves_history_untouched() {
    let mut assembler = SessionAssembler::open(MemoryStore::new());
    let mut broken = sport_response();
    if let Some(results) = broken.results.as_mut() {
        results.svm = None;
    }

    let error = assembler.submit(&broken, Some("x")).unwrap_err();

    assert!(matches!(error, ClientError::MalformedResult(_)));
    assert!(assembler.history().is_empty());
}

#[test]
fn rapid_submissions_get_distinct_ids_and_stay_bounded() {
    let mut assembler = SessionAssembler::open(MemoryStore::new());
    for _ in 0..(HISTORY_CAPACITY + 5) {
        assembler.submit(&sport_response(), None).unwrap();
        assert!(assembler.history().len() <= HISTORY_CAPACITY);
    }

    let ids: Vec<_> = assembler.history().list().iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), HISTORY_CAPACITY);
    assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
}

#[test]
fn history_survives_reopen() {
    let mut assembler = SessionAssembler::open(MemoryStore::new());
    let bundle = assembler.submit(&sport_response(), Some("persist me")).unwrap();

    let backend = assembler.dispose();
    let raw = backend.get(HISTORY_KEY).unwrap().unwrap();
    assert!(raw.starts_with('['));

    let reopened = SessionAssembler::open(backend);
    let restored = reopened.replay(bundle.session.id).unwrap();
    assert_eq!(restored.session.input_text_preview, "persist me");
}

struct FullDisk;

impl KeyValueStore for FullDisk {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Read("unavailable".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("no space left".into()))
    }

    fn delete(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("no space left".into()))
    }
}

#[test]
fn storage_failure_does_not_block_display() {
    let mut assembler = SessionAssembler::open(FullDisk);

    let bundle = assembler.submit(&sport_response(), Some("sample text")).unwrap();

    assert_eq!(bundle.agreement, AgreementLabel::FullAgreement);
    assert_eq!(assembler.history().len(), 1);
    assert!(!assembler.history().is_persistent());
}

/// Reads fail, writes land.
#[derive(Default)]
struct LockedRecord {
    written: Option<String>,
}

impl KeyValueStore for LockedRecord {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Read("permission denied".into()))
    }

    fn set(&mut self, _key: &str, value: &str) -> Result<(), StorageError> {
        self.written = Some(value.to_string());
        Ok(())
    }

    fn delete(&mut self, _key: &str) -> Result<(), StorageError> {
        self.written = None;
        Ok(())
    }
}

#[test]
fn unreadable_history_is_not_replaced_by_new_sessions() {
    let mut assembler = SessionAssembler::open(LockedRecord::default());
    assert!(!assembler.history().is_persistent());

    assembler.submit(&sport_response(), Some("sample text")).unwrap();
    assert_eq!(assembler.history().len(), 1);

    assert!(assembler.dispose().written.is_none());
}
