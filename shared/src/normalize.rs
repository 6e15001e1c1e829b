//! Validated decode of a backend prediction payload into a [`ClassificationSession`].

use crate::error::{ClientError, Result};
use crate::model::{
    Algorithm, ClassificationSession, PerAlgorithm, PerformanceMetrics, PredictionResult,
    SessionId,
};
use crate::wire::{PredictResponse, RawAlgorithmResult, RawPerformance};
use chrono::{DateTime, Utc};

/// Longest input preview kept in a session, in characters.
pub const PREVIEW_LIMIT: usize = 500;
pub const DEFAULT_PREVIEW: &str = "Text input";

/// First `limit` characters of `text`, with `...` appended when it was cut.
pub fn preview_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Builds a session from a prediction payload.
///
/// All three per-algorithm blocks are checked before anything is assembled, so a
/// partial payload never produces a partial session.
pub fn normalize(
    response: &PredictResponse,
    submitted_text: Option<&str>,
    id: SessionId,
    created_at: DateTime<Utc>,
) -> Result<ClassificationSession> {
    let raw_results = response
        .results
        .as_ref()
        .ok_or_else(|| ClientError::MalformedResult("response has no results".into()))?;

    let block = |algorithm: Algorithm| -> Result<PredictionResult> {
        let raw = raw_results.get(algorithm).ok_or_else(|| {
            ClientError::MalformedResult(format!("missing {} result", algorithm.wire_key()))
        })?;
        normalize_result(algorithm, raw)
    };
    let results = PerAlgorithm {
        naive_bayes: block(Algorithm::NaiveBayes)?,
        svm: block(Algorithm::Svm)?,
        random_forest: block(Algorithm::RandomForest)?,
    };

    let preview_source = non_empty(response.text.as_deref())
        .or_else(|| non_empty(response.text_preview.as_deref()))
        .or_else(|| non_empty(submitted_text))
        .unwrap_or(DEFAULT_PREVIEW);

    let input_text_length = response
        .text_length
        .or_else(|| submitted_text.map(|text| text.chars().count() as u64))
        .unwrap_or(0);

    Ok(ClassificationSession {
        id,
        created_at,
        input_text_preview: preview_text(preview_source, PREVIEW_LIMIT),
        input_text_length,
        processed_text_length: response.processed_text_length.unwrap_or(0),
        results,
        performance: normalize_performance(response.performance.as_ref()),
        category_names: response.category_names.clone().unwrap_or_default(),
    })
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.is_empty())
}

fn normalize_result(algorithm: Algorithm, raw: &RawAlgorithmResult) -> Result<PredictionResult> {
    let predicted_category = raw.prediction.clone().ok_or_else(|| {
        ClientError::MalformedResult(format!("{} result lacks a prediction", algorithm.wire_key()))
    })?;
    let confidence = raw.confidence.filter(|c| c.is_finite()).ok_or_else(|| {
        ClientError::MalformedResult(format!("{} result lacks a confidence", algorithm.wire_key()))
    })?;

    let prediction_time_ms = raw
        .prediction_time_ms
        .or_else(|| raw.prediction_time.map(|seconds| seconds * 1000.0));

    Ok(PredictionResult {
        predicted_category,
        confidence,
        probabilities: raw.probabilities.clone().unwrap_or_default(),
        prediction_time_ms: non_negative(prediction_time_ms),
    })
}

fn normalize_performance(raw: Option<&RawPerformance>) -> PerformanceMetrics {
    match raw {
        Some(raw) => PerformanceMetrics {
            preprocessing_time_sec: non_negative(raw.preprocessing_time),
            vectorization_time_sec: non_negative(raw.vectorization_time),
            total_time_sec: non_negative(raw.total_time),
        },
        None => PerformanceMetrics::default(),
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> PredictResponse {
        serde_json::from_str(json).unwrap()
    }

    const FULL: &str = r#"{
        "success": true,
        "results": {
            "naive_bayes": {"prediction": "Sport", "confidence": 0.8,
                "probabilities": {"Sport": 0.8, "Space": 0.2}, "prediction_time_ms": 1.5},
            "svm": {"prediction": "Sport", "confidence": 0.6,
                "probabilities": {"Sport": 0.6, "Space": 0.4}, "prediction_time": 0.002},
            "random_forest": {"prediction": "Space", "confidence": 0.9}
        },
        "performance": {"preprocessing_time": 0.0004, "vectorization_time": 0.01, "total_time": 0.02},
        "category_names": ["Space", "Sport"],
        "text_length": 11,
        "processed_text_length": 2
    }"#;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn normalizes_full_payload() {
        let session = normalize(&payload(FULL), Some("sample text"), SessionId::from(7), now())
            .unwrap();
        assert_eq!(session.id, SessionId::from(7));
        assert_eq!(session.input_text_preview, "sample text");
        assert_eq!(session.input_text_length, 11);
        assert_eq!(session.processed_text_length, 2);
        assert_eq!(session.results.naive_bayes.prediction_time_ms, 1.5);
        assert!((session.results.svm.prediction_time_ms - 2.0).abs() < 1e-9);
        assert_eq!(session.results.random_forest.prediction_time_ms, 0.0);
        assert!(session.results.random_forest.probabilities.is_empty());
        assert_eq!(session.performance.preprocessing_time_sec, 0.0004);
        assert_eq!(session.category_names, vec!["Space", "Sport"]);
    }

    #[test]
    fn missing_block_is_malformed() {
        let response = payload(
            r#"{"results": {"naive_bayes": {"prediction": "A", "confidence": 0.5},
                            "svm": {"prediction": "A", "confidence": 0.5}}}"#,
        );
        let error = normalize(&response, None, SessionId::from(1), now()).unwrap_err();
        assert!(matches!(error, ClientError::MalformedResult(ref m) if m.contains("random_forest")));
    }

    #[test]
    fn missing_confidence_is_malformed() {
        let response = payload(
            r#"{"results": {"naive_bayes": {"prediction": "A", "confidence": 0.5},
                            "svm": {"prediction": "A"},
                            "random_forest": {"prediction": "A", "confidence": 0.5}}}"#,
        );
        let error = normalize(&response, None, SessionId::from(1), now()).unwrap_err();
        assert!(matches!(error, ClientError::MalformedResult(ref m) if m.contains("svm")));
    }

    #[test]
    fn missing_results_is_malformed() {
        let error = normalize(&payload("{}"), None, SessionId::from(1), now()).unwrap_err();
        assert!(matches!(error, ClientError::MalformedResult(_)));
    }

    #[test]
    fn optional_fields_default() {
        let response = payload(
            r#"{"results": {"naive_bayes": {"prediction": "A", "confidence": 0.5},
                            "svm": {"prediction": "A", "confidence": 0.5, "prediction_time_ms": -3},
                            "random_forest": {"prediction": "A", "confidence": 0.5}}}"#,
        );
        let session = normalize(&response, None, SessionId::from(1), now()).unwrap();
        assert_eq!(session.input_text_preview, DEFAULT_PREVIEW);
        assert_eq!(session.input_text_length, 0);
        assert_eq!(session.results.svm.prediction_time_ms, 0.0);
        assert_eq!(session.performance, PerformanceMetrics::default());
        assert!(session.category_names.is_empty());
    }

    #[test]
    fn server_text_wins_over_submitted_text() {
        let response = payload(
            r#"{"text": "from upload", "results": {
                "naive_bayes": {"prediction": "A", "confidence": 0.5},
                "svm": {"prediction": "A", "confidence": 0.5},
                "random_forest": {"prediction": "A", "confidence": 0.5}}}"#,
        );
        let session = normalize(&response, Some("typed"), SessionId::from(1), now()).unwrap();
        assert_eq!(session.input_text_preview, "from upload");
        assert_eq!(session.input_text_length, 5);
    }

    #[test]
    fn empty_text_falls_through_to_text_preview() {
        let response = payload(
            r#"{"text": "", "text_preview": "uploaded body", "results": {
                "naive_bayes": {"prediction": "A", "confidence": 0.5},
                "svm": {"prediction": "A", "confidence": 0.5},
                "random_forest": {"prediction": "A", "confidence": 0.5}}}"#,
        );
        let session = normalize(&response, None, SessionId::from(1), now()).unwrap();
        assert_eq!(session.input_text_preview, "uploaded body");

        let blank = payload(
            r#"{"text": "", "text_preview": "", "results": {
                "naive_bayes": {"prediction": "A", "confidence": 0.5},
                "svm": {"prediction": "A", "confidence": 0.5},
                "random_forest": {"prediction": "A", "confidence": 0.5}}}"#,
        );
        let session = normalize(&blank, Some("typed"), SessionId::from(2), now()).unwrap();
        assert_eq!(session.input_text_preview, "typed");
    }

    #[test]
    fn preview_is_truncated_by_characters() {
        let text = "ă".repeat(501);
        let preview = preview_text(&text, PREVIEW_LIMIT);
        assert_eq!(preview.chars().count(), 503);
        assert!(preview.ends_with("..."));

        let exact = "x".repeat(500);
        assert_eq!(preview_text(&exact, PREVIEW_LIMIT), exact);
    }
}
