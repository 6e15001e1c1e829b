use crate::model::{Algorithm, ProbabilityMap};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const PREDICT_PATH: &str = "/api/predict";
pub const UPLOAD_PATH: &str = "/api/upload";
pub const TRAINING_INFO_PATH: &str = "/api/training-info";

/// Multipart field name the upload endpoint reads the file from.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PredictRequest {
    pub text: String,
}

/// Body of `/api/predict` and `/api/upload` responses.
///
/// Every field is optional here; [`crate::normalize`] decides which ones are
/// required and fails with a malformed-result error otherwise.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub results: Option<RawResults>,
    #[serde(default)]
    pub performance: Option<RawPerformance>,
    #[serde(default)]
    pub category_names: Option<Vec<String>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub text_preview: Option<String>,
    #[serde(default)]
    pub text_length: Option<u64>,
    #[serde(default)]
    pub processed_text_length: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RawResults {
    #[serde(default)]
    pub naive_bayes: Option<RawAlgorithmResult>,
    #[serde(default)]
    pub svm: Option<RawAlgorithmResult>,
    #[serde(default)]
    pub random_forest: Option<RawAlgorithmResult>,
}

impl RawResults {
    pub fn get(&self, algorithm: Algorithm) -> Option<&RawAlgorithmResult> {
        match algorithm {
            Algorithm::NaiveBayes => self.naive_bayes.as_ref(),
            Algorithm::Svm => self.svm.as_ref(),
            Algorithm::RandomForest => self.random_forest.as_ref(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RawAlgorithmResult {
    #[serde(default, alias = "predicted_category", alias = "predictedCategory")]
    pub prediction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub probabilities: Option<ProbabilityMap>,
    #[serde(default)]
    pub prediction_time_ms: Option<f64>,
    /// Seconds; used when `prediction_time_ms` is absent.
    #[serde(default)]
    pub prediction_time: Option<f64>,
    #[serde(default)]
    pub prediction_original: Option<String>,
    #[serde(default)]
    pub prediction_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RawPerformance {
    #[serde(default)]
    pub preprocessing_time: Option<f64>,
    #[serde(default)]
    pub vectorization_time: Option<f64>,
    #[serde(default)]
    pub total_time: Option<f64>,
}

/// Body returned with any non-success status.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// Banner text for a non-success response: the backend's own `error` text
/// when it sent one.
pub fn server_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) => error,
        Err(_) => format!("Server error: {} - {}", status, body),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainingInfo {
    #[serde(default)]
    pub training_date: Option<String>,
    pub dataset: DatasetInfo,
    pub preprocessing: PreprocessingInfo,
    pub algorithms: TrainedAlgorithms,
    pub summary: TrainingSummary,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatasetInfo {
    pub name: String,
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub train_documents: u64,
    #[serde(default)]
    pub test_documents: u64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub categories_formatted: Vec<String>,
    #[serde(default)]
    pub num_categories: u64,
    #[serde(default)]
    pub features: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PreprocessingInfo {
    pub vectorizer_type: String,
    #[serde(default)]
    pub max_features: u64,
    #[serde(default)]
    pub ngram_range: String,
    #[serde(default)]
    pub use_stemming: bool,
    #[serde(default)]
    pub use_stopwords: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainedAlgorithms {
    pub naive_bayes: AlgorithmTraining,
    pub svm: AlgorithmTraining,
    pub random_forest: AlgorithmTraining,
}

impl TrainedAlgorithms {
    pub fn get(&self, algorithm: Algorithm) -> &AlgorithmTraining {
        match algorithm {
            Algorithm::NaiveBayes => &self.naive_bayes,
            Algorithm::Svm => &self.svm,
            Algorithm::RandomForest => &self.random_forest,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AlgorithmTraining {
    pub name: String,
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub training_time: f64,
    #[serde(default)]
    pub training_time_formatted: String,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub test_accuracy: Option<f64>,
}

impl AlgorithmTraining {
    /// `key: value` pairs sorted by key, `null` rendered as `None`.
    pub fn parameter_summary(&self) -> String {
        let mut pairs: Vec<(&String, &serde_json::Value)> = self.parameters.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::Null => format!("{}: None", key),
                serde_json::Value::String(s) => format!("{}: {}", key, s),
                other => format!("{}: {}", key, other),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainingSummary {
    pub best_accuracy_algorithm: String,
    pub fastest_training_algorithm: String,
}

impl TrainingInfo {
    pub fn best_accuracy(&self) -> Option<(Algorithm, &AlgorithmTraining)> {
        self.resolve(&self.summary.best_accuracy_algorithm)
    }

    pub fn fastest_training(&self) -> Option<(Algorithm, &AlgorithmTraining)> {
        self.resolve(&self.summary.fastest_training_algorithm)
    }

    fn resolve(&self, key: &str) -> Option<(Algorithm, &AlgorithmTraining)> {
        let algorithm = key.parse::<Algorithm>().ok()?;
        Some((algorithm, self.algorithms.get(algorithm)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_text_is_used_verbatim() {
        assert_eq!(
            server_error_message(400, r#"{"error": "Textul este gol"}"#),
            "Textul este gol"
        );
    }

    #[test]
    fn unstructured_errors_include_status() {
        assert_eq!(
            server_error_message(502, "Bad Gateway"),
            "Server error: 502 - Bad Gateway"
        );
    }

    const TRAINING_INFO: &str = r#"{
        "training_date": "2025-01-10T12:00:00",
        "dataset": {
            "name": "20 Newsgroups (Selected Categories)",
            "total_documents": 5000,
            "train_documents": 4000,
            "test_documents": 1000,
            "categories": ["rec.sport.hockey", "sci.space"],
            "categories_formatted": ["Sport Hockey", "Space"],
            "num_categories": 2,
            "features": 10000
        },
        "preprocessing": {
            "vectorizer_type": "TF-IDF",
            "max_features": 10000,
            "ngram_range": "(1, 2)",
            "use_stemming": true,
            "use_stopwords": true
        },
        "algorithms": {
            "naive_bayes": {"name": "Naive Bayes (MultinomialNB)", "parameters": {"alpha": 1.0},
                "training_time": 0.05, "training_time_formatted": "0.050000s", "accuracy": 0.91},
            "svm": {"name": "Support Vector Machine (SVM)", "parameters": {"kernel": "linear", "C": 1.0},
                "training_time": 1.2, "training_time_formatted": "1.200000s", "accuracy": 0.93},
            "random_forest": {"name": "Random Forest", "parameters": {"n_estimators": 100, "max_depth": null},
                "training_time": 8.4, "training_time_formatted": "8.400000s", "accuracy": 0.88}
        },
        "summary": {"best_accuracy_algorithm": "svm", "fastest_training_algorithm": "naive_bayes"}
    }"#;

    #[test]
    fn training_info_summary_resolves_algorithms() {
        let info: TrainingInfo = serde_json::from_str(TRAINING_INFO).unwrap();
        let (best, block) = info.best_accuracy().unwrap();
        assert_eq!(best, Algorithm::Svm);
        assert_eq!(block.accuracy, 0.93);
        let (fastest, _) = info.fastest_training().unwrap();
        assert_eq!(fastest, Algorithm::NaiveBayes);
    }

    #[test]
    fn unknown_summary_key_resolves_to_none() {
        let mut info: TrainingInfo = serde_json::from_str(TRAINING_INFO).unwrap();
        info.summary.best_accuracy_algorithm = "knn".into();
        assert!(info.best_accuracy().is_none());
    }

    #[test]
    fn parameter_summary_renders_null_as_none() {
        let info: TrainingInfo = serde_json::from_str(TRAINING_INFO).unwrap();
        assert_eq!(
            info.algorithms.random_forest.parameter_summary(),
            "max_depth: None, n_estimators: 100"
        );
        assert_eq!(info.algorithms.svm.parameter_summary(), "C: 1.0, kernel: linear");
    }

    #[test]
    fn predicted_category_alias_is_accepted() {
        let raw: RawAlgorithmResult =
            serde_json::from_str(r#"{"predictedCategory": "Space", "confidence": 0.4}"#).unwrap();
        assert_eq!(raw.prediction.as_deref(), Some("Space"));
    }
}
