use chrono::{DateTime, Utc};
use derive_more::{Display, From, FromStr, Into};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// The three classifiers the backend runs, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, IntoStaticStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Algorithm {
    NaiveBayes,
    Svm,
    RandomForest,
}

impl Algorithm {
    /// Key used by the backend (`naive_bayes`, `svm`, `random_forest`).
    pub fn wire_key(self) -> &'static str {
        self.into()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::NaiveBayes => "Naive Bayes",
            Algorithm::Svm => "SVM",
            Algorithm::RandomForest => "Random Forest",
        }
    }

    /// Short prefix used for element ids and compact table columns.
    pub fn short_name(self) -> &'static str {
        match self {
            Algorithm::NaiveBayes => "nb",
            Algorithm::Svm => "svm",
            Algorithm::RandomForest => "rf",
        }
    }
}

/// One value per algorithm. Iteration always follows [`Algorithm`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerAlgorithm<T> {
    pub naive_bayes: T,
    pub svm: T,
    pub random_forest: T,
}

impl<T> PerAlgorithm<T> {
    pub fn from_fn(mut f: impl FnMut(Algorithm) -> T) -> Self {
        Self {
            naive_bayes: f(Algorithm::NaiveBayes),
            svm: f(Algorithm::Svm),
            random_forest: f(Algorithm::RandomForest),
        }
    }

    pub fn get(&self, algorithm: Algorithm) -> &T {
        match algorithm {
            Algorithm::NaiveBayes => &self.naive_bayes,
            Algorithm::Svm => &self.svm,
            Algorithm::RandomForest => &self.random_forest,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &T)> {
        Algorithm::iter().map(move |algorithm| (algorithm, self.get(algorithm)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Algorithm, &T) -> U) -> PerAlgorithm<U> {
        PerAlgorithm::from_fn(|algorithm| f(algorithm, self.get(algorithm)))
    }

    pub fn values(&self) -> [&T; 3] {
        [&self.naive_bayes, &self.svm, &self.random_forest]
    }
}

impl<T: Copy> PerAlgorithm<T> {
    pub fn to_array(&self) -> [T; 3] {
        [self.naive_bayes, self.svm, self.random_forest]
    }
}

/// Category → probability mapping that keeps the order categories were first
/// seen in. Tie-breaks in the projections depend on this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbabilityMap(Vec<(String, f64)>);

impl ProbabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites. An overwritten category keeps its original position.
    pub fn insert(&mut self, category: impl Into<String>, probability: f64) {
        let category = category.into();
        match self.0.iter_mut().find(|(name, _)| *name == category) {
            Some(entry) => entry.1 = probability,
            None => self.0.push((category, probability)),
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, probability)| *probability)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, probability)| (name.as_str(), *probability))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ProbabilityMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = ProbabilityMap::new();
        for (category, probability) in iter {
            map.insert(category, probability);
        }
        map
    }
}

impl Serialize for ProbabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, probability) in &self.0 {
            map.serialize_entry(category, probability)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProbabilityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProbabilityMapVisitor;

        impl<'de> Visitor<'de> for ProbabilityMapVisitor {
            type Value = ProbabilityMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object of category probabilities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ProbabilityMap::new();
                while let Some((category, probability)) =
                    access.next_entry::<String, Option<f64>>()?
                {
                    map.insert(category, probability.unwrap_or(0.0));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ProbabilityMapVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_category: String,
    pub confidence: f64,
    #[serde(default)]
    pub probabilities: ProbabilityMap,
    #[serde(default)]
    pub prediction_time_ms: f64,
}

impl PredictionResult {
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

/// Backend timings, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub preprocessing_time_sec: f64,
    pub vectorization_time_sec: f64,
    pub total_time_sec: f64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, FromStr,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// One completed classification request, as stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationSession {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub input_text_preview: String,
    pub input_text_length: u64,
    pub processed_text_length: u64,
    pub results: PerAlgorithm<PredictionResult>,
    pub performance: PerformanceMetrics,
    #[serde(default)]
    pub category_names: Vec<String>,
}

impl ClassificationSession {
    pub fn predicted_categories(&self) -> [&str; 3] {
        self.results
            .values()
            .map(|result| result.predicted_category.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_map_keeps_document_order() {
        let map: ProbabilityMap =
            serde_json::from_str(r#"{"zeta": 0.1, "alpha": 0.7, "mid": 0.2}"#).unwrap();
        let order: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);

        let encoded = serde_json::to_string(&map).unwrap();
        assert_eq!(encoded, r#"{"zeta":0.1,"alpha":0.7,"mid":0.2}"#);
    }

    #[test]
    fn probability_map_null_values_become_zero() {
        let map: ProbabilityMap = serde_json::from_str(r#"{"a": null, "b": 0.5}"#).unwrap();
        assert_eq!(map.get("a"), Some(0.0));
        assert_eq!(map.get("b"), Some(0.5));
    }

    #[test]
    fn overwritten_category_keeps_position() {
        let mut map = ProbabilityMap::new();
        map.insert("a", 0.1);
        map.insert("b", 0.2);
        map.insert("a", 0.9);
        let entries: Vec<(&str, f64)> = map.iter().collect();
        assert_eq!(entries, vec![("a", 0.9), ("b", 0.2)]);
    }

    #[test]
    fn per_algorithm_iterates_in_fixed_order() {
        let names = PerAlgorithm::from_fn(|algorithm| algorithm.wire_key());
        let keys: Vec<&str> = names.iter().map(|(_, key)| *key).collect();
        assert_eq!(keys, vec!["naive_bayes", "svm", "random_forest"]);
        assert_eq!(*names.get(Algorithm::Svm), "svm");
    }

    #[test]
    fn algorithm_parses_from_wire_key() {
        assert_eq!("random_forest".parse::<Algorithm>().unwrap(), Algorithm::RandomForest);
        assert_eq!(Algorithm::NaiveBayes.as_ref(), "naive_bayes");
        assert!("gradient_boosting".parse::<Algorithm>().is_err());
    }

    #[test]
    fn session_id_parses_and_displays() {
        let id: SessionId = "1700000000000000".parse().unwrap();
        assert_eq!(id.value(), 1_700_000_000_000_000);
        assert_eq!(id.to_string(), "1700000000000000");
    }
}
