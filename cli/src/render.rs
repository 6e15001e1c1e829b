//! Plain-text rendering of display bundles, history and training info.

use chrono::Local;
use shared::metrics::{format_percent, format_seconds, RADAR_AXES};
use shared::model::Algorithm;
use shared::normalize::preview_text;
use shared::{ClassificationSession, DisplayBundle, HistoryRow, TrainingInfo};
use std::fmt;

const BAR_WIDTH: usize = 30;
const HISTORY_PREVIEW_CHARS: usize = 150;

fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn timestamp(session: &ClassificationSession) -> String {
    session
        .created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// One classification, as printed after `predict`, `upload` and `show`.
pub struct BundleView<'a>(pub &'a DisplayBundle);

impl fmt::Display for BundleView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bundle = self.0;
        let session = &bundle.session;

        if bundle.replayed {
            writeln!(f, "Session {} (from history, {})", session.id, timestamp(session))?;
        } else {
            writeln!(f, "Session {}", session.id)?;
        }
        writeln!(f, "Text: {}", session.input_text_preview)?;
        writeln!(f, "Agreement: {}", bundle.agreement)?;
        writeln!(f)?;

        for (algorithm, result) in session.results.iter() {
            let confidence = result.confidence_percent();
            writeln!(f, "{}: {}", algorithm.display_name(), result.predicted_category)?;
            writeln!(f, "  Confidence {} {:.2}%", bar(confidence, BAR_WIDTH), confidence)?;
            for score in bundle.top_probabilities.get(algorithm) {
                writeln!(f, "    {:<28} {:>7.2}%", score.category, score.percent())?;
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<15} {:<28} {:>10} {:>12}",
            "Algorithm", "Predicted category", "Confidence", "Time"
        )?;
        for (algorithm, result) in session.results.iter() {
            writeln!(
                f,
                "{:<15} {:<28} {:>10} {:>9.3} ms",
                algorithm.display_name(),
                result.predicted_category,
                format_percent(result.confidence),
                bundle.timing_series.get(algorithm),
            )?;
        }

        let performance = &session.performance;
        writeln!(f)?;
        writeln!(f, "Preprocessing: {}", format_seconds(performance.preprocessing_time_sec))?;
        writeln!(f, "Vectorization: {}", format_seconds(performance.vectorization_time_sec))?;
        writeln!(f, "Total:         {}", format_seconds(performance.total_time_sec))?;
        if session.input_text_length > 0 {
            writeln!(
                f,
                "Text length:   {} characters, {} words",
                session.input_text_length, session.processed_text_length
            )?;
        }

        if !bundle.probability_ceiling.is_empty() {
            writeln!(f)?;
            writeln!(f, "Highest probability per category:")?;
            for score in &bundle.probability_ceiling {
                writeln!(
                    f,
                    "  {:<28} {} {:.2}%",
                    score.category,
                    bar(score.percent(), BAR_WIDTH),
                    score.percent()
                )?;
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<15} {:>10} {:>10} {:>10}",
            "Comparison", RADAR_AXES[0], RADAR_AXES[1], RADAR_AXES[2]
        )?;
        for (algorithm, point) in bundle.radar.iter() {
            let [speed, confidence, precision] = point.axes();
            writeln!(
                f,
                "{:<15} {:>10.1} {:>10.1} {:>10.1}",
                algorithm.display_name(),
                speed,
                confidence,
                precision
            )?;
        }
        Ok(())
    }
}

/// The stored sessions, newest first, zipped with their summary rows.
pub struct HistoryView<'a> {
    pub sessions: &'a [ClassificationSession],
    pub rows: &'a [HistoryRow],
}

impl fmt::Display for HistoryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sessions.is_empty() {
            return writeln!(f, "No history yet. Classify a document to get started.");
        }

        for (session, row) in self.sessions.iter().zip(self.rows) {
            writeln!(f, "[{}] {}  {}", session.id, timestamp(session), row.agreement)?;
            writeln!(
                f,
                "  Text: {} ({} characters, {} words)",
                preview_text(&session.input_text_preview, HISTORY_PREVIEW_CHARS),
                session.input_text_length,
                session.processed_text_length
            )?;
            for (algorithm, result) in session.results.iter() {
                let top = row
                    .top_probabilities
                    .get(algorithm)
                    .iter()
                    .map(|score| format!("{}: {:.1}%", score.category, score.percent()))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(
                    f,
                    "  {:<15} {:<24} {:>8} {:>9.3} ms  {}",
                    algorithm.display_name(),
                    result.predicted_category,
                    format_percent(result.confidence),
                    result.prediction_time_ms,
                    top
                )?;
            }
            let performance = &session.performance;
            writeln!(
                f,
                "  Preprocessing {:.3}ms  Vectorization {:.3}ms  Total {:.3}ms",
                performance.preprocessing_time_sec * 1000.0,
                performance.vectorization_time_sec * 1000.0,
                performance.total_time_sec * 1000.0
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}

pub struct TrainingInfoView<'a>(pub &'a TrainingInfo);

impl fmt::Display for TrainingInfoView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.0;
        let dataset = &info.dataset;
        writeln!(f, "Dataset: {}", dataset.name)?;
        writeln!(
            f,
            "  {} documents ({} train / {} test), {} categories, {} features",
            dataset.total_documents,
            dataset.train_documents,
            dataset.test_documents,
            dataset.num_categories,
            dataset.features
        )?;
        let categories = if dataset.categories_formatted.is_empty() {
            &dataset.categories
        } else {
            &dataset.categories_formatted
        };
        if !categories.is_empty() {
            writeln!(f, "  Categories: {}", categories.join(", "))?;
        }

        let pre = &info.preprocessing;
        let yes_no = |flag: bool| if flag { "yes" } else { "no" };
        writeln!(
            f,
            "Preprocessing: {} (max {} features, n-grams {}), stemming {}, stopwords {}",
            pre.vectorizer_type,
            pre.max_features,
            pre.ngram_range,
            yes_no(pre.use_stemming),
            yes_no(pre.use_stopwords)
        )?;

        writeln!(f)?;
        for algorithm in [Algorithm::NaiveBayes, Algorithm::Svm, Algorithm::RandomForest] {
            let trained = info.algorithms.get(algorithm);
            writeln!(
                f,
                "{:<15} accuracy {:>7}  training {:>12}  {}",
                algorithm.display_name(),
                format_percent(trained.accuracy),
                trained.training_time_formatted,
                trained.parameter_summary()
            )?;
        }

        writeln!(f)?;
        if let Some((_, best)) = info.best_accuracy() {
            writeln!(f, "Best accuracy:    {}: {}", best.name, format_percent(best.accuracy))?;
        }
        if let Some((_, fastest)) = info.fastest_training() {
            writeln!(
                f,
                "Fastest training: {}: {}",
                fastest.name, fastest.training_time_formatted
            )?;
        }
        if let Some(date) = &info.training_date {
            writeln!(f, "Trained on:       {}", date)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{MemoryStore, PredictResponse, SessionAssembler};

    fn bundle() -> (SessionAssembler<MemoryStore>, DisplayBundle) {
        let response: PredictResponse = serde_json::from_str(
            r#"{"results": {
                "naive_bayes": {"prediction": "Sport", "confidence": 0.8,
                    "probabilities": {"Sport": 0.8, "Space": 0.2}, "prediction_time_ms": 10},
                "svm": {"prediction": "Space", "confidence": 0.6,
                    "probabilities": {"Space": 0.6, "Sport": 0.4}, "prediction_time_ms": 20},
                "random_forest": {"prediction": "Sport", "confidence": 0.9,
                    "probabilities": {"Sport": 0.9, "Space": 0.1}, "prediction_time_ms": 40}},
             "performance": {"preprocessing_time": 0.0004, "vectorization_time": 0.002, "total_time": 0.01},
             "text_length": 11, "processed_text_length": 2}"#,
        )
        .unwrap();
        let mut assembler = SessionAssembler::open(MemoryStore::new());
        let bundle = assembler.submit(&response, Some("sample text")).unwrap();
        (assembler, bundle)
    }

    #[test]
    fn bundle_shows_agreement_and_timings() {
        let (_, bundle) = bundle();
        let text = BundleView(&bundle).to_string();
        assert!(text.contains("Agreement: Partial agreement"));
        assert!(text.contains("Preprocessing: 0.400 ms"));
        assert!(text.contains("Vectorization: 0.002000s"));
        assert!(text.contains("Text length:   11 characters, 2 words"));
        assert!(text.contains("75.0"));
    }

    #[test]
    fn history_lists_top_probabilities() {
        let (assembler, _) = bundle();
        let rows = assembler.history_rows();
        let text = HistoryView {
            sessions: assembler.history().list(),
            rows: &rows,
        }
        .to_string();
        assert!(text.contains("Partial agreement"));
        assert!(text.contains("Sport: 80.0%, Space: 20.0%"));
    }

    #[test]
    fn empty_history_has_hint() {
        let text = HistoryView { sessions: &[], rows: &[] }.to_string();
        assert!(text.starts_with("No history yet"));
    }

    #[test]
    fn bar_is_clamped() {
        assert_eq!(bar(150.0, 4), "████");
        assert_eq!(bar(-5.0, 4), "░░░░");
        assert_eq!(bar(50.0, 4), "██░░");
    }
}
