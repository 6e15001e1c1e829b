//! Turns one backend response into a history entry plus everything the
//! rendering layer needs.

use crate::agreement::{classify_session, AgreementLabel};
use crate::error::{ClientError, Result};
use crate::history::HistoryStore;
use crate::metrics::{
    confidence_series, probability_ceiling, radar_projection, timing_series, top_k,
    CategoryScore, RadarPoint, DETAIL_TOP_K, SUMMARY_TOP_K,
};
use crate::model::{ClassificationSession, PerAlgorithm, SessionId};
use crate::normalize::normalize;
use crate::storage::KeyValueStore;
use crate::wire::PredictResponse;
use chrono::Utc;
use serde::Serialize;

/// Where a session being displayed came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A new backend response; recorded in history.
    Fresh,
    /// Reopened from history; never recorded again.
    Replay,
}

/// The sole handoff to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBundle {
    pub session: ClassificationSession,
    pub agreement: AgreementLabel,
    pub top_probabilities: PerAlgorithm<Vec<CategoryScore>>,
    pub timing_series: PerAlgorithm<f64>,
    pub confidence_series: PerAlgorithm<f64>,
    pub probability_ceiling: Vec<CategoryScore>,
    pub radar: PerAlgorithm<RadarPoint>,
    pub replayed: bool,
}

impl DisplayBundle {
    pub fn build(session: ClassificationSession, origin: Origin) -> Self {
        let results = &session.results;
        Self {
            agreement: classify_session(&session),
            top_probabilities: results.map(|_, r| top_k(&r.probabilities, DETAIL_TOP_K)),
            timing_series: timing_series(results),
            confidence_series: confidence_series(results),
            probability_ceiling: probability_ceiling(results),
            radar: radar_projection(results),
            replayed: origin == Origin::Replay,
            session,
        }
    }
}

/// A compact view of one history entry, for history lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub id: SessionId,
    pub agreement: AgreementLabel,
    pub top_probabilities: PerAlgorithm<Vec<CategoryScore>>,
}

impl HistoryRow {
    pub fn from_session(session: &ClassificationSession) -> Self {
        Self {
            id: session.id,
            agreement: classify_session(session),
            top_probabilities: session
                .results
                .map(|_, r| top_k(&r.probabilities, SUMMARY_TOP_K)),
        }
    }
}

pub struct SessionAssembler<S: KeyValueStore> {
    history: HistoryStore<S>,
}

impl<S: KeyValueStore> SessionAssembler<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self { history }
    }

    pub fn open(backend: S) -> Self {
        Self::new(HistoryStore::open(backend))
    }

    /// Normalizes a fresh response, records it and builds its bundle.
    ///
    /// A storage failure does not block display: the session stays in the
    /// in-memory history and the failure is logged.
    pub fn submit(
        &mut self,
        response: &PredictResponse,
        submitted_text: Option<&str>,
    ) -> Result<DisplayBundle> {
        let now = Utc::now();
        let id = self.history.next_id(now);
        let session = normalize(response, submitted_text, id, now)?;
        self.present(session, Origin::Fresh)
    }

    /// Builds the bundle for `session`, appending it to history only when fresh.
    pub fn present(
        &mut self,
        session: ClassificationSession,
        origin: Origin,
    ) -> Result<DisplayBundle> {
        if origin == Origin::Fresh {
            match self.history.append(session.clone()) {
                Ok(()) => log::debug!("Recorded session {}", session.id),
                Err(ClientError::StorageUnavailable(reason)) => {
                    log::warn!("Session {} kept in memory only: {}", session.id, reason);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(DisplayBundle::build(session, origin))
    }

    /// Reopens a stored session without touching history.
    pub fn replay(&self, id: SessionId) -> Option<DisplayBundle> {
        let session = self.history.get(id)?.clone();
        Some(DisplayBundle::build(session, Origin::Replay))
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore<S> {
        &mut self.history
    }

    pub fn history_rows(&self) -> Vec<HistoryRow> {
        self.history.list().iter().map(HistoryRow::from_session).collect()
    }

    pub fn dispose(self) -> S {
        self.history.dispose()
    }
}
