pub mod agreement;
pub mod assembler;
pub mod error;
pub mod history;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod storage;
pub mod tracker;
pub mod wire;

pub use agreement::AgreementLabel;
pub use assembler::{DisplayBundle, HistoryRow, Origin, SessionAssembler};
pub use error::{ClientError, StorageError};
pub use history::{HistoryStore, HISTORY_CAPACITY, HISTORY_KEY};
pub use model::{
    Algorithm, ClassificationSession, PerAlgorithm, PerformanceMetrics, PredictionResult,
    ProbabilityMap, SessionId,
};
pub use storage::{KeyValueStore, MemoryStore};
pub use tracker::{RequestTicket, RequestTracker};
pub use wire::{ErrorBody, PredictRequest, PredictResponse, TrainingInfo};
