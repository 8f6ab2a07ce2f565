//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod annotator;
pub mod classifier;
pub mod evaluation;
pub mod import;
mod auth;
mod pipeline;
mod session;

pub use annotator::{assign_fraud_type, FRAUD_TYPE_COLUMN};
pub use auth::AuthService;
pub use classifier::{FraudClassifier, TrainOptions, TrainOutcome};
pub use evaluation::{classification_report, ClassMetrics, ClassificationReport};
pub use pipeline::{AnalysisBranch, AnalysisReport, PipelineService, PREDICTION_COLUMN};
pub use session::{Session, SessionPhase};
