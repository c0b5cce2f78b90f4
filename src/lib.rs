// Library interface for trainsum
// Converts raw fitness-tracker packages into training summaries

pub mod activity;
pub mod batch;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod logging;
pub mod message;

// Re-export commonly used types for convenience
pub use activity::{Activity, ActivityKind, DistanceKm, SpeedKmH, Summary, TrainingRecord};
pub use batch::{BatchProcessor, BatchReport, ErrorPolicy, InputFormat, Package, PackageOutcome};
pub use config::{AppConfig, OutputFormat};
pub use dispatch::create_record;
pub use error::{BatchError, ErrorSeverity, RecordError, TrainSumError};
pub use export::{ExportError, ExportFormat};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use message::render;
