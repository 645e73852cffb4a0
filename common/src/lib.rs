//! MediScan Common Library
//!
//! CLI・デスクトップ・Web(WASM)で共有される型と解析ロジック

pub mod types;
pub mod error;
pub mod random;
pub mod analyzer;
pub mod viewer;
pub mod report;
pub mod upload;
pub mod session;

#[cfg(feature = "native")]
pub mod decode;

pub use types::{Condition, DetectionResult, HighlightedArea, ImageDimensions, ImageFile, Severity};
pub use error::{Error, Result};
pub use random::{RandomSource, SequenceRandom};
#[cfg(feature = "native")]
pub use random::RngSource;
pub use analyzer::{analyze_image, AnalysisBackend, AnalysisOptions, MockAnalyzer};
pub use viewer::{PixelRect, Rgb, ViewerState};
pub use report::{render_text, ReportSection};
pub use upload::{DragState, Rejection, UploadCollector, UploadFile};
pub use session::{AnalysisTicket, Completion, LocalUrlRegistry, ObjectUrl, ObjectUrlProvider, Phase, Session};
