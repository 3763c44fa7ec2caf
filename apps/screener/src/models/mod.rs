pub mod analysis;
pub mod request;

pub use analysis::{AnalysisResult, ImprovementTip, Keyword, ScoreBreakdown};
pub use request::{AnalysisRequest, ResumeFile, PDF_MIME};
