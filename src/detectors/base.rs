//! Base detector trait
//!
//! All smell rules implement [`Detector`]. Rules are pure functions of file
//! content plus their construction-time thresholds: no network access, no
//! shared state. A rule that cannot make sense of a file returns an error,
//! which the engine contains (that file simply yields no records for it).

use crate::models::Smell;
use crate::scanner::SourceFile;
use anyhow::Result;

/// Trait for all static smell rules
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyDetector {
///     max_widgets: usize,
/// }
///
/// impl Detector for MyDetector {
///     fn name(&self) -> &'static str {
///         "MyDetector"
///     }
///
///     fn description(&self) -> &'static str {
///         "Detects my specific code smell"
///     }
///
///     fn detect(&self, file: &SourceFile) -> Result<Vec<Smell>> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Unique identifier for this rule (e.g. "GodClassDetector")
    fn name(&self) -> &'static str;

    /// Human-readable description of what this rule finds
    fn description(&self) -> &'static str;

    /// Run the rule against a single file.
    ///
    /// Records must be returned in structural discovery order so the engine
    /// can keep within-file ordering stable.
    fn detect(&self, file: &SourceFile) -> Result<Vec<Smell>>;
}
