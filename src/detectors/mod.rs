//! Static design-smell detection
//!
//! One rule per file, all implementing the [`base::Detector`] trait, plus
//! the [`engine::SmellEngine`] that runs the full rule set over a file.

pub mod base;
pub mod engine;
mod feature_envy;
mod god_class;
mod large_class;
mod long_method;
mod long_parameter_list;
pub mod methods;

pub use base::Detector;
pub use engine::SmellEngine;
pub use feature_envy::FeatureEnvyDetector;
pub use god_class::GodClassDetector;
pub use large_class::LargeClassDetector;
pub use long_method::LongMethodDetector;
pub use long_parameter_list::LongParameterListDetector;
