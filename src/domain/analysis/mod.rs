//! Analysis Module - Services that run a loaded model over many inputs.
//!
//! # Components
//!
//! - `OptionGenerator` - Exhaustive search for inputs that raise the model output
//! - `score_alternatives` / `ranked` - Parallel batch scoring for external rankers
//!
//! Both only read the model; every evaluation owns its own assignment.

mod batch;
mod option_generator;

pub use batch::{
    ranked, score_alternatives, skipped, Alternative, AlternativeScore, RankedAlternative,
    SkippedAlternative,
};
pub use option_generator::{ImprovedOption, OptionGenerator};
