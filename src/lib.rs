//! Legacy Match - player matching and shop cart service for the academy platform
//!
//! The core of this library is the "find your legacy" matcher: a visitor's
//! age, height and weight are bucketed and compared against a fixed catalog
//! of reference players, returning the closest one.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchError, Cart, CartItem, LineKey};
pub use crate::models::{Candidate, PhysiqueQuery, LegacyMatch, MatchKind, DistanceWeights};
pub use crate::services::CandidateCatalog;
