// Core algorithm exports
pub mod buckets;
pub mod cart;
pub mod matcher;
pub mod scoring;

pub use buckets::{clamp_age, snap_height, snap_weight, snap_to_step, normalize};
pub use cart::{Cart, CartItem, CartTotals, CartError, LineKey};
pub use matcher::{Matcher, MatchError};
pub use scoring::{calculate_distance_score, is_exact_match};
