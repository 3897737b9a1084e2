//! Reconcile Module
//!
//! Separates formatting noise from real disagreement before evaluation.
//!
//! ## Structure
//! - `normalize`: pure text transforms (classification, priority vocabulary, justification)
//! - `reconciler`: applies them over a classified batch

pub mod normalize;
pub mod reconciler;

pub use normalize::{is_allowed_priority, normalize_classification, sanitize_justification};
pub use reconciler::{reconcile, ReconcileReport};
