// Platform recommendations: static per-subject catalog, the parent's
// preference bundle, the matcher that annotates pre-ranked entries, and the
// single-choice selection that persists into the intake form.

pub mod catalog;
pub mod handlers;
pub mod matcher;
pub mod preferences;
pub mod selection;
