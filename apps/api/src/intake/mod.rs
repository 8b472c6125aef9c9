// Intake flow: the parent's preference record, its submission rules, and the
// confirmation view ("personalized plan") rendered from it.

pub mod confirmation;
pub mod handlers;
pub mod validation;
