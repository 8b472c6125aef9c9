pub mod intake;
pub mod library;
pub mod parent;
pub mod rewards;
