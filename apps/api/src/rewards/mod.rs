// Per-student coin and streak bookkeeping plus the static reward catalog.

pub mod catalog;
pub mod handlers;
pub mod ledger;
