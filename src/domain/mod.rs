//! Domain layer - Pure business logic.

pub mod av;
pub mod ledger;
pub mod stills;
pub mod videos;
