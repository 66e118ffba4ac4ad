/// Analysis modules: post-scan summaries of a usage tree.

pub mod breakdown;
pub mod outline;

pub use breakdown::{breakdown, percentage, ShareRow};
pub use outline::{outline, OutlineRow, MAX_OUTLINE_ROWS};
