pub mod construction;
pub mod memory;
pub mod records;
pub mod search;

pub use construction::{build_candidate, place_in_order};
pub use memory::{RecordEvent, SearchMemory};
pub use search::{select_best, SearchConfig, SearchController, SearchOutcome};
