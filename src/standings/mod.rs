pub mod calculator;
pub mod ordering;

pub use calculator::compute_league_table;
pub use ordering::{compare_entries, is_sorted, is_sporting_tie};

pub const POINTS_PER_WIN: u32 = 3;
pub const POINTS_PER_DRAW: u32 = 1;
