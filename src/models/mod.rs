pub mod history;
pub mod listing;
pub mod series;
pub mod stats;

pub use history::*;
pub use listing::*;
pub use series::*;
pub use stats::*;
