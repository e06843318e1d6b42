pub mod context;
pub mod filters;
pub mod stats;
