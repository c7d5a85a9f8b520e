//! Fixed-capacity history buffers

pub mod history;

pub use history::BoundedHistory;
