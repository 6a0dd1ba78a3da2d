pub mod clipboard;
pub mod export;
pub mod extract;
pub mod page;
pub mod report;
pub mod stats;
