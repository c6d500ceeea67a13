//! State module for tracking crawl work
//!
//! # Components
//!
//! - `WorkItem`: a unit of crawl work with a stable identity
//! - `PageRole`: which kind of page a work item points at
//! - `ItemStatus`: checkpoint status of a work item

mod work_item;

pub use work_item::{item_key, ItemStatus, PageRole, WorkItem};
