//! Cancellable, debounced render scheduling.

mod scheduler;
mod thumbnail;

pub use scheduler::{HIDDEN_PAGE_SCALE, MAX_INITIAL_DPR, PageRenderer};
pub use thumbnail::{HIDDEN_THUMBNAIL_FACTOR, ThumbnailOptions, ThumbnailRenderer};
