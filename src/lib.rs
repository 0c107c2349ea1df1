//! Client data-sync layer for the RIG prompt and guide marketplace.
//!
//! Collection views combine a bundled fallback dataset with paginated,
//! debounced, cancellable fetches against the RIG REST API. The moderation
//! queue and the submission forms are built on the same pieces.

pub mod api;
pub mod config;
pub mod fallback;
pub mod logging;
pub mod model;
pub mod moderation;
pub mod mvi;
pub mod view;
