//! Client-side synchronization layer for server-owned resource collections:
//! one [`EntityStore`] per resource kind, a single-shot [`Query`] wrapper for
//! standalone read views, and a [`PaginationTracker`] for list views.

pub mod error;
pub mod notify;
pub mod pagination;
pub mod query;
pub mod search;
pub mod store;

pub use error::StoreConfigError;
pub use notify::{Notification, NotificationSink};
pub use pagination::PaginationTracker;
pub use query::{Query, QueryView};
pub use store::{EntityStore, StoreView};
