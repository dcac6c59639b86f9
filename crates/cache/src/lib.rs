//! Session and record caching — the explicit cache state that replaces
//! ad-hoc browser-storage reads: last-used filter selection, the known
//! account list with a validity window, and the in-memory last-known-good
//! record set.

pub mod persist;
pub mod session;
pub mod store;

pub use session::{CacheState, SessionCache};
pub use store::RecordStore;
