//! Job records, storage and digest selection.

mod record;
mod selector;
mod store;

pub use record::{JobRecord, JobStatus, NotificationUpdate};
pub use selector::{is_eligible, select_digest};
pub use store::{JobStore, JsonFileJobStore, MemoryJobStore};
