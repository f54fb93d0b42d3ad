//! Tools built on top of the public [`SearchEngine`](crate::search::SearchEngine)
//! operations: request statistics, duplicate removal, batch queries and
//! pagination.

pub mod batch;
pub mod duplicates;
pub mod paginator;
pub mod request_queue;

pub use batch::{process_queries, process_queries_joined};
pub use duplicates::{find_duplicates, remove_duplicates};
pub use paginator::{Paginator, paginate};
pub use request_queue::RequestQueue;
