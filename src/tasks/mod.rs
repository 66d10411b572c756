//! Task query construction, update validation and the owner-scoped service
//! that ties them to a [`TaskStore`](crate::store::TaskStore).

pub mod filter;
pub mod pagination;
pub mod service;
pub mod update;

pub use filter::{build_filter, SortDirection, SortDirective, TaskFilter};
pub use pagination::{resolve_pagination, Pagination};
pub use service::TaskService;
pub use update::validate_update;

use crate::store::StoreError;

/// Failure of a task operation. `NotFound` covers both "absent" and
/// "owned by someone else".
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound,
    #[error("Invalid updates!")]
    InvalidUpdates,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
