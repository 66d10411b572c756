//! Turns the raw `completed` and `sortBy` query parameters into a filter and
//! an optional sort directive.

use crate::models::TaskQuery;

/// Predicate applied on top of the owner scope when listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// `None` matches tasks in any completion state.
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A single `field:direction` ordering. The field name is kept verbatim;
/// stores ignore fields they do not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub direction: SortDirection,
}

impl TaskFilter {
    pub fn matches(&self, completed: bool) -> bool {
        self.completed.map_or(true, |wanted| wanted == completed)
    }
}

/// Builds the completion filter and sort directive for `GET /tasks`.
///
/// `completed` is compared against the literal `"true"`; every other non-empty
/// value means `false`. An absent or empty value applies no filter.
///
/// `sortBy` is split on the first `:`. Only `desc` selects descending order.
pub fn build_filter(query: &TaskQuery) -> (TaskFilter, Option<SortDirective>) {
    let filter = TaskFilter {
        completed: query
            .completed
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| raw == "true"),
    };

    let sort = query
        .sort_by
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(parse_sort);

    (filter, sort)
}

fn parse_sort(raw: &str) -> SortDirective {
    let mut parts = raw.split(':');
    let field = parts.next().unwrap_or_default().to_string();
    let direction = match parts.next() {
        Some("desc") => SortDirection::Descending,
        _ => SortDirection::Ascending,
    };
    SortDirective { field, direction }
}
