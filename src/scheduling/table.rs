use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use utoipa::ToSchema;

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Conjunction of row predicates. An empty filter keeps every row.
pub struct Filter<T> {
    predicates: Vec<Predicate<T>>,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<T> Filter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Adds `predicate` bound to `value` only when a value was supplied.
    pub fn and_if<V, P>(self, value: Option<V>, predicate: P) -> Self
    where
        V: Send + Sync + 'static,
        P: Fn(&T, &V) -> bool + Send + Sync + 'static,
    {
        match value {
            Some(value) => self.and(move |item| predicate(item, &value)),
            None => self,
        }
    }

    pub fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|p| p(item))
    }

    pub fn apply(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

/// Case-insensitive substring match of `needle` against any column.
/// A blank needle matches everything.
pub fn text_matches<S: AsRef<str>>(needle: &str, columns: &[S]) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    columns
        .iter()
        .any(|c| c.as_ref().to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Stable sort by `key`, ties keep their fetched order in both directions.
pub fn sort_rows<T, K, F>(rows: &mut [T], order: SortOrder, mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    rows.sort_by(|a, b| order.apply(key(a).cmp(&key(b))));
}
