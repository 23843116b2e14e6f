use indexmap::IndexMap;

use super::ViewSurface;
use crate::shared::types::{ForexQuote, IndexQuote, StatusEntry};

/// Keyed table replaced wholesale on every update.
///
/// Rows iterate in the order the backend sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSurface<T> {
    rows: IndexMap<String, T>,
}

impl<T> TableSurface<T> {
    pub fn replace(&mut self, rows: IndexMap<String, T>) {
        self.rows = rows;
    }

    pub fn rows(&self) -> impl Iterator<Item = (&String, &T)> {
        self.rows.iter()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.rows.get(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Default for TableSurface<T> {
    fn default() -> Self {
        Self {
            rows: IndexMap::new(),
        }
    }
}

impl<T> ViewSurface for TableSurface<T> {
    type Update = IndexMap<String, T>;

    fn update(&mut self, update: IndexMap<String, T>) {
        self.replace(update);
    }
}

/// Asset label -> allocation percent
pub type CompositionSurface = TableSurface<f64>;

/// Currency code -> exchange rate
pub type ForexSurface = TableSurface<ForexQuote>;

/// Index ticker -> quote
pub type IndicesSurface = TableSurface<IndexQuote>;

/// Collector name -> counters
pub type StatusSurface = TableSurface<StatusEntry>;
