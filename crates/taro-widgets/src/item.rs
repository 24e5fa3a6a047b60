//! Selectable data: items, derived groups, and the pure functions that
//! describe how items are compared, printed, keyed and grouped.

use ratatui::text::{Line, Span};
use std::fmt;
use std::sync::Arc;

/// Bounds every combobox value satisfies.
pub trait Value: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> Value for T {}

/// Display payload of an item. Opaque to the selection logic; it only has
/// to render as a ratatui [`Line`].
pub trait Label: Send + Sync + 'static {
    fn to_line(&self) -> Line<'_>;
}

impl Label for String {
    fn to_line(&self) -> Line<'_> {
        Line::raw(self.as_str())
    }
}

impl Label for &'static str {
    fn to_line(&self) -> Line<'_> {
        Line::raw(*self)
    }
}

impl Label for Line<'static> {
    fn to_line(&self) -> Line<'_> {
        self.clone()
    }
}

impl Label for Span<'static> {
    fn to_line(&self) -> Line<'_> {
        Line::from(self.clone())
    }
}

/// One selectable option: `value` is its identity, `label` what is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<V, L = String> {
    pub value: V,
    pub label: L,
}

impl<V, L> Item<V, L> {
    pub fn new(value: V, label: impl Into<L>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// A run of filtered items sharing a group key, in first-seen order.
///
/// `items` holds positions into the original options slice. An empty `key`
/// means "ungrouped" and never renders a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub items: Vec<usize>,
}

impl Group {
    /// Whether a header row should be rendered for this group.
    pub fn has_header(&self) -> bool {
        !self.key.is_empty()
    }
}

pub type ItemToString<V, L> = Arc<dyn Fn(Option<&Item<V, L>>) -> String + Send + Sync>;
pub type ItemKey<V, L> = Arc<dyn Fn(&Item<V, L>) -> String + Send + Sync>;
pub type ValuesEqual<V> = Arc<dyn Fn(&V, &V) -> bool + Send + Sync>;
pub type GroupBy<V, L> = Arc<dyn Fn(&Item<V, L>) -> String + Send + Sync>;
pub type Predicate<V, L> = Box<dyn Fn(&Item<V, L>) -> bool + Send + Sync>;
pub type FilterFactory<V, L> = Arc<dyn Fn(&str) -> Predicate<V, L> + Send + Sync>;

/// The caller-supplied item functions, with documented fallbacks for the
/// optional ones.
pub struct ItemFns<V, L> {
    pub(crate) item_to_string: ItemToString<V, L>,
    pub(crate) item_to_display_string: Option<ItemToString<V, L>>,
    pub(crate) item_key: Option<ItemKey<V, L>>,
    pub(crate) values_equal: ValuesEqual<V>,
    pub(crate) group_by: Option<GroupBy<V, L>>,
    pub(crate) filter: Option<FilterFactory<V, L>>,
}

impl<V: Value, L: Label> ItemFns<V, L> {
    /// Item functions with the given plain-text conversion and defaults for
    /// everything else.
    pub fn new(item_to_string: ItemToString<V, L>) -> Self {
        Self {
            item_to_string,
            item_to_display_string: None,
            item_key: None,
            values_equal: Arc::new(|a: &V, b: &V| a == b),
            group_by: None,
            filter: None,
        }
    }

    /// Item functions printing the value with [`Display`](fmt::Display).
    pub fn display() -> Self
    where
        V: fmt::Display,
    {
        Self::new(Arc::new(|item: Option<&Item<V, L>>| {
            item.map(|i| i.value.to_string()).unwrap_or_default()
        }))
    }

    /// Plain text for filtering and as the accessible label.
    pub fn to_string(&self, item: Option<&Item<V, L>>) -> String {
        (self.item_to_string)(item)
    }

    /// Plain text for places that cannot show a rich label. Falls back to
    /// [`to_string`](ItemFns::to_string).
    pub fn display_string(&self, item: Option<&Item<V, L>>) -> String {
        match &self.item_to_display_string {
            Some(f) => f(item),
            None => self.to_string(item),
        }
    }

    /// Stable key identifying `item` across recomputations.
    pub fn key(&self, item: &Item<V, L>) -> String {
        match &self.item_key {
            Some(f) => f(item),
            None => self.to_string(Some(item)),
        }
    }

    pub fn values_equal(&self, a: &V, b: &V) -> bool {
        (self.values_equal)(a, b)
    }

    /// Group key of `item`; `""` when no grouping is configured.
    pub fn group_key(&self, item: &Item<V, L>) -> String {
        match &self.group_by {
            Some(f) => f(item),
            None => String::new(),
        }
    }

    /// Build the match predicate for `search_text`.
    ///
    /// Defaults to a case-insensitive substring match against
    /// [`to_string`](ItemFns::to_string).
    pub fn predicate(&self, search_text: &str) -> Predicate<V, L> {
        if let Some(factory) = &self.filter {
            return factory(search_text);
        }
        let needle = search_text.to_lowercase();
        let item_to_string = self.item_to_string.clone();
        Box::new(move |item: &Item<V, L>| {
            item_to_string(Some(item)).to_lowercase().contains(&needle)
        })
    }

    /// Position of the first item whose value equals `value`.
    ///
    /// This is the single source of truth for "currently selected": it is
    /// recomputed from the options on every call.
    pub fn find_selected(&self, options: &[Item<V, L>], value: Option<&V>) -> Option<usize> {
        let value = value?;
        options
            .iter()
            .position(|item| self.values_equal(&item.value, value))
    }
}
