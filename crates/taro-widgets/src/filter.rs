//! Filter & group engine.
//!
//! A pure projection from (options, search text, item functions) to the
//! ordered groups the panel displays. Nothing here is cached: callers
//! recompute whenever any input changes.

use crate::item::{Group, Item, ItemFns, Label, Value};
use std::collections::HashMap;

/// Filter `items` by `search_text` (when `searchable`) and partition the
/// survivors into groups in first-seen order.
///
/// Items keep their original relative order inside each group; groups are
/// never sorted. With `searchable == false` the search text is ignored and
/// every item passes.
pub fn compute<V: Value, L: Label>(
    items: &[Item<V, L>],
    search_text: &str,
    searchable: bool,
    fns: &ItemFns<V, L>,
) -> Vec<Group> {
    let predicate = searchable.then(|| fns.predicate(search_text));
    let mut groups: Vec<Group> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, item) in items.iter().enumerate() {
        if let Some(pred) = &predicate {
            if !pred(item) {
                continue;
            }
        }
        let key = fns.group_key(item);
        match positions.get(&key) {
            Some(&g) => groups[g].items.push(index),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    items: vec![index],
                });
            }
        }
    }
    groups
}

/// Concatenate every group's items in display order. Headers are not part
/// of the flattened list; its indices are what highlighting refers to.
pub fn flatten(groups: &[Group]) -> Vec<usize> {
    groups.iter().flat_map(|g| g.items.iter().copied()).collect()
}
