//! FilterSortPipeline - derives the display view from the store.
//!
//! [`derive_view`] is a pure function of the store contents and the criteria.
//! [`ViewMemo`] caches its output keyed on the store revision plus the
//! criteria, so anything else (selection changes in particular) never causes
//! a recomputation.

use crate::{
    FilterCriteria, Item, ItemId, ItemStore, Revision, SortCriteria, SortDirection, SortField,
};
use std::cmp::Ordering;

/// Compute the visible, ordered item ids.
///
/// Filtering: case-insensitive substring match of the search query against
/// title, description and category; exact category match unless "all".
///
/// Sorting:
/// - `dateAdded` compares creation timestamps, ties broken by load order
/// - `name` and `category` compare lowercased strings, ties broken by id
///
/// Direction applies to the primary key only; tie-breaks always ascend.
pub fn derive_view(store: &ItemStore, filter: &FilterCriteria, sort: &SortCriteria) -> Vec<ItemId> {
    let needle = filter.search_query.trim().to_lowercase();
    let all_categories = filter.all_categories();

    let mut visible: Vec<SortKey<'_>> = store
        .items_in_order()
        .filter(|item| all_categories || item.category == filter.category)
        .filter(|item| item.matches_query(&needle))
        .map(|item| SortKey::new(item, sort.field, store.rank(&item.id).unwrap_or(usize::MAX)))
        .collect();

    visible.sort_by(|a, b| compare(a, b, sort));
    visible.into_iter().map(|key| key.item.id.clone()).collect()
}

/// Precomputed comparison key, so lowercasing happens once per item.
struct SortKey<'a> {
    item: &'a Item,
    text: Option<String>,
    rank: usize,
}

impl<'a> SortKey<'a> {
    fn new(item: &'a Item, field: SortField, rank: usize) -> Self {
        let text = match field {
            SortField::DateAdded => None,
            SortField::Name => Some(item.title.to_lowercase()),
            SortField::Category => Some(item.category.to_lowercase()),
        };
        Self { item, text, rank }
    }
}

fn compare(a: &SortKey<'_>, b: &SortKey<'_>, sort: &SortCriteria) -> Ordering {
    let primary = match sort.field {
        SortField::DateAdded => a.item.created_at.cmp(&b.item.created_at),
        SortField::Name | SortField::Category => a.text.cmp(&b.text),
    };
    let primary = match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };

    primary.then_with(|| match sort.field {
        SortField::DateAdded => a.rank.cmp(&b.rank),
        SortField::Name | SortField::Category => a.item.id.cmp(&b.item.id),
    })
}

/// Key identifying one computed view.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    revision: Revision,
    filter: FilterCriteria,
    sort: SortCriteria,
}

/// Memoized view derivation.
#[derive(Debug, Clone, Default)]
pub struct ViewMemo {
    cached: Option<(MemoKey, Vec<ItemId>)>,
    recomputations: u64,
}

impl ViewMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the view for the given inputs, recomputing only when the store
    /// revision or the criteria changed.
    ///
    /// The boolean is `true` when the view was recomputed.
    pub fn get(
        &mut self,
        store: &ItemStore,
        filter: &FilterCriteria,
        sort: &SortCriteria,
    ) -> (&[ItemId], bool) {
        let key = MemoKey {
            revision: store.revision(),
            filter: filter.clone(),
            sort: *sort,
        };

        let hit = matches!(&self.cached, Some((cached, _)) if *cached == key);
        if !hit {
            let view = derive_view(store, filter, sort);
            self.cached = Some((key, view));
            self.recomputations += 1;
        }

        match &self.cached {
            Some((_, view)) => (view.as_slice(), !hit),
            None => (&[], !hit),
        }
    }

    /// How many times the view has been recomputed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Drop the cached view.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortDirection;
    use proptest::prelude::*;

    fn ids(values: &[&str]) -> Vec<ItemId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn store_with(items: Vec<Item>) -> ItemStore {
        let mut store = ItemStore::new();
        store.load(items).unwrap();
        store
    }

    fn abc() -> ItemStore {
        store_with(vec![
            Item::new("A", "u", 1, "docs", "A"),
            Item::new("B", "u", 2, "videos", "b"),
            Item::new("C", "u", 3, "docs", "c"),
        ])
    }

    #[test]
    fn date_added_desc() {
        let view = derive_view(
            &abc(),
            &FilterCriteria::default(),
            &SortCriteria::newest_first(),
        );
        assert_eq!(view, ids(&["C", "B", "A"]));
    }

    #[test]
    fn name_asc_is_case_insensitive() {
        let store = store_with(vec![
            Item::new("1", "u", 1, "x", "b"),
            Item::new("2", "u", 2, "x", "A"),
            Item::new("3", "u", 3, "x", "c"),
        ]);
        let view = derive_view(&store, &FilterCriteria::default(), &SortCriteria::name_asc());
        assert_eq!(view, ids(&["2", "1", "3"]));
    }

    #[test]
    fn date_ties_follow_load_order() {
        let mut store = store_with(vec![
            Item::new("x", "u", 5, "c", "x"),
            Item::new("y", "u", 5, "c", "y"),
            Item::new("z", "u", 5, "c", "z"),
        ]);
        // Display order changes must not affect the tie-break
        store.apply_reorder(&ids(&["z", "x", "y"])).unwrap();

        let asc = SortCriteria::new(SortField::DateAdded, SortDirection::Asc);
        assert_eq!(
            derive_view(&store, &FilterCriteria::default(), &asc),
            ids(&["x", "y", "z"])
        );

        // Desc reverses the primary key only
        let desc = SortCriteria::newest_first();
        assert_eq!(
            derive_view(&store, &FilterCriteria::default(), &desc),
            ids(&["x", "y", "z"])
        );
    }

    #[test]
    fn name_ties_broken_by_id() {
        let store = store_with(vec![
            Item::new("b", "u", 1, "c", "Same"),
            Item::new("a", "u", 2, "c", "same"),
        ]);
        let desc = SortCriteria::new(SortField::Name, SortDirection::Desc);
        assert_eq!(
            derive_view(&store, &FilterCriteria::default(), &desc),
            ids(&["a", "b"])
        );
    }

    #[test]
    fn category_sort() {
        let sort = SortCriteria::new(SortField::Category, SortDirection::Asc);
        assert_eq!(
            derive_view(&abc(), &FilterCriteria::default(), &sort),
            ids(&["A", "C", "B"])
        );
    }

    #[test]
    fn category_filter_is_exact() {
        let filter = FilterCriteria::category("docs");
        let view = derive_view(&abc(), &filter, &SortCriteria::default());
        assert_eq!(view, ids(&["A", "C"]));

        let filter = FilterCriteria::category("doc");
        assert!(derive_view(&abc(), &filter, &SortCriteria::default()).is_empty());
    }

    #[test]
    fn search_matches_description_and_category() {
        let store = store_with(vec![
            Item::new("1", "u", 1, "Recipes", "Soup"),
            Item::new("2", "u", 2, "misc", "Bread").with_description("Sourdough RECIPE"),
            Item::new("3", "u", 3, "misc", "Cake"),
        ]);
        let view = derive_view(
            &store,
            &FilterCriteria::search("  recipe "),
            &SortCriteria::default(),
        );
        assert_eq!(view, ids(&["1", "2"]));
    }

    #[test]
    fn search_and_category_combine() {
        let filter = FilterCriteria {
            search_query: "a".into(),
            category: "docs".into(),
        };
        assert_eq!(
            derive_view(&abc(), &filter, &SortCriteria::default()),
            ids(&["A"])
        );
    }

    #[test]
    fn memo_recomputes_only_on_key_change() {
        let mut store = abc();
        let mut memo = ViewMemo::new();
        let filter = FilterCriteria::default();
        let sort = SortCriteria::default();

        let (_, recomputed) = memo.get(&store, &filter, &sort);
        assert!(recomputed);
        let (view, recomputed) = memo.get(&store, &filter, &sort);
        assert!(!recomputed);
        assert_eq!(view, ids(&["A", "B", "C"]).as_slice());
        assert_eq!(memo.recomputations(), 1);

        memo.get(&store, &filter, &SortCriteria::newest_first());
        assert_eq!(memo.recomputations(), 2);

        store.apply_removal("B").unwrap();
        let (view, recomputed) = memo.get(&store, &filter, &SortCriteria::newest_first());
        assert!(recomputed);
        assert_eq!(view, ids(&["C", "A"]).as_slice());
    }

    fn arb_items() -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec(
            ("[a-c]{1,3}", 0u64..5, "[A-Ca-c]{0,3}", prop::bool::ANY),
            0..12,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (title, created_at, category, described))| {
                    let item = Item::new(format!("id-{}", i), "u", created_at, category, title);
                    if described {
                        item.with_description("Notes")
                    } else {
                        item
                    }
                })
                .collect()
        })
    }

    fn arb_sort() -> impl Strategy<Value = SortCriteria> {
        (
            prop_oneof![
                Just(SortField::DateAdded),
                Just(SortField::Name),
                Just(SortField::Category)
            ],
            prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
        )
            .prop_map(|(field, direction)| SortCriteria::new(field, direction))
    }

    proptest! {
        #[test]
        fn derive_view_is_pure(items in arb_items(), query in "[a-cA-C]{0,2}", sort in arb_sort()) {
            let store = store_with(items.clone());
            let other = store_with(items);
            let filter = FilterCriteria::search(query);

            let first = derive_view(&store, &filter, &sort);
            let second = derive_view(&store, &filter, &sort);
            let third = derive_view(&other, &filter, &sort);

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &third);
        }

        #[test]
        fn view_is_subset_without_duplicates(items in arb_items(), sort in arb_sort()) {
            let store = store_with(items);
            let view = derive_view(&store, &FilterCriteria::default(), &sort);

            prop_assert_eq!(view.len(), store.len());
            let unique: std::collections::HashSet<_> = view.iter().collect();
            prop_assert_eq!(unique.len(), view.len());
        }
    }
}
