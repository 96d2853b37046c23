//! Performance benchmarks for shelf-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shelf_engine::{
    derive_view, CollectionState, FilterCriteria, Item, ItemId, ItemStore, LocalEffect,
    SortCriteria, SortDirection, SortField, ViewMemo,
};

fn make_items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| {
            Item::new(
                format!("item_{}", i),
                "owner",
                (i as u64 * 7919) % 100_000,
                ["articles", "videos", "podcasts"][i % 3],
                format!("Bookmark {}", (i * 31) % count),
            )
            .with_description("Saved for later reading")
        })
        .collect()
}

fn loaded_store(count: usize) -> ItemStore {
    let mut store = ItemStore::new();
    store.load(make_items(count)).unwrap();
    store
}

fn bench_store_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_operations");

    group.bench_function("load_1000", |b| {
        let items = make_items(1000);
        b.iter(|| {
            let mut store = ItemStore::new();
            store.load(black_box(items.clone())).unwrap();
            store
        })
    });

    group.bench_function("reorder_1000", |b| {
        let mut store = loaded_store(1000);
        let mut reversed: Vec<ItemId> = store.order().to_vec();
        reversed.reverse();
        b.iter(|| store.apply_reorder(black_box(&reversed)).unwrap())
    });

    group.bench_function("remove_and_rollback", |b| {
        let mut state = CollectionState::new();
        state.load(make_items(1000)).unwrap();
        b.iter(|| {
            let ticket = state
                .begin(LocalEffect::Remove(black_box("item_500".to_string())))
                .unwrap();
            state.rollback(ticket.id).unwrap();
        })
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for size in [100, 1000, 10000] {
        let store = loaded_store(size);

        group.bench_with_input(BenchmarkId::new("sort_by_name", size), &store, |b, store| {
            let sort = SortCriteria::new(SortField::Name, SortDirection::Asc);
            b.iter(|| derive_view(black_box(store), &FilterCriteria::default(), &sort))
        });

        group.bench_with_input(BenchmarkId::new("search_newest", size), &store, |b, store| {
            let filter = FilterCriteria::search("bookmark 1");
            b.iter(|| derive_view(black_box(store), &filter, &SortCriteria::newest_first()))
        });
    }

    group.bench_function("memo_hit_10000", |b| {
        let store = loaded_store(10000);
        let mut memo = ViewMemo::new();
        let filter = FilterCriteria::default();
        let sort = SortCriteria::name_asc();
        memo.get(&store, &filter, &sort);
        b.iter(|| memo.get(black_box(&store), &filter, &sort).0.len())
    });

    group.finish();
}

criterion_group!(benches, bench_store_operations, bench_pipeline);
criterion_main!(benches);
