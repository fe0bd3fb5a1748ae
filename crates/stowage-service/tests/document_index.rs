//! Index service tests: lookups, tag/metadata updates, search semantics.

use std::collections::HashMap;
use std::sync::Arc;

use stowage_core::index::{DocumentIndexEntry, DocumentIndexStore};
use stowage_core::mock::MemoryIndexStore;
use stowage_service::{DocumentIndexService, ErrorCode, SearchRequest};
use uuid::Uuid;

fn entry(bucket: &str, key: &str, tags: &[(&str, &str)]) -> DocumentIndexEntry {
    let mut entry = DocumentIndexEntry::new(bucket, key)
        .with_content_type("text/plain")
        .with_size(key.len() as i64);
    for (k, v) in tags {
        entry.tags.insert(k.to_string(), v.to_string());
    }
    entry
}

async fn seeded_service() -> (DocumentIndexService, Arc<MemoryIndexStore>) {
    let store = Arc::new(MemoryIndexStore::new());
    (DocumentIndexService::new(store.clone()), store)
}

#[tokio::test]
async fn get_by_id_returns_entry_or_not_found() {
    let (service, store) = seeded_service().await;
    let stored = store.insert(entry("docs", "a.txt", &[])).await.unwrap();

    let found = service.get_by_id(stored.id).await;
    assert_eq!(found.data.unwrap().key, "a.txt");

    let missing = service.get_by_id(Uuid::new_v4()).await;
    assert!(missing.failed_with(ErrorCode::IndexEntryNotFound));
}

#[tokio::test]
async fn update_tags_replaces_wholesale_and_bumps_last_modified() {
    let (service, store) = seeded_service().await;
    let stored = store
        .insert(entry("docs", "a.txt", &[("env", "dev"), ("team", "x")]))
        .await
        .unwrap();

    let updated = service
        .update_tags(
            stored.id,
            HashMap::from([("priority".to_string(), "high".to_string())]),
        )
        .await;
    assert!(updated.is_success());

    let fetched = service.get_by_id(stored.id).await.data.unwrap();

    // Wholesale replace: the old env/team tags are gone
    assert_eq!(
        fetched.tags,
        HashMap::from([("priority".to_string(), "high".to_string())])
    );
    assert!(fetched.last_modified.unwrap() >= fetched.uploaded_at);
}

#[tokio::test]
async fn update_metadata_replaces_wholesale() {
    let (service, store) = seeded_service().await;
    let mut seeded = entry("docs", "a.txt", &[]);
    seeded
        .custom_metadata
        .insert("department".to_string(), "finance".to_string());
    let stored = store.insert(seeded).await.unwrap();

    let updated = service
        .update_metadata(
            stored.id,
            HashMap::from([("reviewed".to_string(), "yes".to_string())]),
        )
        .await;
    assert!(updated.is_success());

    let fetched = service.get_by_id(stored.id).await.data.unwrap();
    assert_eq!(
        fetched.custom_metadata,
        HashMap::from([("reviewed".to_string(), "yes".to_string())])
    );
}

#[tokio::test]
async fn update_tags_on_missing_entry_is_not_found() {
    let (service, _) = seeded_service().await;
    let result = service.update_tags(Uuid::new_v4(), HashMap::new()).await;
    assert!(result.failed_with(ErrorCode::IndexEntryNotFound));
}

#[tokio::test]
async fn tag_filters_are_conjunctive() {
    let (service, store) = seeded_service().await;

    store
        .insert(entry("docs", "env-only.txt", &[("env", "prod")]))
        .await
        .unwrap();
    store
        .insert(entry(
            "docs",
            "both.txt",
            &[("env", "prod"), ("team", "x")],
        ))
        .await
        .unwrap();
    store
        .insert(entry("docs", "team-only.txt", &[("team", "x")]))
        .await
        .unwrap();

    let env_query = SearchRequest {
        tags: HashMap::from([("env".to_string(), "prod".to_string())]),
        ..Default::default()
    };
    let env_page = service.search(env_query).await.data.unwrap();
    let mut keys: Vec<_> = env_page.results.iter().map(|e| e.key.clone()).collect();
    keys.sort();
    assert_eq!(keys, vec!["both.txt", "env-only.txt"]);
    assert_eq!(env_page.total, 2);

    let both_query = SearchRequest {
        tags: HashMap::from([
            ("env".to_string(), "prod".to_string()),
            ("team".to_string(), "x".to_string()),
        ]),
        ..Default::default()
    };
    let both_page = service.search(both_query).await.data.unwrap();
    assert_eq!(both_page.total, 1);
    assert_eq!(both_page.results[0].key, "both.txt");
}

#[tokio::test]
async fn pagination_is_consistent_with_count() {
    let (service, store) = seeded_service().await;

    for index in 0..23 {
        store
            .insert(entry("docs", &format!("file-{index:02}.txt"), &[]))
            .await
            .unwrap();
    }
    // Entries in another bucket must not leak into the result
    store
        .insert(entry("other", "stray.txt", &[]))
        .await
        .unwrap();

    let page_size = 5;
    let mut collected = Vec::new();
    let mut page = 1;

    loop {
        let result = service
            .search(SearchRequest {
                bucket: Some("docs".to_string()),
                page,
                page_size,
                sort_by: "filename".to_string(),
                sort_descending: false,
                ..Default::default()
            })
            .await;

        let paged = result.data.unwrap();
        assert_eq!(paged.total, 23);
        assert_eq!(paged.total_pages, 5);

        if paged.results.is_empty() {
            break;
        }
        collected.extend(paged.results.into_iter().map(|e| e.key));
        if page as u64 >= paged.total_pages {
            break;
        }
        page += 1;
    }

    // Every matching entry exactly once, in sort order
    let expected: Vec<String> = (0..23).map(|i| format!("file-{i:02}.txt")).collect();
    assert_eq!(collected, expected);
}

#[tokio::test]
async fn search_rejects_invalid_pagination() {
    let (service, _) = seeded_service().await;

    let zero_page = service
        .search(SearchRequest {
            page: 0,
            ..Default::default()
        })
        .await;
    assert!(zero_page.failed_with(ErrorCode::InvalidPagination));

    let zero_size = service
        .search(SearchRequest {
            page_size: 0,
            ..Default::default()
        })
        .await;
    assert!(zero_size.failed_with(ErrorCode::InvalidPagination));
}

#[tokio::test]
async fn search_sorts_by_size_descending() {
    let (service, store) = seeded_service().await;

    for (key, size) in [("small", 1), ("large", 300), ("medium", 20)] {
        store
            .insert(
                DocumentIndexEntry::new("docs", key)
                    .with_content_type("text/plain")
                    .with_size(size),
            )
            .await
            .unwrap();
    }

    let result = service
        .search(SearchRequest {
            sort_by: "size".to_string(),
            sort_descending: true,
            ..Default::default()
        })
        .await;

    let sizes: Vec<i64> = result.data.unwrap().results.iter().map(|e| e.size).collect();
    assert_eq!(sizes, vec![300, 20, 1]);
}

#[tokio::test]
async fn unknown_sort_field_falls_back_to_uploaded_at() {
    let (service, store) = seeded_service().await;
    store.insert(entry("docs", "a.txt", &[])).await.unwrap();

    let result = service
        .search(SearchRequest {
            sort_by: "definitely-not-a-field".to_string(),
            ..Default::default()
        })
        .await;
    assert!(result.is_success());
    assert_eq!(result.data.unwrap().total, 1);
}
