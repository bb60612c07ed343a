use super::*;
use crate::config::MetaConfig;
use crate::store::MemoryDocumentStore;
use serde_json::json;
use std::sync::Arc;

fn record_store() -> RecordStore {
    RecordStore::new(Arc::new(MemoryDocumentStore::new()), MetaConfig::default())
}

#[tokio::test]
async fn test_create_section_prepends_to_meta_list() {
    let records = record_store();

    let first = records
        .create_collection("portraits", CollectionKind::Section)
        .await
        .unwrap();
    assert_eq!(first.meta_length, Some(1));

    let second = records
        .create_collection("landscapes", CollectionKind::Section)
        .await
        .unwrap();
    assert_eq!(second.meta_length, Some(2));

    assert_eq!(
        records.list_ids(CollectionKind::Section).await.unwrap(),
        vec!["landscapes", "portraits"]
    );
    assert_eq!(records.length("gallery-sections").await.unwrap(), 2);
}

#[tokio::test]
async fn test_unrecognized_collection_has_no_meta_list() {
    let records = record_store();
    let created = records
        .create_collection("work-17", CollectionKind::Unrecognized)
        .await
        .unwrap();
    assert_eq!(created.meta_length, None);
    assert_eq!(
        records.list_ids(CollectionKind::Unrecognized).await.unwrap(),
        vec!["work-17"]
    );
    assert!(records.list_ids(CollectionKind::Exhibit).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_duplicate_collection_fails() {
    let records = record_store();
    records
        .create_collection("summer", CollectionKind::Exhibit)
        .await
        .unwrap();
    let err = records
        .create_collection("summer", CollectionKind::Exhibit)
        .await
        .unwrap_err();
    assert!(matches!(err, RecordError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_meta_ids_cannot_be_created_or_mutated() {
    let records = record_store();
    assert!(matches!(
        records
            .create_collection("exhibitions", CollectionKind::Unrecognized)
            .await,
        Err(RecordError::MetaCollection(_))
    ));
    assert!(matches!(
        records.insert_front("gallery-sections", json!("x")).await,
        Err(RecordError::MetaCollection(_))
    ));
}

#[tokio::test]
async fn test_invalid_ids_are_rejected() {
    let records = record_store();
    for id in ["", "a/b", "..", ".hidden"] {
        assert!(
            matches!(
                records.create_collection(id, CollectionKind::Section).await,
                Err(RecordError::InvalidId(_))
            ),
            "id {id:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_insert_front_and_remove_at() {
    let records = record_store();
    records
        .create_collection("summer", CollectionKind::Exhibit)
        .await
        .unwrap();

    assert_eq!(records.insert_front("summer", json!("x.jpg")).await.unwrap(), 1);
    assert_eq!(records.insert_front("summer", json!("y.jpg")).await.unwrap(), 2);
    assert_eq!(
        records.items("summer").await.unwrap(),
        vec![json!("y.jpg"), json!("x.jpg")]
    );

    let removed = records.remove_at("summer", 1).await.unwrap();
    assert_eq!(removed.item, json!("x.jpg"));
    assert_eq!(removed.length, 1);
    assert_eq!(records.length("summer").await.unwrap(), 1);
}

#[tokio::test]
async fn test_remove_out_of_range() {
    let records = record_store();
    records
        .create_collection("summer", CollectionKind::Exhibit)
        .await
        .unwrap();
    let err = records.remove_at("summer", 0).await.unwrap_err();
    assert!(matches!(
        err,
        RecordError::PositionOutOfRange {
            position: 0,
            length: 0,
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_collection() {
    let records = record_store();
    assert!(matches!(
        records.length("nope").await,
        Err(RecordError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_collection_reports_meta_position() {
    let records = record_store();
    for id in ["c", "b", "a"] {
        records
            .create_collection(id, CollectionKind::Section)
            .await
            .unwrap();
    }
    // meta list is now [a, b, c]
    let deleted = records.delete_collection("b").await.unwrap();
    assert_eq!(deleted.kind, CollectionKind::Section);
    assert_eq!(deleted.meta_position, Some((1, 2)));
    assert_eq!(
        records.items("gallery-sections").await.unwrap(),
        vec![json!("a"), json!("c")]
    );
    assert!(matches!(
        records.length("b").await,
        Err(RecordError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_catalog_classifies_collections() {
    let records = record_store();
    records
        .create_collection("landscapes", CollectionKind::Section)
        .await
        .unwrap();
    records
        .create_collection("summer", CollectionKind::Exhibit)
        .await
        .unwrap();
    records
        .create_collection("work-1", CollectionKind::Unrecognized)
        .await
        .unwrap();

    let catalog = records.catalog().await.unwrap();
    assert_eq!(catalog.classify("landscapes"), CollectionKind::Section);
    assert_eq!(catalog.classify("summer"), CollectionKind::Exhibit);
    assert_eq!(catalog.classify("work-1"), CollectionKind::Unrecognized);
    assert_eq!(catalog.classify("unknown"), CollectionKind::Unrecognized);
    assert!(catalog.contains("work-1"));
    assert!(!catalog.contains("unknown"));
}

#[test]
fn test_collection_kind_from_str() {
    assert_eq!("section".parse::<CollectionKind>(), Ok(CollectionKind::Section));
    assert_eq!("Exhibition".parse::<CollectionKind>(), Ok(CollectionKind::Exhibit));
    assert_eq!("other".parse::<CollectionKind>(), Ok(CollectionKind::Unrecognized));
    assert!("gallery".parse::<CollectionKind>().is_err());
    assert_eq!(CollectionKind::Exhibit.to_string(), "exhibit");
}

#[tokio::test]
async fn test_copy_items_fills_only_empty_collections() {
    let records = record_store();
    for id in ["summer", "dup-summer"] {
        records
            .create_collection(id, CollectionKind::Exhibit)
            .await
            .unwrap();
    }
    records.insert_front("summer", json!("a")).await.unwrap();
    records.insert_front("summer", json!("b")).await.unwrap();

    assert_eq!(records.copy_items("summer", "dup-summer").await.unwrap(), 2);
    assert_eq!(
        records.items("dup-summer").await.unwrap(),
        vec![json!("b"), json!("a")]
    );

    records.insert_front("summer", json!("c")).await.unwrap();
    assert_eq!(records.copy_items("summer", "dup-summer").await.unwrap(), 2);
    assert!(matches!(
        records.copy_items("summer", "exhibitions").await,
        Err(RecordError::MetaCollection(_))
    ));
}

#[tokio::test]
async fn test_recreated_collection_starts_empty() {
    let records = record_store();
    records
        .create_collection("summer", CollectionKind::Exhibit)
        .await
        .unwrap();
    records.insert_front("summer", json!("a")).await.unwrap();
    records.delete_collection("summer").await.unwrap();

    records
        .create_collection("summer", CollectionKind::Exhibit)
        .await
        .unwrap();

    assert!(records.items("summer").await.unwrap().is_empty());
    assert_eq!(
        records.list_ids(CollectionKind::Exhibit).await.unwrap(),
        vec!["summer"]
    );
}
