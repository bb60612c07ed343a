use super::*;

fn aliases(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn test_insert_writes_identical_order_to_aliases() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("summer".to_string(), vec![1, 0]);
    // drifted alias: overwritten by the requested collection's result
    doc.orders.insert("dup-summer".to_string(), vec![0, 1]);

    let group = aliases(&["dup-summer", "summer"]);
    let next = doc.apply_insert("summer", &group, 3, &[]);

    assert_eq!(next, vec![2, 1, 0]);
    assert_eq!(doc.order("summer"), Some(&[2, 1, 0][..]));
    assert_eq!(doc.order("dup-summer"), doc.order("summer"));
}

#[test]
fn test_insert_sets_and_shifts_tags() {
    let mut doc = OrderDocument::default();
    let group = aliases(&["summer"]);
    doc.apply_insert("summer", &group, 1, &[PLACEHOLDER_TAG.to_string()]);
    doc.apply_insert("summer", &group, 2, &[]);

    assert_eq!(doc.tagged("summer", PLACEHOLDER_TAG), [1].into_iter().collect());
    assert_eq!(doc.tags_at("summer", 1), vec![PLACEHOLDER_TAG.to_string()]);
    assert!(doc.tags_at("summer", 0).is_empty());
}

#[test]
fn test_delete_adjusts_order_and_tags() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("summer".to_string(), vec![3, 1, 0, 2]);
    doc.set_tag("summer", PLACEHOLDER_TAG, 3, true);

    let anomaly = doc.apply_delete("summer", &aliases(&["summer"]), 1, 3);

    assert!(anomaly.is_none());
    assert_eq!(doc.order("summer"), Some(&[2, 0, 1][..]));
    assert_eq!(doc.tagged("summer", PLACEHOLDER_TAG), [2].into_iter().collect());
}

#[test]
fn test_delete_of_tagged_position_prunes_tag() {
    let mut doc = OrderDocument::default();
    doc.set_tag("summer", PLACEHOLDER_TAG, 0, true);
    doc.apply_delete("summer", &aliases(&["summer"]), 0, 0);
    assert!(doc.tags.is_empty());
}

#[test]
fn test_delete_reports_missing_position() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("summer".to_string(), vec![2, 0]);

    let anomaly = doc.apply_delete("summer", &aliases(&["summer"]), 1, 2);

    assert!(matches!(
        anomaly,
        Some(OrderError::PositionNotFound { position: 1, .. })
    ));
    assert_eq!(doc.order("summer"), Some(&[1, 0][..]));
}

#[test]
fn test_delete_without_any_order_keeps_storage_order() {
    let mut doc = OrderDocument::default();

    let anomaly = doc.apply_delete("summer", &aliases(&["dup-summer", "summer"]), 0, 1);

    assert!(anomaly.is_none());
    assert!(doc.orders.is_empty());
}

#[test]
fn test_delete_adjusts_alias_order_when_collection_has_none() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("dup-summer".to_string(), vec![2, 0, 1]);

    let anomaly = doc.apply_delete("summer", &aliases(&["dup-summer", "summer"]), 0, 2);

    assert!(anomaly.is_none());
    assert_eq!(doc.order("dup-summer"), Some(&[1, 0][..]));
    assert_eq!(doc.order("summer"), doc.order("dup-summer"));
}

#[test]
fn test_insert_builds_on_alias_order() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("winter".to_string(), vec![2, 1, 0]);

    let next = doc.apply_insert("dup-winter", &aliases(&["dup-winter", "winter"]), 4, &[]);

    assert_eq!(next, vec![3, 2, 1, 0]);
    assert_eq!(doc.order("winter"), Some(&[3, 2, 1, 0][..]));
}

#[test]
fn test_tags_of_aliases_follow_their_storage() {
    let mut doc = OrderDocument::default();
    doc.set_tag("dup-summer", PLACEHOLDER_TAG, 1, true);
    let group = aliases(&["dup-summer", "summer"]);

    doc.apply_insert("summer", &group, 3, &["cover".to_string()]);
    assert_eq!(doc.tags_at("dup-summer", 2), vec![PLACEHOLDER_TAG.to_string()]);
    assert_eq!(doc.tags_at("summer", 0), vec!["cover".to_string()]);

    doc.apply_delete("summer", &group, 0, 2);
    assert_eq!(doc.tags_at("dup-summer", 1), vec![PLACEHOLDER_TAG.to_string()]);
    assert!(doc.tags_at("summer", 0).is_empty());
}

#[test]
fn test_copy_collection() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("winter".to_string(), vec![1, 0]);
    doc.set_tag("winter", PLACEHOLDER_TAG, 0, true);

    doc.copy_collection("winter", "dup-winter");
    doc.copy_collection("autumn", "dup-autumn");

    assert_eq!(doc.order("dup-winter"), Some(&[1, 0][..]));
    assert_eq!(doc.tags_at("dup-winter", 0), vec![PLACEHOLDER_TAG.to_string()]);
    assert_eq!(doc.order("dup-autumn"), None);
}

#[test]
fn test_stale_reorder_keeps_previous_order() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("summer".to_string(), vec![4, 3, 2, 1, 0]);

    let result = doc.apply_reorder(
        "summer",
        &aliases(&["summer"]),
        &[7, 0, 1, 2, 3],
        ReorderCheck::Validate { storage_length: 5 },
    );

    assert!(matches!(result, Err(OrderError::StaleOrderRejected { .. })));
    assert_eq!(doc.order("summer"), Some(&[4, 3, 2, 1, 0][..]));
}

#[test]
fn test_reorder_writes_through_aliases() {
    let mut doc = OrderDocument::default();
    let group = aliases(&["dup-summer", "summer"]);
    doc.apply_reorder(
        "dup-summer",
        &group,
        &[1, 2, 0],
        ReorderCheck::Validate { storage_length: 3 },
    )
    .unwrap();
    assert_eq!(doc.order("summer"), Some(&[1, 2, 0][..]));
    assert_eq!(doc.order("dup-summer"), Some(&[1, 2, 0][..]));
}

#[test]
fn test_normalize_only_touches_existing_orders() {
    let mut doc = OrderDocument::default();
    assert_eq!(doc.apply_normalize("summer", &aliases(&["summer"]), 3), None);

    doc.orders.insert("summer".to_string(), vec![2, 2, 9, 0]);
    assert_eq!(
        doc.apply_normalize("summer", &aliases(&["summer"]), 3),
        Some(vec![2, 0])
    );
}

#[test]
fn test_remove_collection() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("summer".to_string(), vec![0]);
    doc.set_tag("summer", PLACEHOLDER_TAG, 0, true);

    doc.remove_collection("summer");

    assert!(doc.orders.is_empty());
    assert!(doc.tags.is_empty());
}

#[test]
fn test_set_tag_clear() {
    let mut doc = OrderDocument::default();
    doc.set_tag("summer", "featured", 2, true);
    doc.set_tag("summer", "featured", 2, false);
    assert!(doc.tagged("summer", "featured").is_empty());
    assert!(doc.tags.is_empty());
}

#[test]
fn test_document_json_shape() {
    let mut doc = OrderDocument::default();
    doc.orders.insert("summer".to_string(), vec![1, 0]);
    let json = serde_json::to_string(&doc).unwrap();
    assert_eq!(json, r#"{"orders":{"summer":[1,0]}}"#);

    let parsed: OrderDocument = serde_json::from_str(r#"{"orders":{"a":[0]}}"#).unwrap();
    assert_eq!(parsed.order("a"), Some(&[0][..]));
}
