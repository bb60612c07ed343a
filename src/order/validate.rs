use super::OrderError;

/// Check a client-submitted order against the collection's current storage
/// length.
///
/// Every value must lie in `[0, storage_length - 1]`. A value beyond that
/// range means the client built its order before a deletion it has not seen
/// yet, so the whole submission is refused rather than merged.
pub fn validate_reorder(
    collection_id: &str,
    new_order: &[usize],
    storage_length: usize,
) -> Result<(), OrderError> {
    let offending: Vec<usize> = new_order
        .iter()
        .copied()
        .filter(|&p| p >= storage_length)
        .collect();
    if offending.is_empty() {
        Ok(())
    } else {
        Err(OrderError::StaleOrderRejected {
            collection_id: collection_id.to_string(),
            offending,
            storage_length,
        })
    }
}
