// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod config;
pub mod logging;
pub mod order;
pub mod portfolio;
pub mod records;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, parse_config, ConfigError, PortfolioConfig};
pub use order::{AliasResolver, OrderDocument, OrderError, OrderStore};
pub use portfolio::{
    CreateCollectionResult, DeleteCollectionResult, DeleteItemResult, DisplayedItem, Portfolio,
    PortfolioError, TransferItemResult, UploadItemResult,
};
pub use records::{Catalog, CollectionClassifier, CollectionKind, RecordError, RecordStore};
pub use store::{DocumentStore, FsDocumentStore, MemoryDocumentStore, StoreError, Version, Versioned};
