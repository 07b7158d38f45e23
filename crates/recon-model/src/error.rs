use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconError {
    #[error("item number must not be empty")]
    EmptyItemNumber,
    #[error("store name must not be empty")]
    EmptyStoreName,
    #[error("dictionary already contains an item numbered {0}")]
    DuplicateItemNumber(String),
    #[error("dictionary has no item numbered {0}")]
    UnknownItemNumber(String),
    #[error("dictionary already contains a store with id {0}")]
    DuplicateStoreId(u32),
    #[error("dictionary already contains a store named {0}")]
    DuplicateStoreName(String),
    #[error("dictionary has no store with id {0}")]
    UnknownStoreId(u32),
    #[error("input table has no columns to detect")]
    NoColumns,
    #[error("no rows were retained from the input")]
    EmptyDataset,
    #[error("no stores are currently excluded")]
    NothingExcluded,
    #[error("no stores remain included to receive redistributed quantity")]
    NoIncludedStores,
}

pub type Result<T> = std::result::Result<T, ReconError>;
