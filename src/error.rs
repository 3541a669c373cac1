use crate::ids::Id;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DotError {
    #[error("cell {cell} must be added to a record or to another cell before its address is used")]
    UnattachedCell { cell: Id },
    #[error("record {record} has no field {field}")]
    UnknownField { record: Id, field: Id },
    #[error("an edge needs at least two endpoints, got {count}")]
    TooFewEndpoints { count: usize },
    #[error("unknown reference `{key}`")]
    UnknownKey { key: String },
    #[error("key `{key}` is declared more than once")]
    DuplicateKey { key: String },
}

pub type Result<T> = std::result::Result<T, DotError>;
