use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RebalanceError {
    #[error("Asset {0} is already in the portfolio")]
    DuplicateSymbol(String),

    #[error("Asset {0} is not in the portfolio")]
    UnknownSymbol(String),
}
