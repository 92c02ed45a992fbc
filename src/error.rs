use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExprError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("type constraint violated: {0}")]
    TypeConstraint(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}
