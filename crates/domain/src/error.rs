//! Domain error types.

use common::{CartId, IdError, ProductId};
use thiserror::Error;

use crate::cart::CartError;
use crate::money::MoneyError;
use crate::order::OrderError;
use crate::product::ProductError;
use crate::repository::RepositoryError;

/// Errors returned by the application service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A command carried a malformed identifier or out-of-range value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cart not found: {0}")]
    CartNotFound(CartId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<IdError> for DomainError {
    fn from(e: IdError) -> Self {
        DomainError::InvalidArgument(e.to_string())
    }
}

/// Flat classification of [`DomainError`], for callers that map failures to
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    CartNotFound,
    ProductNotFound,
    ItemNotFound,
    InsufficientStock,
    InvalidQuantity,
    EmptyCart,
    InvalidStatusTransition,
    CurrencyMismatch,
    NegativeResult,
    InvalidAmount,
    InvalidCurrency,
    ConcurrencyConflict,
    Storage,
}

impl ErrorKind {
    /// Returns a stable machine-readable code, e.g. `CART_NOT_FOUND`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::CartNotFound => "CART_NOT_FOUND",
            ErrorKind::ProductNotFound => "PRODUCT_NOT_FOUND",
            ErrorKind::ItemNotFound => "ITEM_NOT_FOUND",
            ErrorKind::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorKind::InvalidQuantity => "INVALID_QUANTITY",
            ErrorKind::EmptyCart => "EMPTY_CART",
            ErrorKind::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            ErrorKind::CurrencyMismatch => "CURRENCY_MISMATCH",
            ErrorKind::NegativeResult => "NEGATIVE_RESULT",
            ErrorKind::InvalidAmount => "INVALID_AMOUNT",
            ErrorKind::InvalidCurrency => "INVALID_CURRENCY",
            ErrorKind::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            ErrorKind::Storage => "STORAGE_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DomainError::CartNotFound(_) => ErrorKind::CartNotFound,
            DomainError::ProductNotFound(_) => ErrorKind::ProductNotFound,
            DomainError::Cart(e) => match e {
                CartError::InvalidQuantity { .. } => ErrorKind::InvalidQuantity,
                CartError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
                CartError::ItemNotFound { .. } => ErrorKind::ItemNotFound,
                CartError::Money(e) => money_kind(e),
            },
            DomainError::Order(e) => match e {
                OrderError::EmptyCart { .. } => ErrorKind::EmptyCart,
                OrderError::InvalidCustomerEmail(_) | OrderError::UnknownStatus(_) => {
                    ErrorKind::InvalidArgument
                }
                OrderError::InvalidStatusTransition { .. } => ErrorKind::InvalidStatusTransition,
                OrderError::Money(e) => money_kind(e),
            },
            DomainError::Product(ProductError::EmptyName) => ErrorKind::InvalidArgument,
            DomainError::Money(e) => money_kind(e),
            DomainError::Repository(e) => match e {
                RepositoryError::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
                RepositoryError::Storage(_) => ErrorKind::Storage,
            },
        }
    }
}

fn money_kind(e: &MoneyError) -> ErrorKind {
    match e {
        MoneyError::InvalidAmount(_) => ErrorKind::InvalidAmount,
        MoneyError::InvalidCurrency(_) => ErrorKind::InvalidCurrency,
        MoneyError::CurrencyMismatch { .. } => ErrorKind::CurrencyMismatch,
        MoneyError::NegativeResult { .. } => ErrorKind::NegativeResult,
    }
}
