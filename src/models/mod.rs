//! Data models for the catalog and lending desk

pub mod author;
pub mod book;
pub mod borrow;
pub mod member;

// Re-export commonly used types
pub use author::{Author, AuthorSummary};
pub use book::{Book, BookDetails};
pub use borrow::{BorrowItem, BorrowItemDetails, BorrowTransaction, TransactionDetails};
pub use member::{Member, MemberSummary};
