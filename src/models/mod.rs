//! Data models for Libris

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use loan::{Loan, UserLoan};
pub use user::User;
