//! Integration tests: loan rules against a real SQLite database, and the
//! HTTP surface through the in-process router.

mod api_tests;
