//! Request handlers, grouped by resource

pub mod auth;
pub mod authors;
pub mod books;
