pub mod api_types;
pub mod client;
pub mod error;
pub mod types;

pub use client::NewsClient;
pub use error::FetchError;
pub use types::{Article, Category, CategoryFilter, FetchPage, FetchRequest};
