//! Document (attachment) aggregate

pub mod model;
pub mod repository;

pub use model::Document;
pub use repository::DocumentRepository;
