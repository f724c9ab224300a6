//! Repository layer over the sea-orm entities.

pub mod complaint;
pub mod user;

pub use complaint::{CategoryCount, ComplaintFilter, ComplaintRepository, StatusCategoryCount};
pub use user::UserRepository;
