//! Business logic services.

pub mod auth;
pub mod complaint;

pub use auth::{AuthService, AuthenticatedUser, ChangePasswordInput, RegisterInput};
pub use complaint::{ComplaintService, ComplaintStats, CreateComplaintInput, complaints_to_csv};
pub use yellowshield_db::entities::{
    complaint::{Category, ComplaintRole, ComplaintStatus},
    user::UserRole,
};
pub use yellowshield_db::repositories::{CategoryCount, ComplaintFilter};
