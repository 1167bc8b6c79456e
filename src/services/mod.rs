pub mod auth;
pub mod employee;
pub mod file;
pub mod resource;
pub mod upload;

pub use auth::AuthService;
pub use employee::EmployeeService;
pub use file::FileService;
pub use resource::{Resource, ResourceService};
