pub mod auth;
pub mod employee;
pub mod file;
pub mod resource;
