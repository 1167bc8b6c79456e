pub mod employee;
pub mod exchange;
pub mod file;
pub mod membership;
pub mod organization;
pub mod timestamp;

pub use employee::*;
pub use exchange::*;
pub use file::*;
pub use membership::*;
pub use organization::*;
