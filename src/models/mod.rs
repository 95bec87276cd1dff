pub mod details;
pub mod response;
pub mod task;
pub mod user;
