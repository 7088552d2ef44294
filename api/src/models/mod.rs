pub mod response;
pub mod story;
pub mod user;
