pub mod athlete;
pub mod org;
pub mod session;
pub mod user;
