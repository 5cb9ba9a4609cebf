pub mod athlete;
pub mod org;
pub mod user;
pub mod validation;
