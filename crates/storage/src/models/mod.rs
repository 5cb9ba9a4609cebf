mod athlete;
mod org;
mod picture;
mod session;
mod update_result;
mod user;

pub use athlete::Athlete;
pub use org::Org;
pub use picture::Picture;
pub use session::{Session, SessionRow};
pub use update_result::UpdateResult;
pub use user::{DetailKind, User, UserRow};
