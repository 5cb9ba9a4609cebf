//! Persistence gateway used by the web layer.
//!
//! Every method is a single-record operation; nothing here spans more than one
//! table, so callers that need several writes must sequence (and if needed
//! compensate) them themselves.

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::{athlete::CreateAthleteRequest, org::CreateOrgRequest};
use crate::error::Result;
use crate::models::{Athlete, DetailKind, Org, Picture, Session, UpdateResult, User};

pub mod memory;
mod postgres;

pub use memory::{Fault, MemoryStore};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Fails with `StorageError::NotFound` when no user has this id.
    async fn find_user(&self, user_id: Uuid) -> Result<User>;

    /// Sets name and bio and marks the profile finished in one write.
    async fn finish_profile(&self, user_id: Uuid, name: &str, bio: &str) -> Result<UpdateResult>;

    async fn update_picture(&self, user_id: Uuid, picture: &Picture) -> Result<UpdateResult>;

    /// Stores `detail_id` as the user's `kind` reference, but only while
    /// `User::can_attach(kind)` still holds. A user that gained a reference in
    /// the meantime yields `StorageError::ConstraintViolation`.
    async fn link_detail(&self, user_id: Uuid, kind: DetailKind, detail_id: Uuid)
    -> Result<UpdateResult>;
}

#[async_trait]
pub trait OrgStore: Send + Sync {
    /// Inserts a new, non-official org.
    async fn insert_org(&self, request: &CreateOrgRequest) -> Result<Org>;

    async fn delete_org(&self, org_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait AthleteStore: Send + Sync {
    async fn insert_athlete(&self, request: &CreateAthleteRequest) -> Result<Athlete>;

    async fn delete_athlete(&self, athlete_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolves an unexpired session, `StorageError::NotFound` otherwise.
    async fn find_active_session(&self, session_id: &str) -> Result<Session>;

    async fn update_session_picture(&self, session_id: &str, picture: &Picture)
    -> Result<UpdateResult>;
}

/// Everything the HTTP layer needs from a backing store.
pub trait ProfileStore: UserStore + OrgStore + AthleteStore + SessionStore {}

impl<T> ProfileStore for T where T: UserStore + OrgStore + AthleteStore + SessionStore {}
