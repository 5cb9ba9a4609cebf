use async_trait::async_trait;
use uuid::Uuid;

use super::{AthleteStore, OrgStore, SessionStore, UserStore};
use crate::Database;
use crate::dto::{athlete::CreateAthleteRequest, org::CreateOrgRequest};
use crate::error::Result;
use crate::models::{Athlete, DetailKind, Org, Picture, Session, UpdateResult, User};
use crate::repository::{
    athlete::AthleteRepository, org::OrgRepository, session::SessionRepository,
    user::UserRepository,
};

#[async_trait]
impl UserStore for Database {
    async fn list_users(&self) -> Result<Vec<User>> {
        UserRepository::new(self.pool()).list().await
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User> {
        UserRepository::new(self.pool()).find_by_id(user_id).await
    }

    async fn finish_profile(&self, user_id: Uuid, name: &str, bio: &str) -> Result<UpdateResult> {
        UserRepository::new(self.pool())
            .finish_profile(user_id, name, bio)
            .await
    }

    async fn update_picture(&self, user_id: Uuid, picture: &Picture) -> Result<UpdateResult> {
        UserRepository::new(self.pool())
            .update_picture(user_id, picture)
            .await
    }

    async fn link_detail(
        &self,
        user_id: Uuid,
        kind: DetailKind,
        detail_id: Uuid,
    ) -> Result<UpdateResult> {
        UserRepository::new(self.pool())
            .link_detail(user_id, kind, detail_id)
            .await
    }
}

#[async_trait]
impl OrgStore for Database {
    async fn insert_org(&self, request: &CreateOrgRequest) -> Result<Org> {
        OrgRepository::new(self.pool()).create(request).await
    }

    async fn delete_org(&self, org_id: Uuid) -> Result<()> {
        OrgRepository::new(self.pool()).delete(org_id).await
    }
}

#[async_trait]
impl AthleteStore for Database {
    async fn insert_athlete(&self, request: &CreateAthleteRequest) -> Result<Athlete> {
        AthleteRepository::new(self.pool()).create(request).await
    }

    async fn delete_athlete(&self, athlete_id: Uuid) -> Result<()> {
        AthleteRepository::new(self.pool()).delete(athlete_id).await
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn find_active_session(&self, session_id: &str) -> Result<Session> {
        SessionRepository::new(self.pool())
            .find_active(session_id)
            .await
    }

    async fn update_session_picture(
        &self,
        session_id: &str,
        picture: &Picture,
    ) -> Result<UpdateResult> {
        SessionRepository::new(self.pool())
            .update_picture(session_id, picture)
            .await
    }
}
