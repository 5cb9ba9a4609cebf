//! In-process store used when no database is configured, and by tests.
//!
//! Each operation runs under one lock, which gives the same single-record
//! atomicity the Postgres store has. Failures can be injected per operation
//! with [`MemoryStore::fail`].

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::{AthleteStore, OrgStore, SessionStore, UserStore};
use crate::dto::{athlete::CreateAthleteRequest, org::CreateOrgRequest};
use crate::error::{Result, StorageError};
use crate::models::{Athlete, DetailKind, Org, Picture, Session, UpdateResult, User};

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    ListUsers,
    FindUser,
    UpdateUser,
    LinkDetail,
    InsertDetail,
    DeleteDetail,
    FindSession,
    UpdateSession,
}

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    orgs: HashMap<Uuid, Org>,
    athletes: HashMap<Uuid, Athlete>,
    sessions: HashMap<String, Session>,
    faults: HashSet<Fault>,
}

impl Collections {
    fn check(&self, fault: Fault) -> Result<()> {
        if self.faults.contains(&fault) {
            return Err(StorageError::Unavailable(format!("injected {:?} failure", fault)));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every subsequent call of `fault`'s operation fail until healed.
    pub fn fail(&self, fault: Fault) {
        self.lock().faults.insert(fault);
    }

    pub fn heal(&self, fault: Fault) {
        self.lock().faults.remove(&fault);
    }

    pub fn insert_user(&self, user: User) {
        self.lock().users.insert(user.user_id, user);
    }

    pub fn insert_session(&self, session: Session) {
        self.lock()
            .sessions
            .insert(session.session_id.clone(), session);
    }

    pub fn user(&self, user_id: Uuid) -> Option<User> {
        self.lock().users.get(&user_id).cloned()
    }

    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.lock().sessions.get(session_id).cloned()
    }

    pub fn org(&self, org_id: Uuid) -> Option<Org> {
        self.lock().orgs.get(&org_id).cloned()
    }

    pub fn athlete(&self, athlete_id: Uuid) -> Option<Athlete> {
        self.lock().athletes.get(&athlete_id).cloned()
    }

    pub fn org_count(&self) -> usize {
        self.lock().orgs.len()
    }

    pub fn athlete_count(&self) -> usize {
        self.lock().athletes.len()
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let inner = self.lock();
        inner.check(Fault::ListUsers)?;

        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(users)
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User> {
        let inner = self.lock();
        inner.check(Fault::FindUser)?;
        inner
            .users
            .get(&user_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn finish_profile(&self, user_id: Uuid, name: &str, bio: &str) -> Result<UpdateResult> {
        let mut inner = self.lock();
        inner.check(Fault::UpdateUser)?;

        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(UpdateResult::default());
        };
        let modified = user.name != name || user.bio != bio || !user.finished;
        user.name = name.to_string();
        user.bio = bio.to_string();
        user.finished = true;

        Ok(UpdateResult::new(1, u64::from(modified)))
    }

    async fn update_picture(&self, user_id: Uuid, picture: &Picture) -> Result<UpdateResult> {
        let mut inner = self.lock();
        inner.check(Fault::UpdateUser)?;

        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(UpdateResult::default());
        };
        let modified = user.picture.as_ref() != Some(picture);
        user.picture = Some(picture.clone());

        Ok(UpdateResult::new(1, u64::from(modified)))
    }

    async fn link_detail(
        &self,
        user_id: Uuid,
        kind: DetailKind,
        detail_id: Uuid,
    ) -> Result<UpdateResult> {
        let mut inner = self.lock();
        inner.check(Fault::LinkDetail)?;

        let user = inner.users.get_mut(&user_id).ok_or(StorageError::NotFound)?;
        if !user.can_attach(kind) {
            return Err(StorageError::ConstraintViolation(format!(
                "user {} can no longer be linked to an {}",
                user_id, kind
            )));
        }
        match kind {
            DetailKind::Org => user.org_id = Some(detail_id),
            DetailKind::Athlete => user.athlete_id = Some(detail_id),
        }

        Ok(UpdateResult::new(1, 1))
    }
}

#[async_trait]
impl OrgStore for MemoryStore {
    async fn insert_org(&self, request: &CreateOrgRequest) -> Result<Org> {
        let mut inner = self.lock();
        inner.check(Fault::InsertDetail)?;

        let org = Org {
            org_id: Uuid::new_v4(),
            official: false,
            country: request.country.clone(),
            email: request.email.clone(),
            city: request.city.clone(),
            website: request.website.clone(),
            sport: request.sport.clone(),
            sponsors: request.sponsors.clone(),
            created_at: now(),
        };
        inner.orgs.insert(org.org_id, org.clone());
        Ok(org)
    }

    async fn delete_org(&self, org_id: Uuid) -> Result<()> {
        let mut inner = self.lock();
        inner.check(Fault::DeleteDetail)?;
        inner
            .orgs
            .remove(&org_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl AthleteStore for MemoryStore {
    async fn insert_athlete(&self, request: &CreateAthleteRequest) -> Result<Athlete> {
        let mut inner = self.lock();
        inner.check(Fault::InsertDetail)?;

        let athlete = Athlete {
            athlete_id: Uuid::new_v4(),
            nationality: request.nationality.clone(),
            gender: request.gender.clone(),
            sport: request.sport.clone(),
            sponsors: request.sponsors.clone(),
            current_team: request.current_team.clone(),
            height: request.height,
            weight: request.weight,
            achievements: request.achievements.clone(),
            contact: request.contact.clone(),
            created_at: now(),
        };
        inner.athletes.insert(athlete.athlete_id, athlete.clone());
        Ok(athlete)
    }

    async fn delete_athlete(&self, athlete_id: Uuid) -> Result<()> {
        let mut inner = self.lock();
        inner.check(Fault::DeleteDetail)?;
        inner
            .athletes
            .remove(&athlete_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_active_session(&self, session_id: &str) -> Result<Session> {
        let inner = self.lock();
        inner.check(Fault::FindSession)?;
        inner
            .sessions
            .get(session_id)
            .filter(|session| session.is_active_at(now()))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn update_session_picture(
        &self,
        session_id: &str,
        picture: &Picture,
    ) -> Result<UpdateResult> {
        let mut inner = self.lock();
        inner.check(Fault::UpdateSession)?;

        let session = inner
            .sessions
            .get_mut(session_id)
            .ok_or(StorageError::NotFound)?;
        let modified = session.picture.as_ref() != Some(picture);
        session.picture = Some(picture.clone());

        Ok(UpdateResult::new(1, u64::from(modified)))
    }
}
