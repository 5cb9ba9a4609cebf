use storage::{
    ProfileStore,
    dto::{
        athlete::CreateAthleteRequest,
        org::CreateOrgRequest,
        user::{FinishProfileRequest, UpdatePictureRequest},
        validation::OrderedValidate,
    },
    error::StorageError,
    models::{Athlete, DetailKind, Org, UpdateResult, User},
    store::{AthleteStore, OrgStore, SessionStore, UserStore},
};
use uuid::Uuid;

use crate::error::{Operation, Rollback, WebError, WebResult};

/// Request bodies reach the services still unparsed so each operation can
/// report a bad body at its own step.
pub type Payload<T> = WebResult<T>;

pub fn parse_user_id(raw: &str) -> WebResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| WebError::InvalidId(e.to_string()))
}

/// List all users
pub async fn list_users(store: &dyn ProfileStore) -> WebResult<Vec<User>> {
    let users = store
        .list_users()
        .await
        .map_err(WebError::persistence(Operation::ListUsers))?;

    if users.is_empty() {
        return Err(WebError::Empty);
    }

    Ok(users)
}

/// Get user by id
pub async fn get_user(store: &dyn ProfileStore, raw_id: &str) -> WebResult<User> {
    let user_id = parse_user_id(raw_id)?;

    store
        .find_user(user_id)
        .await
        .map_err(WebError::persistence(Operation::FetchUser))
}

/// Set name and bio once and mark the profile finished
pub async fn finish_profile(
    store: &dyn ProfileStore,
    raw_id: &str,
    body: Payload<FinishProfileRequest>,
) -> WebResult<UpdateResult> {
    let user_id = parse_user_id(raw_id)?;

    let user = store
        .find_user(user_id)
        .await
        .map_err(WebError::persistence(Operation::FetchUser))?;

    if user.finished {
        return Err(WebError::AlreadyFinished);
    }

    let request = body?;
    request.validate_in_order()?;

    let result = store
        .finish_profile(user_id, &request.name, &request.bio)
        .await
        .map_err(WebError::persistence(Operation::UpdateUser))?;

    tracing::info!(%user_id, "Profile finished");
    Ok(result)
}

/// Replace the user's picture, then copy it onto the caller's session.
///
/// A failed session copy is reported but the user keeps the new picture.
pub async fn update_picture(
    store: &dyn ProfileStore,
    session_id: &str,
    raw_id: &str,
    body: Payload<UpdatePictureRequest>,
) -> WebResult<UpdateResult> {
    let user_id = parse_user_id(raw_id)?;

    let session = store
        .find_active_session(session_id)
        .await
        .map_err(WebError::Unauthenticated)?;

    store
        .find_user(user_id)
        .await
        .map_err(WebError::persistence(Operation::FetchUser))?;

    let picture = body?.into_picture()?;

    let result = store
        .update_picture(user_id, &picture)
        .await
        .map_err(WebError::persistence(Operation::UpdateUser))?;

    if let Err(e) = store
        .update_session_picture(&session.session_id, &picture)
        .await
    {
        tracing::warn!(
            %user_id,
            "User picture updated but session copy failed, records now differ: {}",
            e
        );
        return Err(WebError::persistence(Operation::UpdateSession)(e));
    }

    Ok(result)
}

/// Create an org and link it to the user
pub async fn attach_org(
    store: &dyn ProfileStore,
    raw_id: &str,
    body: Payload<CreateOrgRequest>,
) -> WebResult<Org> {
    let user_id = parse_user_id(raw_id)?;

    let mut request = body?;
    request.normalize();
    request.validate_in_order()?;

    ensure_can_attach(store, user_id, DetailKind::Org).await?;

    let org = store
        .insert_org(&request)
        .await
        .map_err(WebError::persistence(Operation::InsertDetail(DetailKind::Org)))?;

    link_or_rollback(store, user_id, DetailKind::Org, org.org_id).await?;

    tracing::info!(%user_id, org_id = %org.org_id, "Org attached");
    Ok(org)
}

/// Create an athlete profile and link it to the user
pub async fn attach_athlete(
    store: &dyn ProfileStore,
    raw_id: &str,
    body: Payload<CreateAthleteRequest>,
) -> WebResult<Athlete> {
    let user_id = parse_user_id(raw_id)?;

    let mut request = body?;
    request.normalize();
    request.validate_in_order()?;

    ensure_can_attach(store, user_id, DetailKind::Athlete).await?;

    let athlete = store
        .insert_athlete(&request)
        .await
        .map_err(WebError::persistence(Operation::InsertDetail(
            DetailKind::Athlete,
        )))?;

    link_or_rollback(store, user_id, DetailKind::Athlete, athlete.athlete_id).await?;

    tracing::info!(%user_id, athlete_id = %athlete.athlete_id, "Athlete attached");
    Ok(athlete)
}

async fn ensure_can_attach(
    store: &dyn ProfileStore,
    user_id: Uuid,
    kind: DetailKind,
) -> WebResult<()> {
    let user = store
        .find_user(user_id)
        .await
        .map_err(WebError::persistence(Operation::FetchUser))?;

    if !user.can_attach(kind) {
        return Err(WebError::AlreadyAttached(kind));
    }

    Ok(())
}

/// Link step of an attach. If it fails the freshly inserted detail record is
/// deleted again; a failed delete is reported next to the link error.
async fn link_or_rollback(
    store: &dyn ProfileStore,
    user_id: Uuid,
    kind: DetailKind,
    detail_id: Uuid,
) -> WebResult<()> {
    let link_error = match store.link_detail(user_id, kind, detail_id).await {
        Ok(_) => return Ok(()),
        Err(e) => e,
    };

    tracing::warn!(
        %user_id,
        %detail_id,
        "Linking {} failed, deleting it: {}",
        kind,
        link_error
    );

    let rollback = match delete_detail(store, kind, detail_id).await {
        Ok(()) => Rollback::Completed,
        Err(e) => {
            tracing::error!(%detail_id, "Rollback of {} failed, record is orphaned: {}", kind, e);
            Rollback::Failed(e)
        }
    };

    match (link_error, rollback) {
        // Lost the race against a concurrent attach.
        (StorageError::ConstraintViolation(_), Rollback::Completed) => {
            Err(WebError::AlreadyAttached(kind))
        }
        (source, rollback) => Err(WebError::LinkFailed {
            kind,
            source,
            rollback,
        }),
    }
}

async fn delete_detail(
    store: &dyn ProfileStore,
    kind: DetailKind,
    detail_id: Uuid,
) -> Result<(), StorageError> {
    match kind {
        DetailKind::Org => store.delete_org(detail_id).await,
        DetailKind::Athlete => store.delete_athlete(detail_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::{
        MemoryStore,
        models::{Picture, Session},
        store::Fault,
    };

    fn org_request() -> CreateOrgRequest {
        CreateOrgRequest {
            country: "Guatemala".into(),
            email: "Contact@Club.GT".into(),
            city: "Antigua".into(),
            website: "https://club.gt".into(),
            sport: vec!["football".into()],
            sponsors: vec!["Acme".into()],
        }
    }

    fn athlete_request() -> CreateAthleteRequest {
        CreateAthleteRequest {
            nationality: "Guatemalan".into(),
            gender: "F".into(),
            sport: "athletics".into(),
            sponsors: vec![],
            current_team: "Xelajú".into(),
            height: 170,
            weight: 130,
            achievements: "National 400m record".into(),
            contact: "runner@example.com".into(),
        }
    }

    fn store_with_user() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = User::new();
        store.insert_user(user.clone());
        (store, user)
    }

    fn id(user: &User) -> String {
        user.user_id.to_string()
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected_before_store_access() {
        let store = MemoryStore::new();
        // Any store access would fail with Unavailable.
        for fault in [
            Fault::FindUser,
            Fault::UpdateUser,
            Fault::InsertDetail,
            Fault::FindSession,
        ] {
            store.fail(fault);
        }

        for raw in ["", "123", "not-a-uuid", "507f1f77bcf86cd799439011"] {
            assert!(matches!(get_user(&store, raw).await, Err(WebError::InvalidId(_))));
            assert!(matches!(
                finish_profile(&store, raw, Ok(FinishProfileRequest::default())).await,
                Err(WebError::InvalidId(_))
            ));
            assert!(matches!(
                update_picture(&store, "session", raw, Ok(UpdatePictureRequest::default())).await,
                Err(WebError::InvalidId(_))
            ));
            assert!(matches!(
                attach_org(&store, raw, Ok(org_request())).await,
                Err(WebError::InvalidId(_))
            ));
            assert!(matches!(
                attach_athlete(&store, raw, Ok(athlete_request())).await,
                Err(WebError::InvalidId(_))
            ));
        }
        assert_eq!(store.org_count(), 0);
        assert_eq!(store.athlete_count(), 0);
    }

    #[tokio::test]
    async fn test_list_users_empty_collection() {
        let store = MemoryStore::new();
        assert!(matches!(list_users(&store).await, Err(WebError::Empty)));

        store.insert_user(User::new());
        assert_eq!(list_users(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_users_store_failure() {
        let store = MemoryStore::new();
        store.fail(Fault::ListUsers);
        assert!(matches!(
            list_users(&store).await,
            Err(WebError::Persistence {
                op: Operation::ListUsers,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_lookup_failure() {
        let store = MemoryStore::new();
        let err = get_user(&store, &Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WebError::Persistence {
                op: Operation::FetchUser,
                source: StorageError::NotFound
            }
        ));
    }

    #[tokio::test]
    async fn test_attach_org_lowercases_email_and_links() {
        let (store, user) = store_with_user();

        let org = attach_org(&store, &id(&user), Ok(org_request()))
            .await
            .unwrap();

        assert_eq!(org.email, "contact@club.gt");
        assert!(!org.official);
        assert_eq!(store.user(user.user_id).unwrap().org_id, Some(org.org_id));
        assert_eq!(store.org(org.org_id), Some(org));
    }

    #[tokio::test]
    async fn test_attach_org_twice_is_rejected() {
        let (store, user) = store_with_user();

        attach_org(&store, &id(&user), Ok(org_request()))
            .await
            .unwrap();
        let err = attach_org(&store, &id(&user), Ok(org_request()))
            .await
            .unwrap_err();

        assert!(matches!(err, WebError::AlreadyAttached(DetailKind::Org)));
        assert_eq!(store.org_count(), 1);
    }

    #[tokio::test]
    async fn test_attach_athlete_twice_is_rejected() {
        let (store, user) = store_with_user();

        attach_athlete(&store, &id(&user), Ok(athlete_request()))
            .await
            .unwrap();
        let err = attach_athlete(&store, &id(&user), Ok(athlete_request()))
            .await
            .unwrap_err();

        assert!(matches!(err, WebError::AlreadyAttached(DetailKind::Athlete)));
        assert_eq!(store.athlete_count(), 1);
    }

    #[tokio::test]
    async fn test_athlete_blocked_by_existing_org() {
        let (store, user) = store_with_user();

        attach_org(&store, &id(&user), Ok(org_request()))
            .await
            .unwrap();
        let err = attach_athlete(&store, &id(&user), Ok(athlete_request()))
            .await
            .unwrap_err();

        assert!(matches!(err, WebError::AlreadyAttached(DetailKind::Athlete)));
        assert_eq!(store.athlete_count(), 0);
    }

    #[tokio::test]
    async fn test_org_not_blocked_by_existing_athlete() {
        let (store, user) = store_with_user();

        let athlete = attach_athlete(&store, &id(&user), Ok(athlete_request()))
            .await
            .unwrap();
        let org = attach_org(&store, &id(&user), Ok(org_request()))
            .await
            .unwrap();

        let stored = store.user(user.user_id).unwrap();
        assert_eq!(stored.athlete_id, Some(athlete.athlete_id));
        assert_eq!(stored.org_id, Some(org.org_id));
    }

    #[tokio::test]
    async fn test_link_failure_rolls_back_insert() {
        let (store, user) = store_with_user();
        store.fail(Fault::LinkDetail);

        let err = attach_org(&store, &id(&user), Ok(org_request()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WebError::LinkFailed {
                kind: DetailKind::Org,
                source: StorageError::Unavailable(_),
                rollback: Rollback::Completed,
            }
        ));
        assert_eq!(store.org_count(), 0, "inserted org must not be orphaned");
        assert_eq!(store.user(user.user_id).unwrap().org_id, None);
    }

    #[tokio::test]
    async fn test_failed_rollback_reports_both_errors() {
        let (store, user) = store_with_user();
        store.fail(Fault::LinkDetail);
        store.fail(Fault::DeleteDetail);

        let err = attach_athlete(&store, &id(&user), Ok(athlete_request()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WebError::LinkFailed {
                kind: DetailKind::Athlete,
                source: StorageError::Unavailable(_),
                rollback: Rollback::Failed(StorageError::Unavailable(_)),
            }
        ));
        assert_eq!(store.athlete_count(), 1);
    }

    #[tokio::test]
    async fn test_athlete_height_and_weight_ranges() {
        let (store, user) = store_with_user();

        for (height, weight) in [(99, 150), (201, 150), (150, 99), (150, 401)] {
            let request = CreateAthleteRequest {
                height,
                weight,
                ..athlete_request()
            };
            let err = attach_athlete(&store, &id(&user), Ok(request))
                .await
                .unwrap_err();
            assert!(
                matches!(err, WebError::ValidationFailed(_)),
                "height {} weight {}",
                height,
                weight
            );
        }
        assert_eq!(store.athlete_count(), 0);
    }

    #[tokio::test]
    async fn test_validation_runs_before_user_lookup() {
        let store = MemoryStore::new();
        store.fail(Fault::FindUser);
        let request = CreateOrgRequest {
            sport: vec![],
            ..org_request()
        };

        let err = attach_org(&store, &Uuid::new_v4().to_string(), Ok(request))
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::ValidationFailed(v) if v.field == "sport"));
    }

    #[tokio::test]
    async fn test_insert_failure_leaves_user_untouched() {
        let (store, user) = store_with_user();
        store.fail(Fault::InsertDetail);

        let err = attach_org(&store, &id(&user), Ok(org_request()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WebError::Persistence {
                op: Operation::InsertDetail(DetailKind::Org),
                ..
            }
        ));
        assert_eq!(store.user(user.user_id).unwrap().org_id, None);
    }

    #[tokio::test]
    async fn test_lost_link_race_rolls_back_and_reports_already_attached() {
        let (store, user) = store_with_user();

        // A concurrent attach won between the guard check and the link step.
        let winner = store.insert_org(&org_request()).await.unwrap();
        let loser = store.insert_org(&org_request()).await.unwrap();
        store
            .link_detail(user.user_id, DetailKind::Org, winner.org_id)
            .await
            .unwrap();

        let err = link_or_rollback(&store, user.user_id, DetailKind::Org, loser.org_id)
            .await
            .unwrap_err();

        assert!(matches!(err, WebError::AlreadyAttached(DetailKind::Org)));
        assert!(store.org(loser.org_id).is_none());
        assert_eq!(store.user(user.user_id).unwrap().org_id, Some(winner.org_id));
    }

    #[tokio::test]
    async fn test_finish_profile_twice() {
        let (store, user) = store_with_user();
        let request = FinishProfileRequest {
            name: "Ana".into(),
            bio: "Sprinter".into(),
        };

        let result = finish_profile(&store, &id(&user), Ok(request.clone()))
            .await
            .unwrap();
        assert_eq!(result, UpdateResult::new(1, 1));

        let stored = store.user(user.user_id).unwrap();
        assert!(stored.finished);
        assert_eq!(stored.name, "Ana");

        store.fail(Fault::UpdateUser);
        let err = finish_profile(&store, &id(&user), Ok(request))
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::AlreadyFinished));
    }

    #[tokio::test]
    async fn test_finish_profile_requires_name_and_bio() {
        let (store, user) = store_with_user();
        let err = finish_profile(
            &store,
            &id(&user),
            Ok(FinishProfileRequest {
                name: "Ana".into(),
                bio: String::new(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, WebError::ValidationFailed(v) if v.message == "Bio is required"));
        assert!(!store.user(user.user_id).unwrap().finished);
    }

    #[tokio::test]
    async fn test_finish_profile_propagates_update_failure() {
        let (store, user) = store_with_user();
        store.fail(Fault::UpdateUser);

        let err = finish_profile(
            &store,
            &id(&user),
            Ok(FinishProfileRequest {
                name: "Ana".into(),
                bio: "Sprinter".into(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            WebError::Persistence {
                op: Operation::UpdateUser,
                ..
            }
        ));
    }

    fn picture_request() -> UpdatePictureRequest {
        serde_json::from_value(serde_json::json!({
            "picture": {"pictureKey": "avatars/ana.png", "pictureURL": "https://cdn.example.com/avatars/ana.png"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_update_picture_syncs_session() {
        let (store, user) = store_with_user();
        let session = Session::new(user.user_id, chrono::Duration::hours(1));
        store.insert_session(session.clone());

        let result = update_picture(&store, &session.session_id, &id(&user), Ok(picture_request()))
            .await
            .unwrap();
        assert_eq!(result.matched_count, 1);

        let expected = Picture::new("avatars/ana.png", "https://cdn.example.com/avatars/ana.png");
        assert_eq!(store.user(user.user_id).unwrap().picture, Some(expected.clone()));
        assert_eq!(store.session(&session.session_id).unwrap().picture, Some(expected));
    }

    #[tokio::test]
    async fn test_update_picture_unknown_session() {
        let (store, user) = store_with_user();

        let err = update_picture(&store, "missing", &id(&user), Ok(picture_request()))
            .await
            .unwrap_err();

        assert!(matches!(err, WebError::Unauthenticated(_)));
        assert!(store.user(user.user_id).unwrap().picture.is_none());
    }

    #[tokio::test]
    async fn test_session_sync_failure_keeps_user_picture() {
        let (store, user) = store_with_user();
        let session = Session::new(user.user_id, chrono::Duration::hours(1));
        store.insert_session(session.clone());
        store.fail(Fault::UpdateSession);

        let err = update_picture(&store, &session.session_id, &id(&user), Ok(picture_request()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WebError::Persistence {
                op: Operation::UpdateSession,
                ..
            }
        ));
        assert!(store.user(user.user_id).unwrap().picture.is_some());
        assert!(store.session(&session.session_id).unwrap().picture.is_none());
    }
}
