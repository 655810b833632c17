//! Tests for the user service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockUserRepository;

fn stored(id: i64, username: &str, email: &str) -> User {
    let fields = NewUser::try_from_parts(username, email, "Abcdef12").expect("valid user");
    User::new(UserId::new(id), fields)
}

#[fixture]
fn new_user() -> NewUser {
    NewUser::try_from_parts("Misha", "d@mail.ru", "Abcdef12").expect("valid user")
}

fn service(repo: MockUserRepository) -> UserService<MockUserRepository> {
    UserService::new(Arc::new(repo))
}

#[rstest]
#[tokio::test]
async fn create_inserts_when_username_and_email_are_free(new_user: NewUser) {
    let mut repo = MockUserRepository::new();
    repo.expect_find()
        .withf(|filter| {
            matches!(
                filter,
                UserFilter::ByUsernameOrEmail {
                    username: Some(_),
                    email: Some(_),
                    excluding: None,
                }
            )
        })
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|fields| Ok(User::new(UserId::new(1), fields)));

    let created = service(repo)
        .create_user(new_user)
        .await
        .expect("create succeeds");

    assert_eq!(created.id(), UserId::new(1));
    assert_eq!(created.username().as_ref(), "Misha");
}

#[rstest]
#[tokio::test]
async fn create_rejects_taken_username_or_email(new_user: NewUser) {
    let mut repo = MockUserRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_| Ok(Some(stored(3, "Misha", "other@mail.ru"))));
    repo.expect_insert().times(0);

    let error = service(repo)
        .create_user(new_user)
        .await
        .expect_err("conflict");

    assert_eq!(error, Error::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_maps_store_duplicate_to_conflict(new_user: NewUser) {
    let mut repo = MockUserRepository::new();
    repo.expect_find().times(1).return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate()));

    let error = service(repo)
        .create_user(new_user)
        .await
        .expect_err("conflict");

    assert_eq!(error, Error::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_user_is_not_found_before_conflict_check() {
    let mut repo = MockUserRepository::new();
    repo.expect_find()
        .with(eq(UserFilter::ById(UserId::new(99))))
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_update().times(0);

    let changes = UserChanges::try_from_parts(Some("Taken".to_owned()), None, None)
        .expect("valid changes");
    let error = service(repo)
        .update_user(UserId::new(99), changes)
        .await
        .expect_err("not found");

    assert_eq!(error, Error::not_found(UserId::new(99)));
}

#[rstest]
#[tokio::test]
async fn update_excludes_target_from_conflict_check() {
    let mut repo = MockUserRepository::new();
    repo.expect_find()
        .with(eq(UserFilter::ById(UserId::new(5))))
        .times(1)
        .return_once(|_| Ok(Some(stored(5, "Misha", "d@mail.ru"))));
    repo.expect_find()
        .withf(|filter| {
            matches!(
                filter,
                UserFilter::ByUsernameOrEmail {
                    username: Some(_),
                    email: None,
                    excluding: Some(id),
                } if *id == UserId::new(5)
            )
        })
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_update()
        .times(1)
        .return_once(|id, changes| Ok(stored(id.get(), "Misha", "d@mail.ru").with_changes(changes)));

    let changes =
        UserChanges::try_from_parts(Some("Misha".to_owned()), None, None).expect("valid changes");
    let updated = service(repo)
        .update_user(UserId::new(5), changes)
        .await
        .expect("update succeeds");

    assert_eq!(updated.username().as_ref(), "Misha");
}

#[rstest]
#[tokio::test]
async fn update_rejects_username_held_by_another_user() {
    let mut repo = MockUserRepository::new();
    let mut calls = 0;
    repo.expect_find().times(2).returning(move |_| {
        calls += 1;
        Ok(Some(if calls == 1 {
            stored(5, "Misha", "d@mail.ru")
        } else {
            stored(6, "Grisha", "g@mail.ru")
        }))
    });
    repo.expect_update().times(0);

    let changes =
        UserChanges::try_from_parts(Some("Grisha".to_owned()), None, None).expect("valid changes");
    let error = service(repo)
        .update_user(UserId::new(5), changes)
        .await
        .expect_err("conflict");

    assert_eq!(error, Error::Conflict);
}

#[rstest]
#[tokio::test]
async fn password_only_update_skips_uniqueness_lookup() {
    let mut repo = MockUserRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_| Ok(Some(stored(5, "Misha", "d@mail.ru"))));
    repo.expect_update()
        .times(1)
        .return_once(|id, changes| Ok(stored(id.get(), "Misha", "d@mail.ru").with_changes(changes)));

    let changes = UserChanges::try_from_parts(None, None, Some("Newpass99".to_owned()))
        .expect("valid changes");
    let updated = service(repo)
        .update_user(UserId::new(5), changes)
        .await
        .expect("update succeeds");

    assert_eq!(updated.password().expose(), "Newpass99");
}

#[rstest]
#[tokio::test]
async fn delete_returns_removed_record() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete()
        .with(eq(UserId::new(2)))
        .times(1)
        .return_once(|id| Ok(stored(id.get(), "Misha", "d@mail.ru")));

    let deleted = service(repo)
        .delete_user(UserId::new(2))
        .await
        .expect("delete succeeds");

    assert_eq!(deleted.id(), UserId::new(2));
}

#[rstest]
#[case(UserPersistenceError::not_found(4_i64), Error::not_found(UserId::new(4)))]
#[case(UserPersistenceError::duplicate(), Error::Conflict)]
#[case(UserPersistenceError::storage("lock poisoned"), Error::storage("lock poisoned"))]
fn persistence_errors_map_to_domain_errors(
    #[case] source: UserPersistenceError,
    #[case] expected: Error,
) {
    assert_eq!(Error::from(source), expected);
}

#[rstest]
#[tokio::test]
async fn find_user_reports_missing_record() {
    let mut repo = MockUserRepository::new();
    repo.expect_find().times(1).return_once(|_| Ok(None));

    let error = service(repo)
        .find_user(UserId::new(8))
        .await
        .expect_err("not found");

    assert_eq!(error, Error::not_found(UserId::new(8)));
}

#[rstest]
#[tokio::test]
async fn list_surfaces_storage_failures() {
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .times(1)
        .return_once(|| Err(UserPersistenceError::storage("disk on fire")));

    let error = service(repo).list_users().await.expect_err("storage");

    assert!(matches!(error, Error::Storage { .. }), "{error:?}");
}
