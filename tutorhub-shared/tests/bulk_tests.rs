/// Integration tests for bulk business operations

mod common;

use common::TestContext;
use tutorhub_shared::error::ErrorKind;
use tutorhub_shared::models::user::User;
use tutorhub_shared::models::AccountStatus;
use uuid::Uuid;

async fn statuses(ctx: &TestContext, id: Uuid) -> (AccountStatus, AccountStatus) {
    let business = ctx.services.businesses.get(id).await.unwrap();
    let user = User::find_by_id(&ctx.pool, business.user_id)
        .await
        .unwrap()
        .unwrap();
    (business.status, user.status)
}

#[tokio::test]
async fn test_bulk_status_updates_businesses_and_users() {
    let ctx = TestContext::new().await;
    let a = ctx.business("A", "a@example.com").await;
    let b = ctx.business("B", "b@example.com").await;
    let untouched = ctx.business("C", "c@example.com").await;

    let updated = ctx
        .services
        .businesses
        .bulk_update_status(&[a.id, b.id, a.id], 0)
        .await
        .unwrap();
    assert_eq!(updated, 2);

    for id in [a.id, b.id] {
        assert_eq!(
            statuses(&ctx, id).await,
            (AccountStatus::Inactive, AccountStatus::Inactive)
        );
    }
    assert_eq!(
        statuses(&ctx, untouched.id).await,
        (AccountStatus::Active, AccountStatus::Active)
    );
}

#[tokio::test]
async fn test_bulk_status_with_unknown_id_changes_nothing() {
    let ctx = TestContext::new().await;
    let a = ctx.business("A", "a@example.com").await;
    let b = ctx.business("B", "b@example.com").await;
    let missing = Uuid::new_v4();

    let err = ctx
        .services
        .businesses
        .bulk_update_status(&[a.id, missing, b.id], 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains(&missing.to_string()));

    for id in [a.id, b.id] {
        assert_eq!(
            statuses(&ctx, id).await,
            (AccountStatus::Active, AccountStatus::Active)
        );
    }
}

#[tokio::test]
async fn test_bulk_status_rejects_bad_input() {
    let ctx = TestContext::new().await;
    let a = ctx.business("A", "a@example.com").await;

    let err = ctx
        .services
        .businesses
        .bulk_update_status(&[], 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = ctx
        .services
        .businesses
        .bulk_update_status(&[a.id], 7)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_bulk_status_rolls_back_when_user_write_fails() {
    let ctx = TestContext::new().await;
    let a = ctx.business("A", "a@example.com").await;
    let b = ctx.business("B", "b@example.com").await;
    sqlx::query(
        "CREATE TRIGGER reject_user_update BEFORE UPDATE ON users \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END",
    )
    .execute(&ctx.pool)
    .await
    .unwrap();

    let err = ctx
        .services
        .businesses
        .bulk_update_status(&[a.id, b.id], 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    for id in [a.id, b.id] {
        let business = ctx.services.businesses.get(id).await.unwrap();
        assert_eq!(business.status, AccountStatus::Active);
    }
}

#[tokio::test]
async fn test_bulk_assign_package() {
    let ctx = TestContext::new().await;
    let package = ctx.package("Gold").await;
    let a = ctx.business("A", "a@example.com").await;
    let b = ctx.business("B", "b@example.com").await;

    let updated = ctx
        .services
        .businesses
        .bulk_assign_package(&[b.id, a.id], package.id)
        .await
        .unwrap();
    assert_eq!(updated, 2);

    for id in [a.id, b.id] {
        let business = ctx.services.businesses.get(id).await.unwrap();
        assert_eq!(business.package_id, Some(package.id));
    }
}

#[tokio::test]
async fn test_bulk_assign_package_rejects_unknown_ids() {
    let ctx = TestContext::new().await;
    let package = ctx.package("Gold").await;
    let a = ctx.business("A", "a@example.com").await;

    let err = ctx
        .services
        .businesses
        .bulk_assign_package(&[a.id, Uuid::new_v4()], package.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(ctx.services.businesses.get(a.id).await.unwrap().package_id, None);

    let err = ctx
        .services
        .businesses
        .bulk_assign_package(&[a.id], Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ctx
        .services
        .businesses
        .bulk_assign_package(&[], package.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
