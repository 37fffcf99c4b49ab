mod common;

use bidboard::bidding::commands::{
    handle_end_auction, handle_place_bid, EndAuctionCommand, PlaceBidCommand,
};
use bidboard::posts::commands::{
    handle_create_post, handle_delete_post, handle_toggle_like, CreatePostCommand, PostError,
};
use bidboard::query::handlers::{
    get_item_bids, get_post, get_post_liked_by, get_posts, get_user_posts, SortBy,
};
use bidboard::scheduler::SessionScheduler;
use bidboard::session::{create_session, find_session, purge_expired_sessions};
use bidboard::users::commands::{handle_register_user, RegisterUserCommand, UserError};
use chrono::{Duration, Utc};
use common::{create_post, create_user, identity_of, setup};

#[tokio::test]
async fn test_create_post_requires_title_and_content() {
    let db_manager = setup().await;
    create_user(&db_manager, "alice").await;

    let result = handle_create_post(
        &db_manager,
        CreatePostCommand {
            title: "   ".to_string(),
            content: "body".to_string(),
            username: "alice".to_string(),
            image_url: None,
        },
    )
    .await;
    assert!(matches!(result, Err(PostError::MissingField)));

    let post_id = handle_create_post(
        &db_manager,
        CreatePostCommand {
            title: " Lamp ".to_string(),
            content: "Brass".to_string(),
            username: "alice".to_string(),
            image_url: Some("  ".to_string()),
        },
    )
    .await
    .unwrap();

    let post = get_post(&db_manager, post_id).await.unwrap().unwrap();
    assert_eq!(post.title, "Lamp");
    assert_eq!(post.likes, 0);
    assert_eq!(post.current_bid, 0);
    assert_eq!(post.image_url, None);
    assert!(!post.is_closed());
}

#[tokio::test]
async fn test_like_toggles_per_user() {
    let db_manager = setup().await;
    let alice = create_user(&db_manager, "alice").await;
    let bob = create_user(&db_manager, "bob").await;
    let post_id = create_post(&db_manager, "alice", "Lamp").await;

    let outcome = handle_toggle_like(&db_manager, post_id, bob.id).await.unwrap();
    assert!(outcome.liked);
    assert_eq!(outcome.likes, 1);

    let outcome = handle_toggle_like(&db_manager, post_id, alice.id).await.unwrap();
    assert_eq!(outcome.likes, 2);
    assert_eq!(
        get_post_liked_by(&db_manager, post_id).await.unwrap(),
        vec![alice.id, bob.id]
    );

    let outcome = handle_toggle_like(&db_manager, post_id, bob.id).await.unwrap();
    assert!(!outcome.liked);
    assert_eq!(outcome.likes, 1);
    assert_eq!(
        get_post_liked_by(&db_manager, post_id).await.unwrap(),
        vec![alice.id]
    );

    assert!(matches!(
        handle_toggle_like(&db_manager, 999, bob.id).await,
        Err(PostError::PostNotFound(999))
    ));
}

#[tokio::test]
async fn test_sorting_posts() {
    let db_manager = setup().await;
    let alice = create_user(&db_manager, "alice").await;
    let first = create_post(&db_manager, "alice", "First").await;
    let second = create_post(&db_manager, "alice", "Second").await;
    handle_toggle_like(&db_manager, first, alice.id).await.unwrap();

    let ids = |posts: Vec<bidboard::bidding::model::Post>| -> Vec<i64> {
        posts.into_iter().map(|p| p.id).collect()
    };

    assert_eq!(
        ids(get_posts(&db_manager, SortBy::Newest).await.unwrap()),
        vec![second, first]
    );
    assert_eq!(
        ids(get_posts(&db_manager, SortBy::Oldest).await.unwrap()),
        vec![first, second]
    );
    assert_eq!(
        ids(get_posts(&db_manager, SortBy::MostLikes).await.unwrap()),
        vec![first, second]
    );
    assert_eq!(
        ids(get_posts(&db_manager, SortBy::LeastLikes).await.unwrap()),
        vec![second, first]
    );
    assert_eq!(
        ids(get_posts(&db_manager, SortBy::parse(Some("bogus"))).await.unwrap()),
        vec![second, first]
    );
}

#[tokio::test]
async fn test_delete_post_rules() {
    let db_manager = setup().await;
    create_user(&db_manager, "alice").await;
    create_user(&db_manager, "bob").await;
    let open = create_post(&db_manager, "alice", "Open").await;
    let sold = create_post(&db_manager, "alice", "Sold").await;

    handle_place_bid(
        &db_manager,
        PlaceBidCommand {
            item_id: open,
            bidder: "bob".to_string(),
            bid_amount: 3,
        },
    )
    .await
    .unwrap();
    handle_place_bid(
        &db_manager,
        PlaceBidCommand {
            item_id: sold,
            bidder: "bob".to_string(),
            bid_amount: 4,
        },
    )
    .await
    .unwrap();
    handle_end_auction(
        &db_manager,
        EndAuctionCommand {
            item_id: sold,
            requester: "alice".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        handle_delete_post(&db_manager, open, "bob".to_string()).await,
        Err(PostError::NotOwner(_))
    ));
    assert!(matches!(
        handle_delete_post(&db_manager, sold, "alice".to_string()).await,
        Err(PostError::AuctionClosed(_))
    ));
    assert!(matches!(
        handle_delete_post(&db_manager, 999, "alice".to_string()).await,
        Err(PostError::PostNotFound(999))
    ));

    handle_delete_post(&db_manager, open, "alice".to_string())
        .await
        .unwrap();
    assert!(get_post(&db_manager, open).await.unwrap().is_none());
    assert!(get_item_bids(&db_manager, open).await.unwrap().is_empty());

    // 판매 완료된 게시물은 진행 중 목록에서 빠진다
    assert!(get_user_posts(&db_manager, "alice", SortBy::Newest)
        .await
        .unwrap()
        .is_empty());
    assert!(get_post(&db_manager, sold).await.unwrap().is_some());
}

#[tokio::test]
async fn test_register_user_conflicts() {
    let db_manager = setup().await;
    create_user(&db_manager, "alice").await;

    let taken = handle_register_user(
        &db_manager,
        RegisterUserCommand {
            username: "alice".to_string(),
            identity_hash: "someone-else".to_string(),
        },
    )
    .await;
    assert!(matches!(taken, Err(UserError::UsernameTaken(name)) if name == "alice"));

    let again = handle_register_user(
        &db_manager,
        RegisterUserCommand {
            username: "alice2".to_string(),
            identity_hash: identity_of("alice"),
        },
    )
    .await;
    assert!(matches!(again, Err(UserError::IdentityAlreadyRegistered)));

    let invalid = handle_register_user(
        &db_manager,
        RegisterUserCommand {
            username: "bad name".to_string(),
            identity_hash: "fresh".to_string(),
        },
    )
    .await;
    assert!(matches!(invalid, Err(UserError::InvalidUsername(_))));

    let user = handle_register_user(
        &db_manager,
        RegisterUserCommand {
            username: "  carol ".to_string(),
            identity_hash: "fresh".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(user.username, "carol");
}

#[tokio::test]
async fn test_sessions_expire() {
    let db_manager = setup().await;

    let live = create_session(&db_manager, "identity-a", Duration::hours(1))
        .await
        .unwrap();
    let stale = create_session(&db_manager, "identity-b", Duration::seconds(-1))
        .await
        .unwrap();

    let found = find_session(&db_manager, &live.token).await.unwrap().unwrap();
    assert_eq!(found.identity_hash, "identity-a");
    assert!(find_session(&db_manager, &stale.token).await.unwrap().is_none());

    let removed = purge_expired_sessions(&db_manager, Utc::now()).await.unwrap();
    assert_eq!(removed, 1);
    assert!(find_session(&db_manager, &live.token).await.unwrap().is_some());
}

/// 스케줄러는 시작 직후 첫 정리를 수행한다
#[tokio::test]
async fn test_scheduler_purges_expired_sessions() {
    let db_manager = setup().await;
    create_session(&db_manager, "identity-old", Duration::seconds(-1))
        .await
        .unwrap();

    let handle = SessionScheduler::new(db_manager.clone()).start();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    handle.abort();

    let remaining = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions")
        .fetch_one(db_manager.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
