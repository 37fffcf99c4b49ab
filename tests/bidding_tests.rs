mod common;

use bidboard::auction::events::{AuctionSettled, BidPlaced};
use bidboard::bidding::commands::{
    handle_end_auction, handle_place_bid, AuctionError, EndAuctionCommand, PlaceBidCommand,
};
use bidboard::database::DatabaseManager;
use bidboard::query::handlers::{
    get_highest_bid, get_item_bids, get_post, get_post_purchases, get_post_sales, get_user_bids,
    get_user_purchases, get_user_sales,
};
use common::{create_post, create_user, setup, FileDatabase};

async fn bid(
    db_manager: &DatabaseManager,
    item_id: i64,
    bidder: &str,
    bid_amount: i64,
) -> Result<BidPlaced, AuctionError> {
    handle_place_bid(
        db_manager,
        PlaceBidCommand {
            item_id,
            bidder: bidder.to_string(),
            bid_amount,
        },
    )
    .await
}

async fn end(
    db_manager: &DatabaseManager,
    item_id: i64,
    requester: &str,
) -> Result<AuctionSettled, AuctionError> {
    handle_end_auction(
        db_manager,
        EndAuctionCommand {
            item_id,
            requester: requester.to_string(),
        },
    )
    .await
}

/// 입찰은 현재가보다 엄격히 커야 한다
#[tokio::test]
async fn test_bids_must_strictly_increase() {
    let db_manager = setup().await;
    create_user(&db_manager, "alice").await;
    create_user(&db_manager, "bob").await;
    let item_id = create_post(&db_manager, "alice", "Lamp").await;

    assert!(matches!(
        bid(&db_manager, item_id, "bob", 0).await,
        Err(AuctionError::BidTooLow { current_bid: 0, .. })
    ));
    bid(&db_manager, item_id, "bob", 10).await.unwrap();
    assert!(matches!(
        bid(&db_manager, item_id, "alice", 10).await,
        Err(AuctionError::BidTooLow {
            bid_amount: 10,
            current_bid: 10
        })
    ));
    assert!(matches!(
        bid(&db_manager, item_id, "alice", 9).await,
        Err(AuctionError::BidTooLow { .. })
    ));
    bid(&db_manager, item_id, "alice", 11).await.unwrap();

    let post = get_post(&db_manager, item_id).await.unwrap().unwrap();
    assert_eq!(post.current_bid, 11);

    // 거절된 입찰은 기록되지 않는다
    let bids = get_item_bids(&db_manager, item_id).await.unwrap();
    let amounts: Vec<i64> = bids.iter().map(|b| b.bid_amount).collect();
    assert_eq!(amounts, vec![11, 10]);
}

#[tokio::test]
async fn test_bid_on_unknown_item() {
    let db_manager = setup().await;
    create_user(&db_manager, "bob").await;

    assert!(matches!(
        bid(&db_manager, 999, "bob", 10).await,
        Err(AuctionError::ItemNotFound(999))
    ));
}

/// alice 10, bob 25, carol 15 이후 종료하면 bob 이 25 에 낙찰
#[tokio::test]
async fn test_settlement_records_one_sale_and_one_purchase() {
    let db_manager = setup().await;
    for name in ["owner", "alice", "bob", "carol"] {
        create_user(&db_manager, name).await;
    }
    let item_id = create_post(&db_manager, "owner", "Clock").await;

    bid(&db_manager, item_id, "alice", 10).await.unwrap();
    bid(&db_manager, item_id, "bob", 25).await.unwrap();
    assert!(bid(&db_manager, item_id, "carol", 15).await.is_err());

    let highest = get_highest_bid(&db_manager, item_id).await.unwrap().unwrap();
    assert_eq!(highest.username, "bob");

    let settled = end(&db_manager, item_id, "owner").await.unwrap();
    assert_eq!(settled.item_id, item_id);
    assert_eq!(settled.seller, "owner");
    assert_eq!(settled.buyer, "bob");
    assert_eq!(settled.price, 25);

    let sales = get_post_sales(&db_manager, item_id).await.unwrap();
    let purchases = get_post_purchases(&db_manager, item_id).await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].username, "owner");
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].username, "bob");

    let post = get_post(&db_manager, item_id).await.unwrap().unwrap();
    assert!(post.is_closed());
    assert_eq!(post.auction_end_time, Some(settled.timestamp));

    assert_eq!(get_user_sales(&db_manager, "owner").await.unwrap().len(), 1);
    assert_eq!(get_user_purchases(&db_manager, "bob").await.unwrap().len(), 1);
    assert!(get_user_purchases(&db_manager, "alice").await.unwrap().is_empty());
    // 종료된 경매는 입찰 내역에서 빠진다
    assert!(get_user_bids(&db_manager, "bob").await.unwrap().is_empty());
}

/// 입찰이 없으면 종료되지 않고 아무것도 기록되지 않는다
#[tokio::test]
async fn test_settlement_without_bids_leaves_item_open() {
    let db_manager = setup().await;
    create_user(&db_manager, "alice").await;
    let item_id = create_post(&db_manager, "alice", "Vase").await;

    assert!(matches!(
        end(&db_manager, item_id, "alice").await,
        Err(AuctionError::NoBids(id)) if id == item_id
    ));

    let post = get_post(&db_manager, item_id).await.unwrap().unwrap();
    assert!(!post.is_closed());
    assert!(get_post_sales(&db_manager, item_id).await.unwrap().is_empty());
    assert!(get_post_purchases(&db_manager, item_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_settlement_rejects_second_attempt() {
    let db_manager = setup().await;
    create_user(&db_manager, "alice").await;
    create_user(&db_manager, "bob").await;
    let item_id = create_post(&db_manager, "alice", "Chair").await;
    bid(&db_manager, item_id, "bob", 30).await.unwrap();

    end(&db_manager, item_id, "alice").await.unwrap();
    assert!(matches!(
        end(&db_manager, item_id, "alice").await,
        Err(AuctionError::AuctionClosed(_))
    ));

    assert_eq!(get_post_sales(&db_manager, item_id).await.unwrap().len(), 1);
    assert_eq!(get_post_purchases(&db_manager, item_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_settlement_requires_owner() {
    let db_manager = setup().await;
    create_user(&db_manager, "alice").await;
    create_user(&db_manager, "bob").await;
    let item_id = create_post(&db_manager, "alice", "Desk").await;
    bid(&db_manager, item_id, "bob", 5).await.unwrap();

    assert!(matches!(
        end(&db_manager, item_id, "bob").await,
        Err(AuctionError::NotOwner(_))
    ));
    assert!(matches!(
        end(&db_manager, 999, "alice").await,
        Err(AuctionError::ItemNotFound(999))
    ));

    let post = get_post(&db_manager, item_id).await.unwrap().unwrap();
    assert!(!post.is_closed());
}

#[tokio::test]
async fn test_closed_item_rejects_bids() {
    let db_manager = setup().await;
    create_user(&db_manager, "alice").await;
    create_user(&db_manager, "bob").await;
    let item_id = create_post(&db_manager, "alice", "Rug").await;
    bid(&db_manager, item_id, "bob", 5).await.unwrap();
    end(&db_manager, item_id, "alice").await.unwrap();

    assert!(matches!(
        bid(&db_manager, item_id, "bob", 500).await,
        Err(AuctionError::AuctionClosed(_))
    ));
    let post = get_post(&db_manager, item_id).await.unwrap().unwrap();
    assert_eq!(post.current_bid, 5);
}

/// 여러 연결에서 동시에 입찰해도 기록된 입찰은 접수 순서대로 증가한다
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bids_are_serialized() {
    let file_db = FileDatabase::new(4).await;
    let db_manager = file_db.db_manager.clone();
    create_user(&db_manager, "owner").await;
    let bidders = ["b0", "b1", "b2", "b3"];
    for name in bidders {
        create_user(&db_manager, name).await;
    }
    let item_id = create_post(&db_manager, "owner", "Painting").await;

    let mut tasks = Vec::new();
    for amount in [7_i64, 3, 12, 9, 1, 15, 4, 11, 20, 2, 18, 6] {
        let db_manager = db_manager.clone();
        let bidder = bidders[(amount % 4) as usize];
        tasks.push(tokio::spawn(async move {
            bid(&db_manager, item_id, bidder, amount).await
        }));
    }

    let mut accepted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(AuctionError::BidTooLow { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let post = get_post(&db_manager, item_id).await.unwrap().unwrap();
    assert_eq!(post.current_bid, 20);

    let mut bids = get_item_bids(&db_manager, item_id).await.unwrap();
    assert_eq!(bids.len(), accepted);
    bids.sort_by_key(|b| b.id);
    assert!(bids.windows(2).all(|w| w[0].bid_amount < w[1].bid_amount));

    // 동시 종료 요청은 한 번만 성공한다
    let first = tokio::spawn({
        let db_manager = db_manager.clone();
        async move { end(&db_manager, item_id, "owner").await }
    });
    let second = tokio::spawn({
        let db_manager = db_manager.clone();
        async move { end(&db_manager, item_id, "owner").await }
    });
    let results = [first.await.unwrap(), second.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(get_post_sales(&db_manager, item_id).await.unwrap().len(), 1);
    assert_eq!(get_post_purchases(&db_manager, item_id).await.unwrap().len(), 1);

    drop(db_manager);
    file_db.cleanup().await;
}

/// 종료와 경쟁한 입찰은 종료 전에 반영되어 낙찰에 참여하거나, 종료로 거절된다
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bids_racing_settlement() {
    let file_db = FileDatabase::new(4).await;
    let db_manager = file_db.db_manager.clone();
    create_user(&db_manager, "owner").await;
    let bidders = ["r0", "r1", "r2", "r3"];
    for name in bidders {
        create_user(&db_manager, name).await;
    }
    let item_id = create_post(&db_manager, "owner", "Sculpture").await;
    // 입찰이 하나도 없으면 종료가 NoBids 로 끝나므로 먼저 하나 넣어 둔다
    bid(&db_manager, item_id, "r0", 1).await.unwrap();

    let mut bid_tasks = Vec::new();
    let mut settle_task = None;
    for amount in 2..=29_i64 {
        let db_manager = db_manager.clone();
        let bidder = bidders[(amount % 4) as usize];
        let bid_db = db_manager.clone();
        bid_tasks.push(tokio::spawn(async move {
            bid(&bid_db, item_id, bidder, amount).await
        }));
        if amount == 14 {
            let db_manager = db_manager.clone();
            settle_task = Some(tokio::spawn(async move {
                end(&db_manager, item_id, "owner").await
            }));
        }
    }

    for task in bid_tasks {
        match task.await.unwrap() {
            Ok(_) | Err(AuctionError::BidTooLow { .. }) | Err(AuctionError::AuctionClosed(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    let settled = settle_task.unwrap().await.unwrap().unwrap();

    let post = get_post(&db_manager, item_id).await.unwrap().unwrap();
    let closed_at = post.auction_end_time.unwrap();
    let highest = get_highest_bid(&db_manager, item_id).await.unwrap().unwrap();
    assert_eq!(settled.buyer, highest.username);
    assert_eq!(settled.price, highest.bid_amount);
    assert_eq!(post.current_bid, highest.bid_amount);

    let purchases = get_post_purchases(&db_manager, item_id).await.unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].username, highest.username);

    // 기록된 입찰은 모두 종료 시각 이전이고, 접수 순서와 시각 순서가 같다
    let mut bids = get_item_bids(&db_manager, item_id).await.unwrap();
    bids.sort_by_key(|b| b.id);
    assert!(bids.iter().all(|b| b.bid_time <= closed_at));
    assert!(bids.windows(2).all(|w| w[0].bid_time <= w[1].bid_time));

    drop(db_manager);
    file_db.cleanup().await;
}
