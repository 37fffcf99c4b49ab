// region:    --- Posts

/// 전체 게시물 조회 (정렬 절은 호출부에서 붙인다)
pub const GET_ALL_POSTS: &str = "SELECT id, title, content, username, created_at, likes, image_url, current_bid, auction_end_time FROM posts";

/// 게시물 조회
pub const GET_POST: &str = "SELECT id, title, content, username, created_at, likes, image_url, current_bid, auction_end_time FROM posts WHERE id = ?1";

/// 사용자의 진행 중인 게시물 조회 (정렬 절은 호출부에서 붙인다)
pub const GET_USER_OPEN_POSTS: &str = "SELECT id, title, content, username, created_at, likes, image_url, current_bid, auction_end_time FROM posts WHERE username = ?1 AND auction_end_time IS NULL";

/// 게시물 좋아요 사용자 조회
pub const GET_POST_LIKED_BY: &str =
    "SELECT user_id FROM post_likes WHERE post_id = ?1 ORDER BY user_id";

/// 게시물 생성
pub const INSERT_POST: &str = r#"
    INSERT INTO posts (title, content, username, created_at, likes, image_url, current_bid)
    VALUES (?1, ?2, ?3, ?4, 0, ?5, 0)
    RETURNING id
"#;

/// 진행 중인 본인 게시물 삭제
pub const DELETE_OPEN_POST: &str =
    "DELETE FROM posts WHERE id = ?1 AND username = ?2 AND auction_end_time IS NULL";

/// 좋아요 취소
pub const DELETE_LIKE: &str = "DELETE FROM post_likes WHERE post_id = ?1 AND user_id = ?2";

/// 좋아요 추가
pub const INSERT_LIKE: &str = "INSERT INTO post_likes (post_id, user_id) VALUES (?1, ?2)";

pub const INCREMENT_LIKES: &str =
    "UPDATE posts SET likes = likes + 1 WHERE id = ?1 RETURNING likes";

pub const DECREMENT_LIKES: &str =
    "UPDATE posts SET likes = likes - 1 WHERE id = ?1 RETURNING likes";

// endregion: --- Posts

// region:    --- Bids

/// 상품 입찰 이력 조회 (최신순)
pub const GET_ITEM_BIDS: &str = r#"
    SELECT id, item_id, username, bid_amount, bid_time
    FROM bids
    WHERE item_id = ?1
    ORDER BY id DESC
"#;

/// 최고 입찰 조회. 동일 금액이면 먼저 접수된 입찰이 이긴다.
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, item_id, username, bid_amount, bid_time
    FROM bids
    WHERE item_id = ?1
    ORDER BY bid_amount DESC, id ASC
    LIMIT 1
"#;

/// 사용자의 진행 중인 경매 입찰 내역
pub const GET_USER_BIDS: &str = r#"
    SELECT posts.id, posts.title, posts.content, posts.username, posts.created_at, posts.likes,
           posts.image_url, posts.current_bid, posts.auction_end_time, bids.bid_amount
    FROM bids
    JOIN posts ON bids.item_id = posts.id
    WHERE bids.username = ?1 AND posts.auction_end_time IS NULL
    ORDER BY bids.id DESC
"#;

/// 현재 입찰가 갱신. 진행 중이고 입찰가가 더 높은 경우에만 반영된다.
pub const RAISE_CURRENT_BID: &str = r#"
    UPDATE posts SET current_bid = ?1
    WHERE id = ?2 AND auction_end_time IS NULL AND current_bid < ?1
    RETURNING current_bid
"#;

pub const INSERT_BID: &str = r#"
    INSERT INTO bids (item_id, username, bid_amount, bid_time)
    VALUES (?1, ?2, ?3, ?4)
    RETURNING id
"#;

// endregion: --- Bids

// region:    --- Settlement

/// 경매 종료. 소유자의 진행 중인 경매에만 반영된다.
pub const CLOSE_AUCTION: &str = r#"
    UPDATE posts SET auction_end_time = ?1
    WHERE id = ?2 AND username = ?3 AND auction_end_time IS NULL
    RETURNING id
"#;

/// 잠금을 잡은 뒤의 종료 시각 기록
pub const STAMP_AUCTION_END: &str = "UPDATE posts SET auction_end_time = ?1 WHERE id = ?2";

pub const INSERT_SALE: &str = "INSERT INTO sales (post_id, username) VALUES (?1, ?2)";

pub const INSERT_PURCHASE: &str = "INSERT INTO purchases (post_id, username) VALUES (?1, ?2)";

pub const GET_POST_SALES: &str =
    "SELECT id, post_id, username FROM sales WHERE post_id = ?1 ORDER BY id";

pub const GET_POST_PURCHASES: &str =
    "SELECT id, post_id, username FROM purchases WHERE post_id = ?1 ORDER BY id";

/// 사용자의 판매 내역
pub const GET_USER_SALES: &str = r#"
    SELECT posts.id, posts.title, posts.content, posts.username, posts.created_at, posts.likes,
           posts.image_url, posts.current_bid, posts.auction_end_time
    FROM sales
    JOIN posts ON sales.post_id = posts.id
    WHERE sales.username = ?1
    ORDER BY sales.id DESC
"#;

/// 사용자의 구매 내역
pub const GET_USER_PURCHASES: &str = r#"
    SELECT posts.id, posts.title, posts.content, posts.username, posts.created_at, posts.likes,
           posts.image_url, posts.current_bid, posts.auction_end_time
    FROM purchases
    JOIN posts ON purchases.post_id = posts.id
    WHERE purchases.username = ?1
    ORDER BY purchases.id DESC
"#;

// endregion: --- Settlement

// region:    --- Users

pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, identity_hash, avatar_url, member_since FROM users WHERE username = ?1";

pub const GET_USER_BY_IDENTITY: &str =
    "SELECT id, username, identity_hash, avatar_url, member_since FROM users WHERE identity_hash = ?1";

pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, identity_hash, member_since)
    VALUES (?1, ?2, ?3)
    RETURNING id, username, identity_hash, avatar_url, member_since
"#;

// endregion: --- Users

// region:    --- Sessions

pub const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (token, identity_hash, created_at, expires_at)
    VALUES (?1, ?2, ?3, ?4)
"#;

pub const GET_LIVE_SESSION: &str = r#"
    SELECT token, identity_hash, created_at, expires_at
    FROM sessions
    WHERE token = ?1 AND expires_at > ?2
"#;

pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = ?1";

pub const DELETE_EXPIRED_SESSIONS: &str = "DELETE FROM sessions WHERE expires_at <= ?1";

// endregion: --- Sessions
