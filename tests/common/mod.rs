#![allow(dead_code)]

use bidboard::database::DatabaseManager;
use bidboard::posts::commands::{handle_create_post, CreatePostCommand};
use bidboard::users::commands::{handle_register_user, RegisterUserCommand};
use bidboard::users::model::User;
use std::path::PathBuf;
use std::sync::Arc;

/// 트레이싱 초기화 (여러 테스트에서 호출해도 한 번만 설치된다)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bidboard=info".into()),
        )
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 메모리 데이터베이스 설정. 연결이 하나뿐이어야 같은 DB를 본다.
pub async fn setup() -> Arc<DatabaseManager> {
    init_tracing();
    let db_manager = DatabaseManager::connect("sqlite::memory:", 1)
        .await
        .expect("메모리 DB 연결 실패");
    db_manager
        .initialize_database()
        .await
        .expect("스키마 생성 실패");
    Arc::new(db_manager)
}

/// 임시 파일 데이터베이스. 여러 연결이 동시에 쓰는 테스트용.
pub struct FileDatabase {
    pub db_manager: Arc<DatabaseManager>,
    path: PathBuf,
}

impl FileDatabase {
    pub async fn new(max_connections: u32) -> Self {
        init_tracing();
        let path = std::env::temp_dir().join(format!("bidboard-{}.db", rand::random::<u64>()));
        let url = format!("sqlite://{}", path.display());
        let db_manager = DatabaseManager::connect(&url, max_connections)
            .await
            .expect("파일 DB 연결 실패");
        db_manager
            .initialize_database()
            .await
            .expect("스키마 생성 실패");
        Self {
            db_manager: Arc::new(db_manager),
            path,
        }
    }

    pub async fn cleanup(self) {
        self.db_manager.pool().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

pub fn identity_of(username: &str) -> String {
    format!("test-identity-{username}")
}

pub async fn create_user(db_manager: &DatabaseManager, username: &str) -> User {
    handle_register_user(
        db_manager,
        RegisterUserCommand {
            username: username.to_string(),
            identity_hash: identity_of(username),
        },
    )
    .await
    .expect("사용자 생성 실패")
}

pub async fn create_post(db_manager: &DatabaseManager, owner: &str, title: &str) -> i64 {
    handle_create_post(
        db_manager,
        CreatePostCommand {
            title: title.to_string(),
            content: format!("{title} 설명"),
            username: owner.to_string(),
            image_url: None,
        },
    )
    .await
    .expect("게시물 생성 실패")
}
