/// 만료 세션 정리 스케줄러
/// 세션은 조회 시점에도 만료 여부를 확인하므로, 여기서는 남은 행만 치운다.
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::session::purge_expired_sessions;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error};

// endregion: --- Imports

const PURGE_PERIOD: Duration = Duration::from_secs(60);

// region:    --- Session Scheduler
/// 만료 세션 정리 스케줄러
pub struct SessionScheduler {
    db_manager: Arc<DatabaseManager>,
}

impl SessionScheduler {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }

    /// 스케줄러 시작
    pub fn start(&self) -> JoinHandle<()> {
        let db_manager = Arc::clone(&self.db_manager);
        tokio::spawn(async move {
            let mut interval = interval(PURGE_PERIOD);
            loop {
                interval.tick().await;
                if let Err(e) = Self::purge(&db_manager).await {
                    error!("{:<12} --> 만료 세션 정리 중 오류 발생: {:?}", "Scheduler", e);
                }
            }
        })
    }

    async fn purge(db_manager: &DatabaseManager) -> Result<(), sqlx::Error> {
        let removed = purge_expired_sessions(db_manager, Utc::now()).await?;
        if removed > 0 {
            debug!("{:<12} --> 만료 세션 {}개 삭제", "Scheduler", removed);
        }
        Ok(())
    }
}
// endregion: --- Session Scheduler
