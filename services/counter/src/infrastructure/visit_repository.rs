// DynamoDBで訪問カウンターを管理するためのリポジトリ
//
// カウンターの更新はDynamoDBのADD更新式による1回のアトミック操作で行い、
// このクレート側ではロック・キャッシュ・再試行を持たない。

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

use crate::domain::SiteId;

/// パーティションキーの属性名
const KEY_ATTRIBUTE: &str = "website";

/// カウンター属性名
const HITS_ATTRIBUTE: &str = "hits";

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// 更新結果のデシリアライズに失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 訪問カウンター管理用トレイト
///
/// このトレイトはカウンター永続化機能を抽象化し、
/// 異なる実装を可能にします（実際のDynamoDB、テスト用モック）。
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// サイトのカウンターを1加算し、更新後の値を返す
    ///
    /// レコードが存在しない場合はADD更新式の意味論により
    /// `hits`が0から初期化され、最初の呼び出しは1を返す。
    ///
    /// # 引数
    /// * `site_id` - 加算対象のサイト識別子
    ///
    /// # 戻り値
    /// * 成功時は更新後の`hits`値
    /// * 失敗時は`Err(RepositoryError)`
    async fn increment(&self, site_id: &SiteId) -> Result<u64, RepositoryError>;
}

/// VisitRepositoryのDynamoDB実装
///
/// `UpdateItem`の`ADD hits :incr`と`ReturnValues=UPDATED_NEW`により、
/// 読み取り・加算・書き込みをストア側で直列化する。
#[derive(Debug, Clone)]
pub struct DynamoVisitRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// 訪問カウンターテーブル名
    table_name: String,
}

impl DynamoVisitRepository {
    /// 新しいDynamoVisitRepositoryを作成
    ///
    /// # 引数
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - 訪問カウンターテーブルの名前
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl VisitRepository for DynamoVisitRepository {
    async fn increment(&self, site_id: &SiteId) -> Result<u64, RepositoryError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, AttributeValue::S(site_id.as_str().to_string()))
            .update_expression(format!("ADD {HITS_ATTRIBUTE} :incr"))
            .expression_attribute_values(":incr", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.to_string()))?;

        // UPDATED_NEWで返却された属性から更新後のhitsを取り出す
        result
            .attributes
            .as_ref()
            .and_then(|attrs| attrs.get(HITS_ATTRIBUTE))
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse::<u64>().ok())
            .ok_or_else(|| {
                RepositoryError::SerializationError(format!(
                    "Missing or invalid {HITS_ATTRIBUTE} attribute in update result"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    // ==================== 訪問リポジトリテスト ====================

    // RepositoryError表示メッセージのテスト
    #[test]
    fn test_repository_error_write_error_display() {
        let error = RepositoryError::WriteError("throttled".to_string());
        assert_eq!(error.to_string(), "Write error: throttled");
    }

    #[test]
    fn test_repository_error_serialization_error_display() {
        let error = RepositoryError::SerializationError("invalid format".to_string());
        assert_eq!(error.to_string(), "Serialization error: invalid format");
    }

    // RepositoryError等価性のテスト
    #[test]
    fn test_repository_error_equality() {
        assert_eq!(
            RepositoryError::WriteError("test".to_string()),
            RepositoryError::WriteError("test".to_string())
        );
        assert_ne!(
            RepositoryError::WriteError("test".to_string()),
            RepositoryError::SerializationError("test".to_string())
        );
    }

    // ユニットテスト用のモックVisitRepository
    #[derive(Debug, Clone)]
    pub struct MockVisitRepository {
        /// 保存されたカウンター: site_id -> hits
        counters: Arc<Mutex<HashMap<String, u64>>>,
        /// 次の操作で返すエラー（エラーパスのテスト用）
        next_error: Arc<Mutex<Option<RepositoryError>>>,
    }

    impl MockVisitRepository {
        pub fn new() -> Self {
            Self {
                counters: Arc::new(Mutex::new(HashMap::new())),
                next_error: Arc::new(Mutex::new(None)),
            }
        }

        pub fn set_next_error(&self, error: RepositoryError) {
            *self.next_error.lock().unwrap() = Some(error);
        }

        pub fn stored_hits(&self, site_id: &str) -> Option<u64> {
            self.counters.lock().unwrap().get(site_id).copied()
        }
    }

    #[async_trait]
    impl VisitRepository for MockVisitRepository {
        async fn increment(&self, site_id: &SiteId) -> Result<u64, RepositoryError> {
            if let Some(error) = self.next_error.lock().unwrap().take() {
                return Err(error);
            }

            // ADD更新式の意味論: 属性が無ければ0から加算する
            let mut counters = self.counters.lock().unwrap();
            let hits = counters.entry(site_id.as_str().to_string()).or_insert(0);
            *hits += 1;
            Ok(*hits)
        }
    }

    fn site(raw: &str) -> SiteId {
        SiteId::parse(raw).unwrap()
    }

    // 初回加算が1を返すテスト（レコード暗黙作成）
    #[tokio::test]
    async fn test_first_increment_returns_one() {
        let repo = MockVisitRepository::new();

        let hits = repo.increment(&site("example.com")).await.unwrap();

        assert_eq!(hits, 1);
        assert_eq!(repo.stored_hits("example.com"), Some(1));
    }

    // 連続加算が単調増加するテスト
    #[tokio::test]
    async fn test_sequential_increments() {
        let repo = MockVisitRepository::new();
        let id = site("example.com");

        assert_eq!(repo.increment(&id).await.unwrap(), 1);
        assert_eq!(repo.increment(&id).await.unwrap(), 2);
        assert_eq!(repo.increment(&id).await.unwrap(), 3);
    }

    // サイトごとにカウンターが独立しているテスト
    #[tokio::test]
    async fn test_increments_are_per_site() {
        let repo = MockVisitRepository::new();

        repo.increment(&site("example.com")).await.unwrap();
        repo.increment(&site("example.com")).await.unwrap();
        repo.increment(&site("example.org")).await.unwrap();

        assert_eq!(repo.stored_hits("example.com"), Some(2));
        assert_eq!(repo.stored_hits("example.org"), Some(1));
    }

    // 100並行加算で最終値がちょうど100になるテスト（加算のアトミック性）
    #[tokio::test]
    async fn test_concurrent_increments_sum_exactly() {
        let repo = Arc::new(MockVisitRepository::new());

        let mut handles = Vec::new();
        for _ in 0..100 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.increment(&site("example.com")).await.unwrap()
            }));
        }

        let mut returned = Vec::new();
        for handle in handles {
            returned.push(handle.await.unwrap());
        }

        // 最終保存値はインターリーブに関係なくちょうど100
        assert_eq!(repo.stored_hits("example.com"), Some(100));

        // 返却値は1..=100の順列（同じ値が2回返ることはない）
        returned.sort_unstable();
        assert_eq!(returned, (1..=100).collect::<Vec<u64>>());
    }

    // エラー注入時に加算が失敗し、保存値が変化しないテスト
    #[tokio::test]
    async fn test_increment_error_propagates() {
        let repo = MockVisitRepository::new();
        let id = site("example.com");

        repo.increment(&id).await.unwrap();
        repo.set_next_error(RepositoryError::WriteError("DynamoDB unavailable".to_string()));

        let result = repo.increment(&id).await;

        assert_eq!(
            result.unwrap_err(),
            RepositoryError::WriteError("DynamoDB unavailable".to_string())
        );
        assert_eq!(repo.stored_hits("example.com"), Some(1));
    }
}
