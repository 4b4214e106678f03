/// 訪問カウンターLambdaの接続設定
///
/// 環境変数とAWS設定をプロセス起動時に一度だけ読み込み、
/// 以後は不変の設定としてハンドラーに渡す。
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

use crate::domain::{SiteDomains, SiteDomainsError};

/// カウンター設定のエラー型
#[derive(Debug, Error)]
pub enum CounterConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid site domains: {0}")]
    InvalidSiteDomains(#[from] SiteDomainsError),
}

/// テーブル名・サイトドメイン・クライアントを持つカウンター設定
///
/// この構造体は環境変数から読み込んだDynamoDBクライアントと設定値を保持します。
/// 設定は以下の環境変数から読み込む:
/// - VISITORS_TABLE: 訪問カウンター保存用テーブル
/// - SITE_DOMAINS: 配信対象ドメイン一覧（カンマ区切り、先頭が主ドメイン）
#[derive(Debug, Clone)]
pub struct CounterConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// 訪問カウンターテーブル名
    visitors_table: String,
    /// 配信対象のサイトドメイン構成
    site_domains: SiteDomains,
}

impl CounterConfig {
    /// 環境からAWS設定を読み込み、環境変数から設定値を読み取って新しいCounterConfigを作成
    ///
    /// 環境変数:
    /// - AWS認証情報: aws-configにより自動読み込み
    /// - VISITORS_TABLE: 訪問カウンター用DynamoDBテーブル名
    /// - SITE_DOMAINS: 配信対象ドメイン一覧（カンマ区切り）
    pub async fn from_env() -> Result<Self, CounterConfigError> {
        // 環境からAWS設定を読み込み（認証情報、リージョンなど）
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        // AWS設定からDynamoDBクライアントを作成
        let client = DynamoDbClient::new(&aws_config);

        // 環境変数からテーブル名を読み込み
        let visitors_table = std::env::var("VISITORS_TABLE")
            .map_err(|_| CounterConfigError::MissingEnvVar("VISITORS_TABLE".to_string()))?;

        // 環境変数からドメイン一覧を読み込み（カンマ区切り）
        let raw_domains = std::env::var("SITE_DOMAINS")
            .map_err(|_| CounterConfigError::MissingEnvVar("SITE_DOMAINS".to_string()))?;
        let site_domains = SiteDomains::new(&parse_comma_separated(&raw_domains))?;

        Ok(Self {
            client,
            visitors_table,
            site_domains,
        })
    }

    /// 明示的な値で新しいCounterConfigを作成（テスト用）
    pub fn new(client: DynamoDbClient, visitors_table: String, site_domains: SiteDomains) -> Self {
        Self {
            client,
            visitors_table,
            site_domains,
        }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// 訪問カウンターテーブル名を取得
    pub fn visitors_table(&self) -> &str {
        &self.visitors_table
    }

    /// サイトドメイン構成への参照を取得
    pub fn site_domains(&self) -> &SiteDomains {
        &self.site_domains
    }
}

/// カンマ区切り文字列を要素一覧にパース
///
/// 各要素は前後の空白を除去し、空要素は除外する。
fn parse_comma_separated(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
