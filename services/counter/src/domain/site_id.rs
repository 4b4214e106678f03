// サイト識別子
//
// 訪問カウンターのパーティションキーとして使用するサイト識別子を
// 検証付きで保持するドメイン型。
// 識別子はリクエスト入力として受け取るため、DNS名の構文で検証する。

use thiserror::Error;

/// サイト識別子の最大長（DNS名の上限）
const MAX_SITE_ID_LENGTH: usize = 253;

/// ラベルの最大長（DNS仕様）
const MAX_LABEL_LENGTH: usize = 63;

/// サイト識別子の検証エラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SiteIdError {
    /// 空文字列
    #[error("Site id is empty")]
    Empty,

    /// 長すぎる識別子
    #[error("Site id exceeds {MAX_SITE_ID_LENGTH} characters")]
    TooLong,

    /// DNS名として不正な構文
    #[error("Invalid site id syntax: {0}")]
    InvalidSyntax(String),
}

/// 検証済みのサイト識別子
///
/// DynamoDBテーブルのパーティションキー`website`に対応する値。
/// 小文字のDNS名構文（例: `example.com`、`www.example.com`）のみを許可する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteId(String);

impl SiteId {
    /// 文字列を検証してSiteIdを作成
    ///
    /// 検証規則:
    /// - 空でないこと、253文字以下であること
    /// - ドット区切りの各ラベルが1〜63文字であること
    /// - ラベルは小文字英数字とハイフンのみ、先頭・末尾のハイフンは不可
    pub fn parse(raw: &str) -> Result<Self, SiteIdError> {
        if raw.is_empty() {
            return Err(SiteIdError::Empty);
        }

        if raw.len() > MAX_SITE_ID_LENGTH {
            return Err(SiteIdError::TooLong);
        }

        for label in raw.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
                return Err(SiteIdError::InvalidSyntax(raw.to_string()));
            }

            if !label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            {
                return Err(SiteIdError::InvalidSyntax(raw.to_string()));
            }

            if label.starts_with('-') || label.ends_with('-') {
                return Err(SiteIdError::InvalidSyntax(raw.to_string()));
            }
        }

        Ok(Self(raw.to_string()))
    }

    /// 識別子の文字列表現を取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
