// サイトドメイン構成
//
// 配信対象のドメイン一覧（先頭が主ドメイン）を保持し、
// www/apexの組み合わせ展開と、リクエストされたサイト識別子の
// 受け入れ判定を提供するドメイン型。

use thiserror::Error;

use super::site_id::{SiteId, SiteIdError};

/// 展開対象のサブドメイン（apexはそのまま、wwwを前置）
const SUBDOMAIN_PREFIXES: [&str; 2] = ["", "www"];

/// サイトドメイン構成のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SiteDomainsError {
    /// ドメイン一覧が空
    #[error("Site domain list is empty")]
    Empty,

    /// ドメインの構文が不正
    #[error("Invalid site domain: {0}")]
    InvalidDomain(#[from] SiteIdError),
}

/// 配信対象のサイトドメイン一覧
///
/// 一覧の先頭が主ドメインで、`site`パラメータ省略時のデフォルトになる。
/// 各ドメインはapexとwwwの両方の名前で受け入れられる。
#[derive(Debug, Clone, PartialEq)]
pub struct SiteDomains {
    /// 検証済みドメイン一覧（先頭が主ドメイン）
    domains: Vec<SiteId>,
}

impl SiteDomains {
    /// ドメイン一覧を検証してSiteDomainsを作成
    ///
    /// 一覧が空の場合、またはいずれかのドメインが不正な場合はエラー。
    pub fn new(domains: &[String]) -> Result<Self, SiteDomainsError> {
        if domains.is_empty() {
            return Err(SiteDomainsError::Empty);
        }

        let domains = domains
            .iter()
            .map(|d| SiteId::parse(d))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { domains })
    }

    /// 主ドメイン（一覧の先頭）を取得
    pub fn primary(&self) -> &SiteId {
        // newで空一覧を拒否しているため先頭は必ず存在する
        &self.domains[0]
    }

    /// 主ドメイン以外の受け入れ名を列挙
    ///
    /// 各ドメインに対してapexとwwwの2つの名前を生成し、
    /// 主ドメインと等しい（値として等しい）名前を除外して返す。
    pub fn alternate_names(&self) -> Vec<SiteId> {
        let primary = self.primary().clone();

        let mut names = Vec::new();
        for prefix in SUBDOMAIN_PREFIXES {
            for domain in &self.domains {
                let name = if prefix.is_empty() {
                    domain.clone()
                } else {
                    // 前置で全長上限を超える名前は受け入れ対象から外す
                    match SiteId::parse(&format!("{}.{}", prefix, domain.as_str())) {
                        Ok(name) => name,
                        Err(_) => continue,
                    }
                };

                // 値の等価比較で主ドメインを除外する
                if name != primary {
                    names.push(name);
                }
            }
        }

        names
    }

    /// サイト識別子が受け入れ対象かどうかを判定
    ///
    /// 主ドメイン、または`alternate_names`に含まれる名前のみ受け入れる。
    pub fn is_accepted(&self, site_id: &SiteId) -> bool {
        site_id == self.primary() || self.alternate_names().contains(site_id)
    }
}
