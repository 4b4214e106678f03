// ドメイン層モジュール
pub mod site_domains;
pub mod site_id;

// 再エクスポート
pub use site_domains::{SiteDomains, SiteDomainsError};
pub use site_id::{SiteId, SiteIdError};
