// 訪問カウントレスポンス生成ハンドラー
//
// HTTPリクエストからサイト識別子を解決し、リポジトリで
// カウンターを1加算して更新後の値をレスポンスとして返す。

use lambda_http::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use lambda_http::{Body, Request, RequestExt, Response};
use tracing::{info, warn};

use crate::domain::{SiteDomains, SiteId};
use crate::infrastructure::{RepositoryError, VisitRepository};

/// サイト識別子を指定するクエリパラメータ名
const SITE_PARAMETER: &str = "site";

/// 訪問カウントレスポンス生成ハンドラー
///
/// サイト識別子はリクエストの`site`クエリパラメータから受け取り、
/// 構成済みドメインに対して検証する。省略時は主ドメインを使用する。
pub struct CountHandler<R: VisitRepository> {
    /// 訪問カウンターリポジトリ
    repository: R,
    /// 配信対象のサイトドメイン構成
    site_domains: SiteDomains,
}

impl<R: VisitRepository> CountHandler<R> {
    /// 新しいハンドラーを作成
    ///
    /// # 引数
    /// * `repository` - 訪問カウンターリポジトリ
    /// * `site_domains` - 配信対象のサイトドメイン構成
    pub fn new(repository: R, site_domains: SiteDomains) -> Self {
        Self {
            repository,
            site_domains,
        }
    }

    /// リクエストを処理してレスポンスを生成
    ///
    /// 加算成功時は更新後のカウントを本文とするHTTP 200を返す。
    /// 識別子が不正な場合は400、構成外のサイトの場合は404を返す
    /// （いずれもストアには触れない）。
    /// ストア側の失敗は`Err(RepositoryError)`として呼び出し元へ伝播し、
    /// 呼び出し全体が失敗として扱われる。
    pub async fn handle(&self, request: Request) -> Result<Response<Body>, RepositoryError> {
        // サイト識別子をクエリパラメータから解決（省略時は主ドメイン）
        let params = request.query_string_parameters();
        let site_id = match params.first(SITE_PARAMETER) {
            Some(raw) => match SiteId::parse(raw) {
                Ok(id) => id,
                Err(e) => {
                    warn!(site = raw, error = %e, "不正なサイト識別子を拒否");
                    return Ok(Self::error_response(400, "invalid site parameter"));
                }
            },
            None => self.site_domains.primary().clone(),
        };

        // 構成済みドメイン（apex/www展開）に含まれるサイトのみ受け入れる
        if !self.site_domains.is_accepted(&site_id) {
            warn!(site_id = %site_id, "構成外のサイトを拒否");
            return Ok(Self::error_response(404, "unknown site"));
        }

        // ストア側でアトミックに加算し、更新後の値を取得
        let hits = self.repository.increment(&site_id).await?;

        info!(site_id = %site_id, hits = hits, "カウンター更新");

        Ok(Self::count_response(hits))
    }

    /// 更新後のカウントを本文とするHTTP 200レスポンスを生成
    fn count_response(hits: u64) -> Response<Body> {
        let mut response = Response::builder()
            .status(200)
            .body(Body::Text(hits.to_string()))
            .expect("レスポンスの構築に失敗");

        *response.headers_mut() = Self::build_cors_headers();

        response
    }

    /// クライアントエラー用のレスポンスを生成（CORSヘッダー付き）
    fn error_response(status: u16, message: &str) -> Response<Body> {
        let mut response = Response::builder()
            .status(status)
            .body(Body::Text(message.to_string()))
            .expect("レスポンスの構築に失敗");

        *response.headers_mut() = Self::build_cors_headers();

        response
    }

    /// CORSヘッダーを生成
    ///
    /// 訪問カウントレスポンスに必要なヘッダーを含むHeaderMapを返す:
    /// - Content-Type: text/plain
    /// - Access-Control-Allow-Origin: *
    /// - Access-Control-Allow-Credentials: true
    fn build_cors_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );

        headers
    }
}
