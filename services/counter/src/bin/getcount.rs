/// 訪問カウントHTTP Lambdaエントリポイント
///
/// API Gatewayの`getcount`ルート経由のHTTPリクエストを処理し、
/// 加算後の訪問カウントを返却する。
use counter::application::CountHandler;
use counter::infrastructure::{init_logging, CounterConfig, DynamoVisitRepository};
use lambda_http::{run, service_fn, Error, Request};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("訪問カウンターLambda関数を初期化");

    // 設定はプロセス起動時に一度だけ読み込み、以後は不変
    let config = CounterConfig::from_env().await?;

    let repository = DynamoVisitRepository::new(
        config.client().clone(),
        config.visitors_table().to_string(),
    );
    let handler = CountHandler::new(repository, config.site_domains().clone());
    let handler = &handler;

    // Lambda関数を実行（ストアエラーは呼び出し失敗として伝播）
    run(service_fn(move |request: Request| async move {
        handler.handle(request).await.map_err(Error::from)
    }))
    .await
}
