// アプリケーション層モジュール
pub mod count_handler;

// 再エクスポート
pub use count_handler::CountHandler;
