//! ログ初期化
//!
//! TUIは自分が描画している端末にログを出せないので、ファイルへ
//! 書き出す。別の端末から `tail -f` で追える。

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// ログ初期化のエラー
#[derive(Debug, Error)]
pub enum LoggingError {
    /// ログディレクトリが作成できない
    #[error("failed to create log directory {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// ファイル名のないパス
    #[error("invalid log file path: {0:?}")]
    InvalidPath(PathBuf),
    /// 既に初期化済み
    #[error("tracing subscriber already initialized")]
    AlreadyInitialized,
}

/// 既定のログファイルパス
pub fn default_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("hxv")
        .join("hxv.log")
}

/// ファイル出力のtracingサブスクライバを初期化する
///
/// RUST_LOG を尊重し、未設定なら info レベル。ログファイルには
/// ANSIエスケープを含めない。
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}
