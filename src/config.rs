//! 表示設定の永続化
//!
//! 列数と行数を設定ファイルに保存し、次回起動時に読み込む。
//! 保存するのはこの2項目だけで、その他の設定は毎回既定値から始まる。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// 設定ファイルのエラー
#[derive(Debug, Error)]
pub enum PrefsError {
    /// I/Oエラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOMLシリアライズ失敗
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 永続化される表示設定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    /// 表示列数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    /// ウィンドウの行数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

impl Prefs {
    /// 既定の設定ファイルパス
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hxv").join("config.toml"))
    }

    /// 既定パスから読み込む
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// 指定パスから読み込む
    /// ファイルがない・読めない・壊れている場合は既定値を返す
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&text) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "broken prefs file, using defaults");
                Self::default()
            }
        }
    }

    /// 指定パスへ保存する（親ディレクトリは作成される）
    pub fn save_to(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefs_roundtrip_through_file() {
        let path = std::env::temp_dir().join("hxv_prefs_roundtrip.toml");
        let prefs = Prefs { columns: Some(8), rows: Some(30) };
        prefs.save_to(&path).unwrap();
        assert_eq!(Prefs::load_from(&path), prefs);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("hxv_prefs_missing.toml");
        let _ = fs::remove_file(&path);
        assert_eq!(Prefs::load_from(&path), Prefs::default());
    }

    #[test]
    fn broken_file_loads_defaults() {
        let path = std::env::temp_dir().join("hxv_prefs_broken.toml");
        fs::write(&path, "columns = \"not a number\"").unwrap();
        assert_eq!(Prefs::load_from(&path), Prefs::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn absent_fields_stay_none() {
        let path = std::env::temp_dir().join("hxv_prefs_partial.toml");
        fs::write(&path, "columns = 16").unwrap();
        let prefs = Prefs::load_from(&path);
        assert_eq!(prefs.columns, Some(16));
        assert_eq!(prefs.rows, None);
        let _ = fs::remove_file(&path);
    }
}
