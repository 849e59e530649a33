use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use super::{ByteSource, SourceError};

/// mmapされたファイルソース
///
/// ファイル全体を読み込まず、要求された範囲だけをマップから切り出す。
/// ファイルはセッション中は不変である前提。
pub struct FileSource {
    /// ファイルパス
    path: PathBuf,
    /// マップ本体（空ファイルはmmapできないのでNone）
    map: Option<Mmap>,
    /// ファイルサイズ
    len: usize,
}

impl FileSource {
    /// ファイルを開いてマップする
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        let file = File::open(&path)?;
        let len = file.metadata()?.len() as usize;
        let map = if len == 0 {
            None
        } else {
            // SAFETY: 読み取り専用マップ。ビューアはファイルを変更しない
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self { path, map, len })
    }

    /// ファイルパスを取得
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.path.file_name().and_then(|s| s.to_str())
    }
}

impl ByteSource for FileSource {
    fn size(&self) -> usize {
        self.len
    }

    fn read(&self, start: usize, end: usize) -> Result<Vec<u8>, SourceError> {
        let end = end.min(self.len);
        if start >= end {
            return Ok(Vec::new());
        }
        match &self.map {
            Some(map) => Ok(map[start..end].to_vec()),
            None => Ok(Vec::new()),
        }
    }
}
