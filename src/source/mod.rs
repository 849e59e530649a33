//! 表示対象のバイト列ソース
//!
//! ビューアはソース全体を保持せず、ウィンドウに必要な範囲だけを
//! `read` で切り出す。

mod file;

pub use file::FileSource;

use thiserror::Error;

/// ソース操作のエラー
#[derive(Debug, Error)]
pub enum SourceError {
    /// I/Oエラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// ランダムスライス可能なバイト列
///
/// `read` は `[start, end)` を返す。範囲はサイズでクリップされ、
/// 末尾では要求より短いバイト列になる。クリップ後の正当な要求で
/// 失敗してはならない。
pub trait ByteSource {
    /// 全体のバイト数
    fn size(&self) -> usize;

    /// 指定範囲のバイト列を読み出す
    fn read(&self, start: usize, end: usize) -> Result<Vec<u8>, SourceError>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn read(&self, start: usize, end: usize) -> Result<Vec<u8>, SourceError> {
        (**self).read(start, end)
    }
}

/// メモリ上のバイト列ソース（標準入力やテスト用）
pub struct MemSource {
    data: Vec<u8>,
}

impl MemSource {
    /// バイト列から作成
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl ByteSource for MemSource {
    fn size(&self) -> usize {
        self.data.len()
    }

    fn read(&self, start: usize, end: usize) -> Result<Vec<u8>, SourceError> {
        let end = end.min(self.data.len());
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(self.data[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_source_reads_in_range() {
        let source = MemSource::new(vec![1, 2, 3, 4, 5]);
        assert_eq!(source.size(), 5);
        assert_eq!(source.read(1, 4).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn mem_source_clips_at_eof() {
        let source = MemSource::new(vec![1, 2, 3]);
        assert_eq!(source.read(2, 10).unwrap(), vec![3]);
        assert_eq!(source.read(3, 10).unwrap(), Vec::<u8>::new());
        assert_eq!(source.read(10, 20).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn boxed_source_delegates() {
        let source: Box<dyn ByteSource> = Box::new(MemSource::new(vec![9, 8, 7]));
        assert_eq!(source.size(), 3);
        assert_eq!(source.read(0, 2).unwrap(), vec![9, 8]);
    }
}
