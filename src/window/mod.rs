//! ウィンドウコントローラ
//!
//! スクロール位置とグリッド設定からフェッチすべきバイト範囲を計算し、
//! ソースから読み出した窓を Formatter → Reshaper → Labeler に通して
//! 3ビュー分の表示内容を組み立てる。

use tracing::debug;

use crate::grid;
use crate::source::{ByteSource, SourceError};

/// 表示グリッドの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    /// 表示列数
    pub columns: usize,
    /// 列あたりのバイトグループ数
    pub segments: usize,
    /// ウィンドウの行数
    pub rows: usize,
    /// ウィンドウ先頭のバイトオフセット
    /// 常に columns × segments の倍数
    pub offset: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { columns: 4, segments: 2, rows: 20, offset: 0 }
    }
}

impl ViewConfig {
    /// 1行あたりのバイト数（0なら8にフォールバック）
    pub fn bytes_per_row(&self) -> usize {
        grid::lane_count(self.columns, self.segments)
    }

    /// ウィンドウ全体のバイト数
    pub fn window_len(&self) -> usize {
        self.columns * self.segments * self.rows
    }
}

/// `configure` に渡す部分的な設定
/// 未指定の項目は既定値（4 / 2 / 20）に戻る
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    pub columns: Option<usize>,
    pub segments: Option<usize>,
    pub rows: Option<usize>,
}

/// 1回の update で組み立てられる表示内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    /// 行頭オフセットのラベル（ガター）
    pub labels: Vec<String>,
    /// HEXトークンのレーン
    pub hex_lanes: Vec<Vec<String>>,
    /// ASCIIトークンのレーン
    pub ascii_lanes: Vec<Vec<String>>,
}

/// ウィンドウコントローラ
///
/// ViewConfig と現在のウィンドウを所有する。update が成功すると
/// オフセットとウィンドウの両方が置き換わり、失敗するとどちらも
/// 変化しない。
pub struct WindowController<S> {
    config: ViewConfig,
    source: Option<S>,
    window: Window,
}

impl<S: ByteSource> WindowController<S> {
    pub fn new() -> Self {
        Self {
            config: ViewConfig::default(),
            source: None,
            window: Window::default(),
        }
    }

    /// 現在の設定
    pub fn config(&self) -> ViewConfig {
        self.config
    }

    /// 現在のウィンドウ
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// ソースの全体サイズ（未束縛なら0）
    pub fn size(&self) -> usize {
        self.source.as_ref().map_or(0, |source| source.size())
    }

    /// ソースが束縛されているか
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// 設定をマージする。再描画は行わない（呼び出し側が update を呼ぶ）
    pub fn configure(&mut self, options: ViewOptions) {
        self.config.columns = options.columns.unwrap_or(4);
        self.config.segments = options.segments.unwrap_or(2);
        self.config.rows = options.rows.unwrap_or(20);
    }

    /// ソースを束縛し、以前のウィンドウを破棄する
    pub fn bind_source(&mut self, source: S) {
        debug!(size = source.size(), "bind source");
        self.source = Some(source);
        self.window = Window::default();
    }

    /// 現在のオフセットでウィンドウを再構築
    pub fn refresh(&mut self) -> Result<bool, SourceError> {
        self.update(self.config.offset)
    }

    /// オフセットを設定してウィンドウを再構築
    ///
    /// ソース未束縛なら何もせず Ok(false)。読み出しに失敗した場合は
    /// オフセットもウィンドウも変更されない。
    pub fn update(&mut self, offset: usize) -> Result<bool, SourceError> {
        let Some(source) = &self.source else {
            return Ok(false);
        };

        let config = self.config;
        let len = config.window_len();
        let bytes = source.read(offset, offset + len)?;
        debug!(offset, requested = len, got = bytes.len(), "update window");

        self.config.offset = offset;
        self.window = Window {
            labels: grid::row_offsets(offset, config.columns, config.segments, config.rows),
            hex_lanes: grid::reshape(&grid::to_hex(&bytes), config.columns, config.segments),
            ascii_lanes: grid::reshape(&grid::to_ascii(&bytes), config.columns, config.segments),
        };
        Ok(true)
    }

    /// 16進文字列のオフセットへジャンプ
    ///
    /// パース不能、またはサイズ以上なら状態を変えずに Ok(false)。
    /// 有効なら行頭（columns × segments の倍数）へ切り捨ててから
    /// update する。
    pub fn jump_to(&mut self, query: &str) -> Result<bool, SourceError> {
        let Some(parsed) = parse_hex_offset(query) else {
            return Ok(false);
        };
        let Some(source) = &self.source else {
            return Ok(false);
        };
        if parsed >= source.size() {
            return Ok(false);
        }

        let w = self.config.bytes_per_row();
        let aligned = (parsed / w) * w;
        self.update(aligned)
    }

    /// スクロール比率 [0,1] からウィンドウ先頭オフセットを計算する
    ///
    /// 行頭に揃うよう切り上げ方向に丸める。同じ引数に対して常に
    /// 同じ値を返す純粋関数。
    pub fn offset_for_ratio(ratio: f64, size: usize, columns: usize, segments: usize) -> usize {
        let w = grid::lane_count(columns, segments);
        ((size as f64 * ratio) / w as f64).ceil() as usize * w
    }

    /// スクロール比率を適用してウィンドウを再構築
    pub fn scroll_to_ratio(&mut self, ratio: f64) -> Result<bool, SourceError> {
        let config = self.config;
        let offset =
            Self::offset_for_ratio(ratio, self.size(), config.columns, config.segments);
        self.update(offset)
    }
}

impl<S: ByteSource> Default for WindowController<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// 16進文字列をオフセットにパースする（"0x"プレフィックスは任意）
fn parse_hex_offset(s: &str) -> Option<usize> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    usize::from_str_radix(s, 16).ok()
}
