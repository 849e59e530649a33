//! ターミナル描画

mod editor_view;

pub use editor_view::{EditorLayout, EditorView};

use ratatui::style::Color;

/// カラーパレット
pub struct Colors;

impl Colors {
    /// ガターのオフセットラベル
    pub const ADDR: Color = Color::DarkGray;
    /// HEX/ASCIIトークン
    pub const TOKEN: Color = Color::Gray;
    /// ペイン間の罫線
    pub const BORDER: Color = Color::DarkGray;
    /// 選択セルの背景（ミラーされた選択を含む）
    pub const SELECTION_BG: Color = Color::Rgb(0x2A, 0x4A, 0x5A);
    /// フォーカス中ビューのカーソル
    pub const CURSOR: Color = Color::Black;
    /// フォーカス中ビューのカーソル背景
    pub const CURSOR_BG: Color = Color::Rgb(0x8F, 0xDC, 0xFF);
    /// スクロールバーのトラック
    pub const SCROLLBAR_TRACK: Color = Color::DarkGray;
    /// スクロールバーのつまみ
    pub const SCROLLBAR_THUMB: Color = Color::Gray;
    /// ステータスバー
    pub const STATUS_FG: Color = Color::White;
    pub const STATUS_BG: Color = Color::DarkGray;
}
