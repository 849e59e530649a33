use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use super::Colors;
use crate::cursor::{CursorSync, ViewId};
use crate::window::Window;

/// ガターの表示幅（8桁ラベル）
const GUTTER_WIDTH: u16 = 8;
/// ペインと罫線の間の空白
const GAP: u16 = 1;
/// このレーン数ごとに区切り空白を入れる
const SEPARATION_EVERY: usize = 4;
/// 区切り空白の幅
const SEPARATION_WIDTH: u16 = 2;

/// レーンのペイン内X位置
fn lane_x(lane: usize, cell_width: u16) -> u16 {
    lane as u16 * cell_width + SEPARATION_WIDTH * (lane / SEPARATION_EVERY) as u16
}

/// ペインの幅
fn pane_width(lane_count: usize, cell_width: u16) -> u16 {
    lane_x(lane_count.saturating_sub(1), cell_width) + cell_width
}

/// 3ペイン＋スクロールバーの配置
///
/// 描画とマウスヒットテストが同じ座標を使うよう、配置計算を
/// ここに集約する。
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorLayout {
    pub gutter: Rect,
    pub hex: Rect,
    pub ascii: Rect,
    pub scrollbar: Rect,
    lane_count: usize,
}

impl EditorLayout {
    pub fn compute(area: Rect, lane_count: usize, rows: usize) -> Self {
        let height = (rows as u16).min(area.height);
        let hex_width = pane_width(lane_count, 2);
        let ascii_width = pane_width(lane_count, 1);

        let gutter = Rect {
            x: area.x,
            y: area.y,
            width: GUTTER_WIDTH.min(area.width),
            height,
        };
        // ガター | 罫線 | HEX | 罫線 | ASCII | スクロールバー
        let hex_x = gutter.x + GUTTER_WIDTH + GAP + 1 + GAP;
        let hex = Rect { x: hex_x, y: area.y, width: hex_width, height };
        let ascii_x = hex_x + hex_width + GAP + 1 + GAP;
        let ascii = Rect { x: ascii_x, y: area.y, width: ascii_width, height };
        let scrollbar = Rect {
            x: ascii_x + ascii_width + GAP,
            y: area.y,
            width: 1,
            height,
        };

        Self {
            gutter: gutter.intersection(area),
            hex: hex.intersection(area),
            ascii: ascii.intersection(area),
            scrollbar: scrollbar.intersection(area),
            lane_count,
        }
    }

    /// ペイン内のセル位置を引く
    fn cell_at(pane: Rect, x: u16, y: u16, lane_count: usize, cell_width: u16) -> Option<(usize, usize)> {
        if !pane.contains((x, y).into()) {
            return None;
        }
        let row = (y - pane.y) as usize;
        let rel = x - pane.x;
        for lane in 0..lane_count {
            let start = lane_x(lane, cell_width);
            if rel >= start && rel < start + cell_width {
                return Some((row, lane));
            }
        }
        None
    }

    /// 座標からビューとセルを特定する（区切り空白や罫線はNone）
    pub fn hit(&self, x: u16, y: u16) -> Option<(ViewId, usize, usize)> {
        if self.gutter.contains((x, y).into()) {
            return Some((ViewId::Gutter, (y - self.gutter.y) as usize, 0));
        }
        if let Some((row, lane)) = Self::cell_at(self.hex, x, y, self.lane_count, 2) {
            return Some((ViewId::HexGrid, row, lane));
        }
        if let Some((row, lane)) = Self::cell_at(self.ascii, x, y, self.lane_count, 1) {
            return Some((ViewId::AsciiGrid, row, lane));
        }
        None
    }

    /// スクロールバー上の座標をトラック比率に変換する
    pub fn scrollbar_ratio(&self, x: u16, y: u16) -> Option<f64> {
        if self.scrollbar.height == 0 || !self.scrollbar.contains((x, y).into()) {
            return None;
        }
        Some(f64::from(y - self.scrollbar.y) / f64::from(self.scrollbar.height))
    }
}

/// ガター / HEX / ASCII の3ペインを描画するウィジェット
pub struct EditorView<'a> {
    window: &'a Window,
    lane_count: usize,
    rows: usize,
    cursor: CursorSync,
    focus: ViewId,
    offset: usize,
    size: usize,
}

impl<'a> EditorView<'a> {
    pub fn new(window: &'a Window) -> Self {
        Self {
            window,
            lane_count: 8,
            rows: 20,
            cursor: CursorSync::new(),
            focus: ViewId::HexGrid,
            offset: 0,
            size: 0,
        }
    }

    pub fn lane_count(mut self, lane_count: usize) -> Self {
        self.lane_count = lane_count;
        self
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn cursor(mut self, cursor: CursorSync) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn focus(mut self, focus: ViewId) -> Self {
        self.focus = focus;
        self
    }

    /// スクロールバー表示用のオフセットとファイルサイズ
    pub fn scroll(mut self, offset: usize, size: usize) -> Self {
        self.offset = offset;
        self.size = size;
        self
    }

    /// セルのスタイルを決める
    fn cell_style(&self, view: ViewId, selected: bool) -> Style {
        if selected {
            if self.focus == view {
                Style::default().fg(Colors::CURSOR).bg(Colors::CURSOR_BG)
            } else {
                Style::default().fg(Colors::TOKEN).bg(Colors::SELECTION_BG)
            }
        } else if view == ViewId::Gutter {
            Style::default().fg(Colors::ADDR)
        } else {
            Style::default().fg(Colors::TOKEN)
        }
    }

    fn render_gutter(&self, pane: Rect, buf: &mut Buffer) {
        for (row, label) in self.window.labels.iter().enumerate() {
            if row >= pane.height as usize {
                break;
            }
            let selected = self.cursor.gutter() == Some(row);
            let style = self.cell_style(ViewId::Gutter, selected);
            buf.set_string(pane.x, pane.y + row as u16, label, style);
        }
    }

    fn render_lanes(
        &self,
        pane: Rect,
        buf: &mut Buffer,
        lanes: &[Vec<String>],
        cell_width: u16,
        view: ViewId,
    ) {
        let selection = match view {
            ViewId::HexGrid => self.cursor.hex(),
            ViewId::AsciiGrid => self.cursor.ascii(),
            ViewId::Gutter => None,
        };
        for (lane, tokens) in lanes.iter().enumerate().take(self.lane_count) {
            let x = pane.x + lane_x(lane, cell_width);
            if x >= pane.right() {
                break;
            }
            for (row, token) in tokens.iter().enumerate() {
                if row >= pane.height as usize {
                    break;
                }
                let selected = selection == Some((row, lane));
                let style = self.cell_style(view, selected);
                buf.set_string(x, pane.y + row as u16, token, style);
            }
        }
    }

    fn render_border(x: u16, area: Rect, height: u16, buf: &mut Buffer) {
        if x >= area.right() {
            return;
        }
        for row in 0..height {
            buf.set_string(x, area.y + row, "\u{2502}", Style::default().fg(Colors::BORDER));
        }
    }

    fn render_scrollbar(&self, track: Rect, buf: &mut Buffer) {
        if track.height == 0 || self.size == 0 {
            return;
        }
        let track_len = usize::from(track.height);
        let window_len = self.lane_count * self.rows;
        let thumb_len = (track_len * window_len / self.size).clamp(1, track_len);
        let thumb_start = (track_len * self.offset / self.size).min(track_len - thumb_len);

        for row in 0..track_len {
            let (glyph, color) = if row >= thumb_start && row < thumb_start + thumb_len {
                ("\u{2588}", Colors::SCROLLBAR_THUMB)
            } else {
                ("\u{2502}", Colors::SCROLLBAR_TRACK)
            };
            buf.set_string(track.x, track.y + row as u16, glyph, Style::default().fg(color));
        }
    }
}

impl Widget for EditorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = EditorLayout::compute(area, self.lane_count, self.rows);
        let height = layout.gutter.height;

        self.render_gutter(layout.gutter, buf);
        Self::render_border(layout.hex.x.saturating_sub(1 + GAP), area, height, buf);
        self.render_lanes(layout.hex, buf, &self.window.hex_lanes, 2, ViewId::HexGrid);
        Self::render_border(layout.ascii.x.saturating_sub(1 + GAP), area, height, buf);
        self.render_lanes(layout.ascii, buf, &self.window.ascii_lanes, 1, ViewId::AsciiGrid);
        self.render_scrollbar(layout.scrollbar, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> EditorLayout {
        // 8レーン、20行、十分な広さ
        EditorLayout::compute(Rect::new(0, 0, 80, 24), 8, 20)
    }

    #[test]
    fn panes_do_not_overlap() {
        let layout = layout();
        assert!(layout.gutter.right() < layout.hex.x);
        assert!(layout.hex.right() < layout.ascii.x);
        assert!(layout.ascii.right() <= layout.scrollbar.x);
    }

    #[test]
    fn lane_x_inserts_separation_after_fourth_lane() {
        assert_eq!(lane_x(0, 2), 0);
        assert_eq!(lane_x(3, 2), 6);
        // レーン4の手前に区切り空白
        assert_eq!(lane_x(4, 2), 10);
        assert_eq!(lane_x(7, 2), 16);
    }

    #[test]
    fn hit_resolves_cells_in_each_pane() {
        let layout = layout();
        assert_eq!(layout.hit(layout.gutter.x + 3, 5), Some((ViewId::Gutter, 5, 0)));
        assert_eq!(layout.hit(layout.hex.x, 0), Some((ViewId::HexGrid, 0, 0)));
        assert_eq!(
            layout.hit(layout.hex.x + lane_x(4, 2), 2),
            Some((ViewId::HexGrid, 2, 4))
        );
        assert_eq!(
            layout.hit(layout.ascii.x + lane_x(7, 1), 3),
            Some((ViewId::AsciiGrid, 3, 7))
        );
    }

    #[test]
    fn hit_misses_separation_gap_and_borders() {
        let layout = layout();
        // レーン3とレーン4の間の区切り空白
        let gap_x = layout.hex.x + lane_x(3, 2) + 2;
        assert_eq!(layout.hit(gap_x, 0), None);
        // ガターとHEXの間の罫線
        assert_eq!(layout.hit(layout.hex.x - 1 - GAP, 0), None);
    }

    #[test]
    fn scrollbar_ratio_spans_track() {
        let layout = layout();
        let track = layout.scrollbar;
        assert_eq!(layout.scrollbar_ratio(track.x, track.y), Some(0.0));
        let mid = layout.scrollbar_ratio(track.x, track.y + track.height / 2).unwrap();
        assert!((mid - 0.5).abs() < 0.1);
        assert_eq!(layout.scrollbar_ratio(track.x + 1, track.y), None);
    }

    #[test]
    fn renders_tokens_into_buffer() {
        let window = Window {
            labels: vec!["00000000".into(), "00000008".into()],
            hex_lanes: vec![vec!["41".into(), "42".into()]; 8],
            ascii_lanes: vec![vec!["A".into(), "B".into()]; 8],
        };
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        EditorView::new(&window)
            .lane_count(8)
            .rows(2)
            .scroll(0, 16)
            .render(area, &mut buf);

        let layout = EditorLayout::compute(area, 8, 2);
        // ガターのラベル
        assert_eq!(buf[(layout.gutter.x, 0)].symbol(), "0");
        // HEXレーン0の行0は "41"
        assert_eq!(buf[(layout.hex.x, 0)].symbol(), "4");
        assert_eq!(buf[(layout.hex.x + 1, 0)].symbol(), "1");
        // ASCIIレーン0の行1は "B"
        assert_eq!(buf[(layout.ascii.x, 1)].symbol(), "B");
    }
}
