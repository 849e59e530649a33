//! カーソル同期
//!
//! ガター / HEX / ASCII の3ビューの選択状態をひとつの状態機械として
//! 保持する。どれか1つのビューで選択が変わると残り2つへ反映し、
//! ホストへの変更通知はちょうど1回だけ発生する。

/// ビュー識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    Gutter,
    HexGrid,
    AsciiGrid,
}

/// 3ビューの選択状態
///
/// ガターは行のみ、HEX/ASCIIは (行, レーン) を持つ。未選択は None。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorSync {
    gutter: Option<usize>,
    hex: Option<(usize, usize)>,
    ascii: Option<(usize, usize)>,
}

impl CursorSync {
    /// 全ビュー未選択の初期状態
    pub fn new() -> Self {
        Self::default()
    }

    /// ガターの選択行
    pub fn gutter(&self) -> Option<usize> {
        self.gutter
    }

    /// HEXグリッドの選択位置 (行, レーン)
    pub fn hex(&self) -> Option<(usize, usize)> {
        self.hex
    }

    /// ASCIIグリッドの選択位置 (行, レーン)
    pub fn ascii(&self) -> Option<(usize, usize)> {
        self.ascii
    }

    /// 指定ビューの選択位置 (行, レーン)
    /// ガターのレーンは常に0として返す
    pub fn position(&self, view: ViewId) -> Option<(usize, usize)> {
        match view {
            ViewId::Gutter => self.gutter.map(|row| (row, 0)),
            ViewId::HexGrid => self.hex,
            ViewId::AsciiGrid => self.ascii,
        }
    }

    /// ビューの選択変更を適用する
    ///
    /// 発生元ビューが既に同じ位置を保持していれば何も起きない
    /// （エコー抑止）。それ以外は残り2ビューへ反映し、ホストへ
    /// 1回だけ変更通知を上げるべきことを true で返す。
    ///
    /// ガターが発生元のときは両グリッドのレーンを0にする。
    pub fn select(&mut self, view: ViewId, row: usize, lane: usize) -> bool {
        match view {
            ViewId::Gutter => {
                if self.gutter == Some(row) {
                    return false;
                }
                self.gutter = Some(row);
                self.hex = Some((row, 0));
                self.ascii = Some((row, 0));
            }
            ViewId::HexGrid => {
                if self.hex == Some((row, lane)) {
                    return false;
                }
                self.hex = Some((row, lane));
                self.ascii = Some((row, lane));
                self.gutter = Some(row);
            }
            ViewId::AsciiGrid => {
                if self.ascii == Some((row, lane)) {
                    return false;
                }
                self.ascii = Some((row, lane));
                self.hex = Some((row, lane));
                self.gutter = Some(row);
            }
        }
        true
    }

    /// フォーカス取得時の選択
    ///
    /// 未選択のビューがフォーカスを得たら行0（レーン0）を選択して
    /// 変更通知を上げる。選択済みなら何もしない。
    pub fn focus(&mut self, view: ViewId) -> bool {
        if self.position(view).is_some() {
            return false;
        }
        self.select(view, 0, 0)
    }

    /// 全ビューを未選択に戻す（ウィンドウ再構築後に呼ぶ）
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// 列ナビゲーションの判定
///
/// 隣のレーンが存在すれば移動先のレーン番号を返す。存在しなければ
/// None（リクエストは未処理のまま、フォーカスはグリッド外へ抜ける）。
pub fn navigate(lane: usize, direction: isize, lane_count: usize) -> Option<usize> {
    let target = lane as isize + direction;
    if target < 0 || target as usize >= lane_count {
        None
    } else {
        Some(target as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_selection_mirrors_to_gutter_and_ascii() {
        let mut sync = CursorSync::new();
        assert!(sync.select(ViewId::HexGrid, 5, 2));
        assert_eq!(sync.gutter(), Some(5));
        assert_eq!(sync.hex(), Some((5, 2)));
        assert_eq!(sync.ascii(), Some((5, 2)));
    }

    #[test]
    fn repeated_selection_raises_no_second_change() {
        let mut sync = CursorSync::new();
        assert!(sync.select(ViewId::HexGrid, 5, 2));
        assert!(!sync.select(ViewId::HexGrid, 5, 2));
        // 反対側のグリッドからの同位置も、状態が既に一致していれば抑止される
        assert!(!sync.select(ViewId::AsciiGrid, 5, 2));
    }

    #[test]
    fn gutter_selection_forces_lane_zero() {
        let mut sync = CursorSync::new();
        sync.select(ViewId::HexGrid, 3, 6);
        assert!(sync.select(ViewId::Gutter, 4, 0));
        assert_eq!(sync.hex(), Some((4, 0)));
        assert_eq!(sync.ascii(), Some((4, 0)));
    }

    #[test]
    fn gutter_reselect_same_row_is_suppressed() {
        let mut sync = CursorSync::new();
        sync.select(ViewId::Gutter, 2, 0);
        assert!(!sync.select(ViewId::Gutter, 2, 9));
    }

    #[test]
    fn ascii_selection_mirrors_to_hex() {
        let mut sync = CursorSync::new();
        assert!(sync.select(ViewId::AsciiGrid, 1, 7));
        assert_eq!(sync.hex(), Some((1, 7)));
        assert_eq!(sync.gutter(), Some(1));
    }

    #[test]
    fn focus_on_unselected_view_selects_origin() {
        let mut sync = CursorSync::new();
        assert!(sync.focus(ViewId::HexGrid));
        assert_eq!(sync.hex(), Some((0, 0)));
        // 選択済みなら何も起きない
        assert!(!sync.focus(ViewId::AsciiGrid));
        assert!(!sync.focus(ViewId::HexGrid));
    }

    #[test]
    fn clear_returns_all_views_to_unselected() {
        let mut sync = CursorSync::new();
        sync.select(ViewId::HexGrid, 5, 2);
        sync.clear();
        assert_eq!(sync.gutter(), None);
        assert_eq!(sync.hex(), None);
        assert_eq!(sync.ascii(), None);
    }

    #[test]
    fn navigate_moves_within_bounds() {
        assert_eq!(navigate(0, 1, 8), Some(1));
        assert_eq!(navigate(6, 1, 8), Some(7));
        assert_eq!(navigate(3, -1, 8), Some(2));
    }

    #[test]
    fn navigate_declines_at_edges() {
        assert_eq!(navigate(7, 1, 8), None);
        assert_eq!(navigate(0, -1, 8), None);
        assert_eq!(navigate(0, 1, 1), None);
    }
}
