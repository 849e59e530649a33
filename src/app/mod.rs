mod state;

pub use state::App;

use crossterm::event::KeyCode;

/// プレフィックスキー状態（2ストローク用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixKey {
    #[default]
    None,
    /// C-x を押した状態
    CtrlX,
}

/// アプリケーションアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,

    // カーソル移動
    CursorUp,
    CursorDown,
    /// 左のレーンへ（端ではペインを抜ける）
    CursorLeft,
    /// 右のレーンへ（端ではペインを抜ける）
    CursorRight,
    PageUp,
    PageDown,
    GotoBeginning,
    GotoEnd,

    // ジャンプ
    StartJump,

    // 表示設定
    ColumnsPrev,
    ColumnsNext,
    RowsLess,
    RowsMore,

    // プレフィックスキー
    EnterCtrlX,
    Cancel,

    None,
}

/// キー修飾子
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMod {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Action {
    /// キーコードからアクションに変換（Emacs風キーバインド）
    pub fn from_key(key: KeyCode, mods: KeyMod) -> Self {
        let KeyMod { ctrl, shift, alt } = mods;

        match (key, ctrl, alt, shift) {
            // === プレフィックスキー ===
            (KeyCode::Char('x'), true, false, false) => Action::EnterCtrlX,

            // C-g: キャンセル
            (KeyCode::Char('g'), true, false, false) => Action::Cancel,
            (KeyCode::Esc, _, _, _) => Action::Cancel,

            // === カーソル移動 ===
            (KeyCode::Char('f'), true, false, false) => Action::CursorRight,
            (KeyCode::Char('b'), true, false, false) => Action::CursorLeft,
            (KeyCode::Char('n'), true, false, false) => Action::CursorDown,
            (KeyCode::Char('p'), true, false, false) => Action::CursorUp,
            // C-v: ページダウン / M-v: ページアップ
            (KeyCode::Char('v'), true, false, false) => Action::PageDown,
            (KeyCode::Char('v'), false, true, false) => Action::PageUp,
            // M-< : 先頭 / M-> : 末尾
            (KeyCode::Char('<'), false, true, _) => Action::GotoBeginning,
            (KeyCode::Char('>'), false, true, _) => Action::GotoEnd,

            // 矢印キー
            (KeyCode::Up, false, false, false) => Action::CursorUp,
            (KeyCode::Down, false, false, false) => Action::CursorDown,
            (KeyCode::Left, false, false, false) => Action::CursorLeft,
            (KeyCode::Right, false, false, false) => Action::CursorRight,
            // Tabでも隣のレーンへ移る
            (KeyCode::Tab, false, false, _) => Action::CursorRight,
            (KeyCode::BackTab, _, _, _) => Action::CursorLeft,
            (KeyCode::Home, _, _, _) => Action::GotoBeginning,
            (KeyCode::End, _, _, _) => Action::GotoEnd,
            (KeyCode::PageUp, _, _, _) => Action::PageUp,
            (KeyCode::PageDown, _, _, _) => Action::PageDown,

            // ジャンプ
            (KeyCode::Char('g'), false, false, false) => Action::StartJump,

            // 表示設定
            (KeyCode::Char('['), false, false, _) => Action::ColumnsPrev,
            (KeyCode::Char(']'), false, false, _) => Action::ColumnsNext,
            (KeyCode::Char('{'), false, false, _) => Action::RowsLess,
            (KeyCode::Char('}'), false, false, _) => Action::RowsMore,

            // 終了
            (KeyCode::Char('q'), false, false, false) => Action::Quit,

            _ => Action::None,
        }
    }

    /// C-x の後のキーを処理
    pub fn from_key_after_ctrl_x(key: KeyCode, mods: KeyMod) -> Self {
        let KeyMod { ctrl, .. } = mods;

        match (key, ctrl) {
            // C-x C-c: 終了
            (KeyCode::Char('c'), true) => Action::Quit,

            // C-g: キャンセル
            (KeyCode::Char('g'), true) => Action::Cancel,
            (KeyCode::Esc, _) => Action::Cancel,

            // その他は無効
            _ => Action::Cancel,
        }
    }
}
