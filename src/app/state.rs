use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Paragraph,
};
use tracing::{error, info, warn};

use super::{Action, KeyMod, PrefixKey};
use crate::config::Prefs;
use crate::cursor::{self, CursorSync, ViewId};
use crate::source::{ByteSource, FileSource, MemSource, SourceError};
use crate::ui::{Colors, EditorLayout, EditorView};
use crate::window::{ViewOptions, WindowController};

/// プロンプト入力モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    #[default]
    Off,
    /// オフセットジャンプ入力中
    Jump,
}

/// 列数の選択肢
const COLUMN_STEPS: [usize; 5] = [1, 2, 4, 8, 16];

/// アプリケーション状態
pub struct App {
    /// ウィンドウコントローラ
    controller: WindowController<Box<dyn ByteSource>>,
    /// 3ビューのカーソル同期
    cursor: CursorSync,
    /// フォーカス中のペイン
    focus: ViewId,
    /// 表示中のファイル名
    filename: Option<String>,
    /// 永続化される設定
    prefs: Prefs,
    /// 設定ファイルの書き戻し先（Noneなら書き戻さない）
    prefs_path: Option<PathBuf>,
    /// 表示列数
    columns: usize,
    /// 列あたりのバイトグループ数（セッション限り）
    segments: usize,
    /// ウィンドウの行数
    rows: usize,
    /// 終了フラグ
    should_quit: bool,
    /// ステータスメッセージ
    status_message: Option<String>,
    /// 選択行のオフセット表示（統一変更通知で更新される）
    offset_indicator: Option<String>,
    /// プレフィックスキー状態
    prefix_key: PrefixKey,
    /// プロンプト入力モード
    prompt_mode: PromptMode,
    /// プロンプト入力内容
    prompt_input: String,
    /// 直近のペイン配置（マウスヒットテスト用）
    layout: EditorLayout,
}

impl App {
    /// 設定ファイルの値から新しいアプリケーションを作成
    pub fn new(prefs: Prefs) -> Self {
        let mut app = Self {
            controller: WindowController::new(),
            cursor: CursorSync::new(),
            focus: ViewId::HexGrid,
            filename: None,
            columns: prefs.columns.unwrap_or(4),
            segments: 2,
            rows: prefs.rows.unwrap_or(20),
            prefs,
            prefs_path: None,
            should_quit: false,
            status_message: None,
            offset_indicator: None,
            prefix_key: PrefixKey::None,
            prompt_mode: PromptMode::Off,
            prompt_input: String::new(),
            layout: EditorLayout::default(),
        };
        app.apply_config();
        app
    }

    /// CLI引数による上書き（指定されたものだけ）
    pub fn override_config(
        &mut self,
        columns: Option<usize>,
        segments: Option<usize>,
        rows: Option<usize>,
    ) {
        if let Some(columns) = columns {
            self.columns = columns;
        }
        if let Some(segments) = segments {
            self.segments = segments;
        }
        if let Some(rows) = rows {
            self.rows = rows;
        }
        self.apply_config();
    }

    /// ファイルを開く
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let source = FileSource::open(path)?;
        info!(path = %source.path().display(), size = source.size(), "open file");
        self.filename = source.filename().map(str::to_string);
        self.bind(Box::new(source));
        Ok(())
    }

    /// バイト列から読み込み（標準入力用）
    pub fn load_bytes(&mut self, data: Vec<u8>) {
        info!(size = data.len(), "load bytes from stdin");
        self.filename = Some("[stdin]".to_string());
        self.bind(Box::new(MemSource::new(data)));
    }

    fn bind(&mut self, source: Box<dyn ByteSource>) {
        self.controller.bind_source(source);
        self.cursor.clear();
        self.offset_indicator = None;
        self.apply_config();
    }

    /// 終了すべきかどうか
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// 現在の設定をコントローラへ反映してウィンドウを作り直す
    fn apply_config(&mut self) {
        self.controller.configure(ViewOptions {
            columns: Some(self.columns),
            segments: Some(self.segments),
            rows: Some(self.rows),
        });
        // オフセットを新しい行幅の行頭へ揃える
        let config = self.controller.config();
        let w = config.bytes_per_row();
        self.scroll_to(config.offset / w * w);
    }

    /// 設定の書き戻し先を指定する
    pub fn persist_prefs_to(&mut self, path: PathBuf) {
        self.prefs_path = Some(path);
    }

    /// 変更した列数・行数を設定ファイルへ書き戻す
    fn persist_prefs(&mut self) {
        self.prefs.columns = Some(self.columns);
        self.prefs.rows = Some(self.rows);
        let Some(path) = self.prefs_path.clone() else {
            return;
        };
        if let Err(e) = self.prefs.save_to(&path) {
            warn!(error = %e, "failed to save prefs");
            self.status_message = Some(format!("Prefs not saved: {}", e));
        }
    }

    fn report_read_error(&mut self, e: &SourceError) {
        error!(error = %e, "window update failed");
        self.status_message = Some(format!("Read failed: {}", e));
    }

    /// 最後の行頭オフセット
    fn max_offset(&self) -> usize {
        let size = self.controller.size();
        if size == 0 {
            return 0;
        }
        let w = self.controller.config().bytes_per_row();
        (size - 1) / w * w
    }

    /// 末尾行が見えるウィンドウの先頭オフセット
    fn end_offset(&self) -> usize {
        let config = self.controller.config();
        let w = config.bytes_per_row();
        let last_row = self.max_offset() / w;
        (last_row + 1).saturating_sub(config.rows) * w
    }

    /// ビューで選択可能な行数（グリッドはレーンの実トークン数）
    fn max_row(&self, view: ViewId, lane: usize) -> usize {
        let window = self.controller.window();
        match view {
            ViewId::Gutter => window.labels.len(),
            ViewId::HexGrid => window.hex_lanes.get(lane).map_or(0, Vec::len),
            ViewId::AsciiGrid => window.ascii_lanes.get(lane).map_or(0, Vec::len),
        }
    }

    /// カーソル同期が確定したときの統一変更通知
    /// 選択行のオフセットラベルをインジケータへ写す
    fn on_change(&mut self) {
        let labels = &self.controller.window().labels;
        self.offset_indicator = self.cursor.gutter().and_then(|row| labels.get(row).cloned());
    }

    /// スクロール系の移動。ウィンドウを作り直し、選択は解除される
    fn scroll_to(&mut self, offset: usize) {
        match self.controller.update(offset) {
            Ok(true) => {
                self.cursor.clear();
                self.offset_indicator = None;
            }
            Ok(false) => {}
            Err(e) => self.report_read_error(&e),
        }
    }

    /// ウィンドウを行単位でスクロールする
    /// keep があれば同じセルを選び直す（カーソル移動による端スクロール）
    fn scroll_rows(&mut self, delta: isize, keep: Option<(usize, usize)>) {
        let config = self.controller.config();
        let w = config.bytes_per_row();
        let offset = if delta < 0 {
            config.offset.saturating_sub(w * delta.unsigned_abs())
        } else {
            (config.offset + w * delta.unsigned_abs()).min(self.max_offset())
        };
        if offset == config.offset {
            return;
        }

        self.scroll_to(offset);
        if let Some((row, lane)) = keep {
            if row < self.max_row(self.focus, lane)
                && self.cursor.select(self.focus, row, lane)
            {
                self.on_change();
            }
        }
    }

    /// カーソルを行方向に移動する。端ではウィンドウがスクロールする
    fn move_row(&mut self, delta: isize) {
        let Some((row, lane)) = self.cursor.position(self.focus) else {
            // 未選択なら行0を選ぶ
            if self.cursor.focus(self.focus) {
                self.on_change();
            }
            return;
        };

        let rows = self.controller.config().rows;
        if (delta < 0 && row == 0) || (delta > 0 && row + 1 >= rows) {
            self.scroll_rows(delta, Some((row, lane)));
            return;
        }

        let next = row.saturating_add_signed(delta);
        if next >= self.max_row(self.focus, lane) {
            return;
        }
        if self.cursor.select(self.focus, next, lane) {
            self.on_change();
        }
    }

    /// カーソルをレーン方向に移動する
    /// 端のレーンで移動できないときは隣のペインへ抜ける
    fn navigate_lane(&mut self, direction: isize) {
        let Some((row, lane)) = self.cursor.position(self.focus) else {
            if self.cursor.focus(self.focus) {
                self.on_change();
            }
            return;
        };

        let lanes = self.controller.config().bytes_per_row();
        match self.focus {
            ViewId::Gutter => {
                if direction > 0 {
                    self.enter_pane(ViewId::HexGrid, row, 0);
                }
            }
            ViewId::HexGrid => match cursor::navigate(lane, direction, lanes) {
                Some(next) => {
                    if self.cursor.select(ViewId::HexGrid, row, next) {
                        self.on_change();
                    }
                }
                None if direction > 0 => self.enter_pane(ViewId::AsciiGrid, row, 0),
                None => self.enter_pane(ViewId::Gutter, row, 0),
            },
            ViewId::AsciiGrid => match cursor::navigate(lane, direction, lanes) {
                Some(next) => {
                    if self.cursor.select(ViewId::AsciiGrid, row, next) {
                        self.on_change();
                    }
                }
                None if direction < 0 => {
                    self.enter_pane(ViewId::HexGrid, row, lanes.saturating_sub(1));
                }
                // 右端: 抜ける先がない
                None => {}
            },
        }
    }

    /// 隣のペインへフォーカスを移して同じ行を選ぶ
    fn enter_pane(&mut self, view: ViewId, row: usize, lane: usize) {
        self.focus = view;
        if self.cursor.select(view, row, lane) {
            self.on_change();
        }
    }

    /// マウスクリックによるセル選択
    fn select_at(&mut self, view: ViewId, row: usize, lane: usize) {
        if row >= self.max_row(view, lane) {
            return;
        }
        self.focus = view;
        if self.cursor.select(view, row, lane) {
            self.on_change();
        }
    }

    fn page(&mut self, delta: isize) {
        let config = self.controller.config();
        let len = config.window_len();
        let offset = if delta < 0 {
            config.offset.saturating_sub(len)
        } else {
            (config.offset + len).min(self.end_offset())
        };
        self.scroll_to(offset);
    }

    fn change_columns(&mut self, direction: isize) {
        let index = COLUMN_STEPS
            .iter()
            .position(|&c| c >= self.columns)
            .unwrap_or(COLUMN_STEPS.len() - 1);
        let next = index
            .saturating_add_signed(direction)
            .min(COLUMN_STEPS.len() - 1);
        if COLUMN_STEPS[next] == self.columns {
            return;
        }
        self.columns = COLUMN_STEPS[next];
        self.apply_config();
        self.persist_prefs();
    }

    fn change_rows(&mut self, delta: isize) {
        let rows = self.rows.saturating_add_signed(delta).clamp(5, 100);
        if rows == self.rows {
            return;
        }
        self.rows = rows;
        self.apply_config();
        self.persist_prefs();
    }

    /// ジャンプクエリを適用する
    fn jump(&mut self, query: &str) {
        match self.controller.jump_to(query) {
            Ok(true) => {
                self.cursor.clear();
                self.offset_indicator = None;
            }
            Ok(false) => {
                self.status_message = Some(format!("Invalid offset: {}", query.trim()));
            }
            Err(e) => self.report_read_error(&e),
        }
    }

    pub fn execute(&mut self, action: Action) {
        // ステータスメッセージをクリア（プレフィックス表示を除く）
        if !matches!(action, Action::EnterCtrlX) {
            self.status_message = None;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::CursorUp => self.move_row(-1),
            Action::CursorDown => self.move_row(1),
            Action::CursorLeft => self.navigate_lane(-1),
            Action::CursorRight => self.navigate_lane(1),
            Action::PageUp => self.page(-1),
            Action::PageDown => self.page(1),
            Action::GotoBeginning => self.scroll_to(0),
            Action::GotoEnd => {
                let offset = self.end_offset();
                self.scroll_to(offset);
            }
            Action::StartJump => {
                self.prompt_mode = PromptMode::Jump;
                // 選択行のオフセットを初期値にする
                self.prompt_input = self.offset_indicator.clone().unwrap_or_default();
            }
            Action::ColumnsPrev => self.change_columns(-1),
            Action::ColumnsNext => self.change_columns(1),
            Action::RowsLess => self.change_rows(-5),
            Action::RowsMore => self.change_rows(5),
            Action::EnterCtrlX => {
                self.prefix_key = PrefixKey::CtrlX;
                self.status_message = Some("C-x-".to_string());
            }
            Action::Cancel => {
                self.prefix_key = PrefixKey::None;
                self.prompt_mode = PromptMode::Off;
                self.prompt_input.clear();
                self.status_message = Some("Quit".to_string());
            }
            Action::None => {}
        }
    }

    /// イベントを処理
    pub fn handle_event(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        return Ok(());
                    }

                    // プロンプトモード中は特別な処理
                    if self.prompt_mode != PromptMode::Off {
                        self.handle_prompt_key(key);
                        return Ok(());
                    }

                    let mods = KeyMod {
                        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
                        shift: key.modifiers.contains(KeyModifiers::SHIFT),
                        alt: key.modifiers.contains(KeyModifiers::ALT),
                    };

                    let action = match self.prefix_key {
                        PrefixKey::None => Action::from_key(key.code, mods),
                        PrefixKey::CtrlX => {
                            self.prefix_key = PrefixKey::None;
                            Action::from_key_after_ctrl_x(key.code, mods)
                        }
                    };

                    if action != Action::None {
                        self.execute(action);
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    /// プロンプトモード中のキー処理
    fn handle_prompt_key(&mut self, key: crossterm::event::KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            // Escape / C-g: キャンセル
            KeyCode::Esc => self.execute(Action::Cancel),
            KeyCode::Char('g') if ctrl => self.execute(Action::Cancel),
            // Enter: ジャンプ実行
            KeyCode::Enter => {
                let query = std::mem::take(&mut self.prompt_input);
                self.prompt_mode = PromptMode::Off;
                self.status_message = None;
                self.jump(&query);
            }
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Char(ch) if !ctrl => self.prompt_input.push(ch),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_rows(-1, None),
            MouseEventKind::ScrollDown => self.scroll_rows(1, None),
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(ratio) = self.layout.scrollbar_ratio(mouse.column, mouse.row) {
                    // スクロールバー: トラック比率を行頭オフセットに写す
                    match self.controller.scroll_to_ratio(ratio) {
                        Ok(true) => {
                            self.cursor.clear();
                            self.offset_indicator = None;
                        }
                        Ok(false) => {}
                        Err(e) => self.report_read_error(&e),
                    }
                } else if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    if let Some((view, row, lane)) = self.layout.hit(mouse.column, mouse.row) {
                        self.select_at(view, row, lane);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // メイン
                Constraint::Length(1), // ステータス
            ])
            .split(area);

        let config = self.controller.config();
        let lane_count = config.bytes_per_row();
        self.layout = EditorLayout::compute(layout[0], lane_count, config.rows);

        let view = EditorView::new(self.controller.window())
            .lane_count(lane_count)
            .rows(config.rows)
            .cursor(self.cursor)
            .focus(self.focus)
            .scroll(config.offset, self.controller.size());
        frame.render_widget(view, layout[0]);

        // ステータスバー
        let name = self.filename.as_deref().unwrap_or("[No File]");
        let status = if self.prompt_mode == PromptMode::Jump {
            format!("Goto offset (hex): {}_", self.prompt_input)
        } else if let Some(ref msg) = self.status_message {
            format!(" {} | {}", name, msg)
        } else if let Some(ref offset) = self.offset_indicator {
            format!(
                " {} | {} | {}x{} | {} rows",
                name, offset, self.columns, self.segments, self.rows
            )
        } else {
            format!(
                " {} | {:08X} bytes | {}x{} | {} rows",
                name,
                self.controller.size(),
                self.columns,
                self.segments,
                self.rows
            )
        };
        let status_widget =
            Paragraph::new(status).style(Style::default().bg(Colors::STATUS_BG).fg(Colors::STATUS_FG));
        frame.render_widget(status_widget, layout[1]);
    }
}
