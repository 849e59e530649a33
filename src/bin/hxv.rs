use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend};

use hxv::app::App;
use hxv::config::Prefs;
use hxv::logging;

/// Terminal hex viewer
#[derive(Parser, Debug)]
#[command(name = "hxv")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Display columns (default: 4, or the saved preference)
    #[arg(short, long)]
    columns: Option<usize>,

    /// Byte groups per column (default: 2)
    #[arg(short, long)]
    segments: Option<usize>,

    /// Window rows (default: 20, or the saved preference)
    #[arg(short, long)]
    rows: Option<usize>,

    /// Log file path (default: state dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ログはファイルへ。失敗してもビューアは起動する
    let log_path = args.log_file.clone().unwrap_or_else(logging::default_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    // 標準入力からデータを読み込む（パイプされている場合）
    let stdin_data = if !io::stdin().is_terminal() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        Some(data)
    } else {
        None
    };

    // ターミナルの初期化
    // スクロールバーとセル選択のためマウスキャプチャを有効にする
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // アプリケーションの実行
    let result = run_app(&mut terminal, args, stdin_data);

    // ターミナルの後処理
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    args: Args,
    stdin_data: Option<Vec<u8>>,
) -> Result<()> {
    // 設定ファイル → CLI引数の順で適用
    let mut app = App::new(Prefs::load());
    if let Some(path) = Prefs::default_path() {
        app.persist_prefs_to(path);
    }
    app.override_config(args.columns, args.segments, args.rows);

    // データを読み込む（優先順位: ファイル > 標準入力）
    if let Some(ref path) = args.file {
        app.open(path)?;
    } else if let Some(data) = stdin_data {
        app.load_bytes(data);
    }

    // ウィンドウタイトルを設定
    update_title(terminal.backend_mut(), &app)?;

    // メインループ
    loop {
        terminal.draw(|f| app.draw(f))?;

        app.handle_event()?;

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// ウィンドウタイトルを更新
fn update_title(backend: &mut CrosstermBackend<io::Stdout>, app: &App) -> Result<()> {
    let title = format!("hxv - {}", app.filename().unwrap_or("[No File]"));
    execute!(backend, SetTitle(&title))?;
    Ok(())
}
