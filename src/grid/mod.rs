//! バイト列から表示トークンへの変換と、列優先グリッドへの再配置

/// 1行あたりのレーン数（columns × segments、0なら8にフォールバック）
pub fn lane_count(columns: usize, segments: usize) -> usize {
    let w = columns * segments;
    if w == 0 { 8 } else { w }
}

/// バイト列を2桁大文字HEXトークンに変換
pub fn to_hex(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// バイト列をASCIIトークンに変換
/// 32と160はNBSP、印字可能範囲 [33,126] はその文字、それ以外は '.'
pub fn to_ascii(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|&b| ascii_token(b).to_string()).collect()
}

fn ascii_token(byte: u8) -> char {
    if byte == 32 || byte == 160 {
        '\u{00A0}'
    } else if byte < 33 || byte > 126 {
        '.'
    } else {
        byte as char
    }
}

/// フラットなトークン列を列優先のレーンに再配置
///
/// レーン `i` には `tokens[i], tokens[i+W], tokens[i+2W], …` が入る。
/// 入力長がWの倍数でない場合、末尾の不完全な行は先頭側のレーンにだけ
/// 入る（パディングしない）。
pub fn reshape<T: Clone>(tokens: &[T], columns: usize, segments: usize) -> Vec<Vec<T>> {
    let width = lane_count(columns, segments);
    let mut lanes: Vec<Vec<T>> = vec![Vec::new(); width];

    let mut m = 0;
    loop {
        for (n, lane) in lanes.iter_mut().enumerate() {
            match tokens.get(m + n) {
                Some(token) => lane.push(token.clone()),
                None => return lanes,
            }
        }
        m += width;
    }
}

/// ウィンドウ各行の先頭オフセットを8桁大文字HEXで返す
/// ファイルサイズに対するクリップは行わない（呼び出し側の責務）
pub fn row_offsets(base: usize, columns: usize, segments: usize, rows: usize) -> Vec<String> {
    (0..rows)
        .map(|n| format!("{:08X}", base + n * columns * segments))
        .collect()
}
