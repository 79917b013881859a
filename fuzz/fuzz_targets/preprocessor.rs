#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use gclens_gc_parser::{ParserConfig, preprocess};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 물리 라인 목록
    lines: Vec<String>,
    /// 조각 상한 (256 바이트 이상으로 보정)
    max_fragment_bytes: u16,
}

fuzz_target!(|input: FuzzInput| {
    let config = ParserConfig {
        max_fragment_bytes: usize::from(input.max_fragment_bytes).max(256),
        ..ParserConfig::default()
    };
    let Ok(once) = preprocess(&config, &input.lines) else {
        return;
    };

    // 출력 라인 번호는 입력 범위 안에 있다
    for line in &once {
        assert!(line.line_number >= 1 && line.line_number <= input.lines.len());
    }
});
