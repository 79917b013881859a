#![no_main]

use libfuzzer_sys::fuzz_target;

use gclens_gc_parser::{GcLogParser, ParserConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(parser) = GcLogParser::new(ParserConfig::default()) else {
        return;
    };
    // 읽기 실패가 없는 입력이므로 항상 성공해야 한다
    let run = parser
        .parse_reader(data)
        .expect("in-memory reader cannot fail");
    assert_eq!(
        run.canonical_lines,
        run.events.len() + run.unidentified.len()
    );
});
