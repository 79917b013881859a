//! 실행 조립 -- 전처리와 디스패치를 묶어 한 로그 전체를 파싱
//!
//! [`GcLogParser`]는 설정 하나로 생성되며, 라인 반복자나 [`BufRead`] 스트림을
//! 받아 [`ParsedRun`]을 만듭니다. 스트림 읽기 실패만이 치명적 에러이며,
//! 해석할 수 없는 라인은 미식별 라인으로 기록하고 계속 진행합니다.
//!
//! # 사용 예시
//! ```ignore
//! use gclens_gc_parser::{GcLogParser, ParserConfig};
//!
//! let parser = GcLogParser::new(ParserConfig::default())?;
//! let run = parser.parse_reader(std::io::BufReader::new(file))?;
//! println!("{} events, {} unidentified", run.events.len(), run.unidentified.len());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gclens_core::types::{EventKind, LogEvent, UnidentifiedLine};

use crate::config::ParserConfig;
use crate::dispatch::{Dispatched, Dispatcher};
use crate::error::GcLogError;
use crate::preprocess::{CanonicalLine, Preprocessor};

/// 한 로그 파일의 파싱 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRun {
    /// 식별된 이벤트 (입력 순서)
    pub events: Vec<LogEvent>,
    /// 미식별 라인 (입력 순서)
    pub unidentified: Vec<UnidentifiedLine>,
    /// 읽은 물리 라인 수
    pub lines_read: usize,
    /// 전처리 후 논리 라인 수
    pub canonical_lines: usize,
    supplied_vm_options: Option<String>,
}

impl ParsedRun {
    /// 등장한 이벤트 종류 집합
    pub fn event_kinds(&self) -> BTreeSet<EventKind> {
        self.events.iter().map(LogEvent::kind).collect()
    }

    /// JVM 옵션 문자열
    ///
    /// 외부에서 제공한 값이 우선이며, 없으면 `CommandLine flags:` 헤더를 사용합니다.
    pub fn vm_options(&self) -> Option<&str> {
        self.supplied_vm_options.as_deref().or_else(|| {
            self.events.iter().find_map(|event| match event {
                LogEvent::HeaderCommandLineFlags(data) => Some(data.flags.as_str()),
                _ => None,
            })
        })
    }

    /// 실행 요약
    pub fn summary(&self) -> RunSummary {
        let mut kinds = BTreeMap::new();
        let mut total_pause_ms = 0u64;
        let mut max_pause_ms = 0u64;
        for event in &self.events {
            *kinds.entry(event.kind()).or_insert(0usize) += 1;
            if event.kind().is_blocking() {
                total_pause_ms = total_pause_ms.saturating_add(event.duration_ms());
                max_pause_ms = max_pause_ms.max(event.duration_ms());
            }
        }

        let timestamps = self
            .events
            .iter()
            .filter(|event| !event.kind().is_header())
            .map(LogEvent::timestamp_ms);

        RunSummary {
            lines_read: self.lines_read,
            canonical_lines: self.canonical_lines,
            events: self.events.len(),
            unidentified: self.unidentified.len(),
            kinds,
            first_timestamp_ms: timestamps.clone().min(),
            last_timestamp_ms: timestamps.max(),
            total_pause_ms,
            max_pause_ms,
        }
    }
}

/// 실행 요약 (CLI 출력용)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub lines_read: usize,
    pub canonical_lines: usize,
    pub events: usize,
    pub unidentified: usize,
    /// 종류별 이벤트 수
    pub kinds: BTreeMap<EventKind, usize>,
    pub first_timestamp_ms: Option<u64>,
    pub last_timestamp_ms: Option<u64>,
    /// 정지(blocking) 이벤트 소요 시간 합계
    pub total_pause_ms: u64,
    /// 가장 긴 정지 이벤트
    pub max_pause_ms: u64,
}

/// GC 로그 파서
#[derive(Debug, Clone)]
pub struct GcLogParser {
    config: ParserConfig,
    dispatcher: Dispatcher,
}

impl GcLogParser {
    /// 설정을 검증하고 파서를 생성합니다.
    pub fn new(config: ParserConfig) -> Result<Self, GcLogError> {
        config.validate()?;
        Ok(Self {
            config,
            dispatcher: Dispatcher::new()?,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// 라인 반복자를 파싱합니다.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<ParsedRun, GcLogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut run = self.start()?;
        for line in lines {
            run.push(line.as_ref());
        }
        Ok(run.finish())
    }

    /// 문자열 전체를 파싱합니다.
    pub fn parse_str(&self, text: &str) -> Result<ParsedRun, GcLogError> {
        self.parse_lines(text.lines())
    }

    /// 스트림을 파싱합니다.
    ///
    /// UTF-8이 아닌 바이트는 대체 문자로 바꾸어 계속 진행합니다.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> Result<ParsedRun, GcLogError> {
        let mut run = self.start()?;
        let mut buf = Vec::with_capacity(256);
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            run.push(line.trim_end_matches(['\n', '\r']));
        }
        Ok(run.finish())
    }

    fn start(&self) -> Result<RunAssembler, GcLogError> {
        debug!(
            reference_date = ?self.config.reference_date,
            max_fragment_bytes = self.config.max_fragment_bytes,
            "starting gc log run"
        );
        Ok(RunAssembler {
            preprocessor: Preprocessor::new(&self.config)?,
            dispatcher: self.dispatcher,
            run: ParsedRun {
                supplied_vm_options: self.config.vm_options.clone(),
                ..ParsedRun::default()
            },
        })
    }
}

/// 한 실행 동안의 누적 상태
struct RunAssembler {
    preprocessor: Preprocessor,
    dispatcher: Dispatcher,
    run: ParsedRun,
}

impl RunAssembler {
    fn push(&mut self, line: &str) {
        let lines = self.preprocessor.push(line);
        accept(self.dispatcher, &mut self.run, lines);
    }

    fn finish(self) -> ParsedRun {
        let Self {
            preprocessor,
            dispatcher,
            mut run,
        } = self;
        run.lines_read = preprocessor.lines_read();
        accept(dispatcher, &mut run, preprocessor.finish());
        info!(
            lines = run.lines_read,
            events = run.events.len(),
            unidentified = run.unidentified.len(),
            "gc log run complete"
        );
        run
    }
}

fn accept(dispatcher: Dispatcher, run: &mut ParsedRun, lines: Vec<CanonicalLine>) {
    for line in lines {
        run.canonical_lines += 1;
        match dispatcher.dispatch(&line) {
            Dispatched::Event(event) => run.events.push(event),
            Dispatched::Unidentified(unidentified) => {
                if let Some(reason) = &unidentified.reason {
                    debug!(line = unidentified.line_number, %reason, "grammar matched but extraction failed");
                }
                run.unidentified.push(unidentified);
            }
        }
    }
}
