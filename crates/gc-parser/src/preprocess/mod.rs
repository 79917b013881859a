//! 전처리 상태 기계 -- 물리 라인을 정규화된 논리 라인으로 변환
//!
//! JVM GC 로그는 한 이벤트가 여러 물리 라인에 나뉘거나, 다른 스레드의 출력이
//! 중간에 끼어들거나, 장식 블록이 섞여 있습니다. 전처리기는 이를 이벤트당
//! 한 줄의 [`CanonicalLine`]으로 바꿉니다.
//!
//! 상태는 [`PreprocessContext`]에 명시적으로 담기며, [`step`]은
//! `(컨텍스트, 라인 창) -> (컨텍스트, 출력 라인들)` 형태의 순수 함수입니다.
//! [`Preprocessor`]는 한 라인 지연으로 미리보기(next)를 공급하는 스트리밍 드라이버입니다.
//!
//! # 라인별 처리 순서
//! 1. 후행 공백 제거
//! 2. 날짜 스탬프 변환 ([`datestamp`])
//! 3. 장식 제거 ([`decoration`])
//! 4. 라인 중간 CMS 동시 단계 끌어올리기 ([`fragment`])
//! 5. 조각 누적/완결 또는 통과
//!
//! # 사용 예시
//! ```ignore
//! use gclens_gc_parser::preprocess::Preprocessor;
//!
//! let mut preprocessor = Preprocessor::new(&config)?;
//! let mut lines = Vec::new();
//! for raw in input.lines() {
//!     lines.extend(preprocessor.push(raw));
//! }
//! lines.extend(preprocessor.finish());
//! ```

pub mod datestamp;
pub mod decoration;
pub mod fragment;

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::error::GcLogError;

use datestamp::DatestampPatterns;
use decoration::{DecorationPatterns, DecorationState};
use fragment::{bracket_depth, Fragment, FragmentPatterns};

/// 전처리 결과 라인 -- 이벤트 하나에 해당하는 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalLine {
    /// 시작 물리 라인 번호 (1부터)
    pub line_number: usize,
    pub text: String,
}

impl CanonicalLine {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }
}

impl fmt::Display for CanonicalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// [`step`]에 공급되는 라인 창
#[derive(Debug, Clone, Copy)]
pub struct LineWindow<'a> {
    /// 현재 라인의 물리 번호 (1부터)
    pub line_number: usize,
    /// 직전 원본 라인
    pub prior_raw: Option<&'a str>,
    pub current: &'a str,
    /// 다음 원본 라인 (입력 끝이면 `None`)
    pub next: Option<&'a str>,
}

#[derive(Debug)]
struct Patterns {
    datestamp: DatestampPatterns,
    decoration: DecorationPatterns,
    fragment: FragmentPatterns,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            datestamp: DatestampPatterns::compile()?,
            decoration: DecorationPatterns::compile()?,
            fragment: FragmentPatterns::compile()?,
        })
    }
}

static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(Patterns::compile);

/// 전처리 상태
#[derive(Debug, Clone)]
pub struct PreprocessContext {
    patterns: &'static Patterns,
    reference: Option<NaiveDateTime>,
    buffer: Option<Fragment>,
    decoration: DecorationState,
    max_fragment_bytes: usize,
    /// 크기 제한으로 조각을 내보낸 뒤, 같은 이벤트의 이어지는 라인이 남아 있는 상태
    overflowed: bool,
}

impl PreprocessContext {
    /// 새 컨텍스트를 생성합니다.
    ///
    /// `reference`가 없으면 처음 만나는 날짜 스탬프가 기준 시각이 됩니다.
    pub fn new(
        reference: Option<NaiveDateTime>,
        max_fragment_bytes: usize,
    ) -> Result<Self, GcLogError> {
        let patterns = PATTERNS
            .as_ref()
            .map_err(|e| GcLogError::Grammar(e.clone()))?;
        Ok(Self {
            patterns,
            reference,
            buffer: None,
            decoration: DecorationState::default(),
            max_fragment_bytes,
            overflowed: false,
        })
    }

    /// 파서 설정으로 컨텍스트를 생성합니다.
    pub fn from_config(config: &ParserConfig) -> Result<Self, GcLogError> {
        Self::new(config.reference_date, config.max_fragment_bytes)
    }

    /// 현재 기준 시각
    pub fn reference(&self) -> Option<NaiveDateTime> {
        self.reference
    }

    /// 누적 중인 조각
    pub fn buffer(&self) -> Option<&Fragment> {
        self.buffer.as_ref()
    }

    pub fn decoration_state(&self) -> DecorationState {
        self.decoration
    }

    /// 크기 제한 초과 후 이어지는 라인을 통과시키는 중인지 여부
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    fn advance(&mut self, window: LineWindow<'_>, out: &mut Vec<CanonicalLine>) {
        let patterns = self.patterns;
        let current = window.current.trim_end();
        let rewritten = patterns.datestamp.rewrite(current, &mut self.reference);
        let Some(line) = patterns
            .decoration
            .apply(&rewritten, window.prior_raw, &mut self.decoration)
        else {
            return;
        };

        let (hoisted, host) = patterns.fragment.hoist(&line);
        for fragment in hoisted {
            debug!(line = window.line_number, "hoisted concurrent phase out of collection line");
            out.push(CanonicalLine::new(window.line_number, fragment));
        }
        if host.trim().is_empty() {
            return;
        }

        // 잘린 이벤트의 나머지는 새 조각을 열지 않고 그대로 내보냄
        if self.overflowed {
            if patterns.fragment.is_continuation(&host) {
                debug!(line = window.line_number, "passing through continuation of oversized fragment");
                out.push(CanonicalLine::new(window.line_number, host));
                return;
            }
            if !patterns.fragment.is_standalone_concurrent(&host) {
                self.overflowed = false;
            }
        }

        if self.buffer.is_some() {
            if patterns.fragment.is_standalone_concurrent(&host) {
                out.push(CanonicalLine::new(window.line_number, host));
                return;
            }
            if patterns.fragment.is_continuation(&host) {
                self.extend_buffer(&host, out);
                return;
            }
            if let Some(fragment) = &self.buffer {
                warn!(
                    line = fragment.line_number,
                    next_line = window.line_number,
                    "unterminated fragment interrupted, flushing as-is"
                );
            }
            self.flush(out);
        }

        if patterns.fragment.starts_with_timestamp(&host)
            && bracket_depth(&host) > 0
            && self.may_continue(window.next)
        {
            self.buffer = Some(Fragment::new(window.line_number, host));
            self.enforce_limit(out);
        } else {
            out.push(CanonicalLine::new(window.line_number, host));
        }
    }

    fn extend_buffer(&mut self, continuation: &str, out: &mut Vec<CanonicalLine>) {
        let Some(fragment) = self.buffer.as_mut() else {
            return;
        };
        fragment.append(continuation);
        if fragment.is_complete() {
            self.flush(out);
        } else {
            self.enforce_limit(out);
        }
    }

    fn enforce_limit(&mut self, out: &mut Vec<CanonicalLine>) {
        if let Some(fragment) = &self.buffer
            && fragment.text.len() > self.max_fragment_bytes
        {
            warn!(
                line = fragment.line_number,
                bytes = fragment.text.len(),
                limit = self.max_fragment_bytes,
                "fragment exceeds size limit, flushing"
            );
            self.flush(out);
            self.overflowed = true;
        }
    }

    fn flush(&mut self, out: &mut Vec<CanonicalLine>) {
        if let Some(fragment) = self.buffer.take() {
            out.push(CanonicalLine::new(fragment.line_number, fragment.text));
        }
    }

    /// 다음 라인이 열린 라인을 이어갈 수 있는지 (이어지는 라인, 장식, 동시 단계)
    fn may_continue(&self, next: Option<&str>) -> bool {
        let Some(next) = next else {
            return false;
        };
        let patterns = self.patterns;
        let next = patterns.datestamp.rewrite_for_lookahead(next.trim_end());
        patterns.decoration.is_noise(&next)
            || patterns.fragment.is_continuation(&next)
            || patterns.fragment.is_standalone_concurrent(&next)
    }

    fn close(&mut self, out: &mut Vec<CanonicalLine>) {
        if let Some(fragment) = &self.buffer {
            warn!(
                line = fragment.line_number,
                "input ended inside a fragment, flushing as-is"
            );
        }
        self.flush(out);
    }
}

/// 상태 기계 한 단계
///
/// 한 물리 라인을 처리하여 갱신된 컨텍스트와 완성된 논리 라인들을 반환합니다.
pub fn step(
    mut context: PreprocessContext,
    window: LineWindow<'_>,
) -> (PreprocessContext, Vec<CanonicalLine>) {
    let mut out = Vec::new();
    context.advance(window, &mut out);
    (context, out)
}

/// 입력 끝 처리 -- 열린 조각을 그대로 내보냅니다.
pub fn finish(mut context: PreprocessContext) -> Vec<CanonicalLine> {
    let mut out = Vec::new();
    context.close(&mut out);
    out
}

/// 스트리밍 전처리 드라이버
///
/// 미리보기를 위해 한 라인을 보류했다가 다음 라인이 들어오면 처리합니다.
#[derive(Debug)]
pub struct Preprocessor {
    context: PreprocessContext,
    prior: Option<String>,
    pending: Option<(usize, String)>,
    line_number: usize,
}

impl Preprocessor {
    pub fn new(config: &ParserConfig) -> Result<Self, GcLogError> {
        Ok(Self::with_context(PreprocessContext::from_config(config)?))
    }

    pub fn with_context(context: PreprocessContext) -> Self {
        Self {
            context,
            prior: None,
            pending: None,
            line_number: 0,
        }
    }

    /// 물리 라인 하나를 공급하고 완성된 논리 라인들을 받습니다.
    pub fn push(&mut self, line: &str) -> Vec<CanonicalLine> {
        self.line_number += 1;
        let mut out = Vec::new();
        if let Some((number, current)) = self.pending.take() {
            self.context.advance(
                LineWindow {
                    line_number: number,
                    prior_raw: self.prior.as_deref(),
                    current: &current,
                    next: Some(line),
                },
                &mut out,
            );
            self.prior = Some(current);
        }
        self.pending = Some((self.line_number, line.to_owned()));
        out
    }

    /// 입력 끝 -- 보류 라인과 열린 조각을 내보냅니다.
    pub fn finish(mut self) -> Vec<CanonicalLine> {
        let mut out = Vec::new();
        if let Some((number, current)) = self.pending.take() {
            self.context.advance(
                LineWindow {
                    line_number: number,
                    prior_raw: self.prior.as_deref(),
                    current: &current,
                    next: None,
                },
                &mut out,
            );
        }
        self.context.close(&mut out);
        out
    }

    /// 처리한 물리 라인 수
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

/// 라인 전체를 한 번에 전처리합니다.
pub fn preprocess<I, S>(config: &ParserConfig, lines: I) -> Result<Vec<CanonicalLine>, GcLogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut preprocessor = Preprocessor::new(config)?;
    let mut out = Vec::new();
    for line in lines {
        out.extend(preprocessor.push(line.as_ref()));
    }
    out.extend(preprocessor.finish());
    Ok(out)
}
