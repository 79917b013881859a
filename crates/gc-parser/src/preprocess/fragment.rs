//! 조각 누적 -- 여러 물리 라인에 걸친 이벤트를 한 줄로 합치기
//!
//! JVM은 수집 도중 다른 스레드의 출력(CMS 동시 단계, tenuring 분포 등)을
//! 수집 라인 중간에 끼워 넣습니다. 여기서는 다음을 담당합니다.
//!
//! - 라인 중간의 CMS 동시 단계 조각을 잘라내어 먼저 내보내기 (hoist)
//! - 대괄호 균형으로 이벤트 완결 여부 판단
//! - 이어지는 라인(continuation) 판별

use regex::Regex;

use crate::grammar::{cms_concurrent_block, DURATION, TIMESTAMP};

/// 누적 중인 미완결 라인
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// 조각이 시작된 물리 라인 번호
    pub line_number: usize,
    pub text: String,
}

impl Fragment {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }

    /// 이어지는 라인을 그대로 덧붙입니다.
    pub fn append(&mut self, continuation: &str) {
        self.text.push_str(continuation);
    }

    /// 대괄호가 모두 닫혔는지 여부
    pub fn is_complete(&self) -> bool {
        bracket_depth(&self.text) <= 0
    }
}

/// 열린 대괄호 수 - 닫힌 대괄호 수
pub fn bracket_depth(text: &str) -> i64 {
    text.bytes().fold(0, |depth, b| match b {
        b'[' => depth + 1,
        b']' => depth - 1,
        _ => depth,
    })
}

#[derive(Debug)]
pub(crate) struct FragmentPatterns {
    embedded_concurrent: Regex,
    standalone_concurrent: Regex,
    continuation: Regex,
    leading_timestamp: Regex,
}

impl FragmentPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        let concurrent = cms_concurrent_block();
        Ok(Self {
            standalone_concurrent: Regex::new(&format!(r"^{concurrent}[ ]*$"))?,
            embedded_concurrent: Regex::new(&concurrent)?,
            continuation: Regex::new(&format!(
                concat!(
                    r"^(?::",
                    r"|\s*\((?:concurrent mode (?:failure|interrupted)|promotion failed)\)",
                    r"|, {duration} secs\]",
                    r"|\s+\d{{1,12}}K->",
                    r"|\s*\[(?:PSYoungGen|ParOldGen|PSOldGen|PSPermGen|CMS Perm|Perm|Metaspace|Times|1 CMS-remark)",
                    r"|{timestamp}: \[(?:CMS(?:$|[:A-Za-z (])|ParNew|DefNew|Tenured|Class Histogram",
                    r"|Rescan|weak refs|class unloading|scrub))"
                ),
                duration = DURATION,
                timestamp = TIMESTAMP,
            ))?,
            leading_timestamp: Regex::new(&format!(r"^{TIMESTAMP}: "))?,
        })
    }

    /// 라인 중간의 CMS 동시 단계 조각을 잘라냅니다.
    ///
    /// 반환값은 (잘라낸 조각들, 남은 라인)입니다.
    /// 라인 전체가 동시 단계 하나라면 자르지 않습니다.
    pub(crate) fn hoist(&self, line: &str) -> (Vec<String>, String) {
        if self.standalone_concurrent.is_match(line) {
            return (Vec::new(), line.to_owned());
        }

        let mut fragments = Vec::new();
        let mut host = String::with_capacity(line.len());
        let mut last = 0;
        for found in self.embedded_concurrent.find_iter(line) {
            fragments.push(found.as_str().trim().to_owned());
            host.push_str(&line[last..found.start()]);
            last = found.end();
        }
        if fragments.is_empty() {
            return (fragments, line.to_owned());
        }
        host.push_str(&line[last..]);
        (fragments, host.trim_end().to_owned())
    }

    pub(crate) fn is_continuation(&self, line: &str) -> bool {
        self.continuation.is_match(line)
    }

    pub(crate) fn is_standalone_concurrent(&self, line: &str) -> bool {
        self.standalone_concurrent.is_match(line)
    }

    pub(crate) fn starts_with_timestamp(&self, line: &str) -> bool {
        self.leading_timestamp.is_match(line)
    }
}
