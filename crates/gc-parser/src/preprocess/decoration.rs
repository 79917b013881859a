//! 장식 제거 -- 이벤트 문법과 무관한 출력 블록
//!
//! - `{Heap before gc invocations=N:` 배너와 뒤따르는 힙 상세 블록 (`}`까지)
//! - 클래스 히스토그램 표 (표식과 닫는 토큰은 남김)
//! - `[Unloading class ...]` 알림, VM 경고 접두사, `CMS: abort preclean due to time`
//! - tenuring 분포 (`Desired survivor size`, `- age N:` 행)

use regex::Regex;

use crate::grammar::DURATION;

/// 여러 라인에 걸친 장식 블록 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecorationState {
    /// 힙 배너 이후 `}` 이전
    pub in_heap_block: bool,
    /// 클래스 히스토그램 표식 이후 닫는 토큰 이전
    pub in_class_histogram: bool,
}

#[derive(Debug)]
pub(crate) struct DecorationPatterns {
    heap_banner: Regex,
    heap_summary: Regex,
    heap_detail: Regex,
    histogram_marker: Regex,
    histogram_row: Regex,
    histogram_close: Regex,
    unloading_class: Regex,
    vm_warning: Regex,
    abort_preclean: Regex,
    tenuring_header: Regex,
    tenuring_age: Regex,
}

impl DecorationPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            heap_banner: Regex::new(
                r"\{?Heap (?:before|after) (?:gc|GC) invocations=\d+(?: \(full \d+\))?:",
            )?,
            heap_summary: Regex::new(r"^Heap$")?,
            heap_detail: Regex::new(concat!(
                r"^\s+(?:par new generation|def new generation|eden space|from space|to\s+space|",
                r"concurrent mark-sweep generation|concurrent-mark-sweep perm gen|tenured generation|",
                r"the space|compacting perm gen|ro space|rw space|PSYoungGen|ParOldGen|PSOldGen|",
                r"PSPermGen|object space|Metaspace|class space|garbage-first heap|region size|",
                r"No shared spaces)"
            ))?,
            histogram_marker: Regex::new(r"\[Class Histogram:?$")?,
            histogram_row: Regex::new(
                r"^\s*(?:num\s+#instances|-{5,}$|\d+:\s+\d+\s+\d+\s+\S|Total\s+\d+\s+\d+)",
            )?,
            histogram_close: Regex::new(&format!(r"^, {DURATION} secs\]"))?,
            unloading_class: Regex::new(r"\[Unloading class [^\]]+\]")?,
            vm_warning: Regex::new(r"(?:Java HotSpot\(TM\)|OpenJDK) [^:]*VM warning: ")?,
            abort_preclean: Regex::new(r" ?CMS: abort preclean due to time ")?,
            tenuring_header: Regex::new(
                r"^Desired survivor size \d+ bytes, new threshold \d+ \(max \d+\)$",
            )?,
            tenuring_age: Regex::new(r"^- age\s+\d+:\s+\d+ bytes,\s+\d+ total$")?,
        })
    }

    /// 장식을 제거합니다. 라인 전체가 장식이면 `None`을 반환합니다.
    pub(crate) fn apply(
        &self,
        line: &str,
        prior_raw: Option<&str>,
        state: &mut DecorationState,
    ) -> Option<String> {
        if state.in_heap_block {
            if line.trim() == "}" {
                state.in_heap_block = false;
                return None;
            }
            if self.heap_detail.is_match(line) {
                return None;
            }
        }

        if state.in_class_histogram {
            if self.histogram_row.is_match(line) {
                return None;
            }
            if self.histogram_close.is_match(line) {
                state.in_class_histogram = false;
            }
        }

        if self.tenuring_header.is_match(line) {
            return None;
        }
        if self.tenuring_age.is_match(line) && prior_raw.is_some_and(|p| self.is_tenuring(p)) {
            return None;
        }

        if self.heap_summary.is_match(line) {
            state.in_heap_block = true;
            return None;
        }

        let mut text = line.to_owned();
        if self.heap_banner.is_match(&text) {
            state.in_heap_block = true;
            text = self.heap_banner.replace_all(&text, "").into_owned();
        }
        for pattern in [&self.unloading_class, &self.vm_warning, &self.abort_preclean] {
            if pattern.is_match(&text) {
                text = pattern.replace_all(&text, "").into_owned();
            }
        }

        let text = text.trim_end();
        if text.trim().is_empty() {
            return None;
        }
        if self.histogram_marker.is_match(text) {
            state.in_class_histogram = true;
        }
        Some(text.to_owned())
    }

    /// 항상 버려지는 라인인지 확인합니다 (미리보기용).
    pub(crate) fn is_noise(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty()
            || trimmed == "}"
            || self.heap_summary.is_match(trimmed)
            || self.heap_detail.is_match(line)
            || (self.heap_banner.is_match(line)
                && self.heap_banner.replace_all(line, "").trim().is_empty())
            || self.histogram_row.is_match(line)
            || self.is_tenuring(line)
    }

    fn is_tenuring(&self, line: &str) -> bool {
        let line = line.trim_end();
        self.tenuring_header.is_match(line) || self.tenuring_age.is_match(line)
    }
}
