//! 절대 날짜 스탬프 처리
//!
//! `-XX:+PrintGCDateStamps` 출력의 날짜 스탬프를 문법이 이해하는 상대 타임스탬프로 바꿉니다.
//!
//! - `DATESTAMP: TIMESTAMP: ` -> `TIMESTAMP: ` (상대 타임스탬프가 이미 있으면 날짜 제거)
//! - `DATESTAMP: ` -> `sss.mmm: ` (기준 시각으로부터의 경과 시간)
//!
//! 기준 시각과 스탬프는 오프셋을 무시한 현지 시각(naive)으로 비교하며,
//! 기준보다 이른 스탬프는 `0.000`이 됩니다.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

use crate::grammar::{DATESTAMP, TIMESTAMP};

#[derive(Debug)]
pub(crate) struct DatestampPatterns {
    with_timestamp: Regex,
    standalone: Regex,
}

impl DatestampPatterns {
    pub(crate) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            with_timestamp: Regex::new(&format!(r"{DATESTAMP}: (?P<ts>{TIMESTAMP}): "))?,
            standalone: Regex::new(&format!(r"(?P<date>{DATESTAMP}): "))?,
        })
    }

    /// 라인의 모든 날짜 스탬프를 왼쪽부터 변환합니다.
    ///
    /// 기준 시각이 없으면 처음 만난 스탬프가 기준이 됩니다.
    /// 해석할 수 없는 스탬프는 그대로 둡니다.
    pub(crate) fn rewrite(&self, line: &str, reference: &mut Option<NaiveDateTime>) -> String {
        let line = self.with_timestamp.replace_all(line, "${ts}: ");
        if !self.standalone.is_match(&line) {
            return line.into_owned();
        }
        self.standalone
            .replace_all(&line, |caps: &Captures<'_>| match parse_datestamp(&caps["date"]) {
                Some(stamp) => {
                    let base = *reference.get_or_insert(stamp);
                    format!("{}: ", relative_seconds(base, stamp))
                }
                None => caps[0].to_owned(),
            })
            .into_owned()
    }

    /// 미리보기용 변환 (기준 시각을 갱신하지 않음)
    pub(crate) fn rewrite_for_lookahead(&self, line: &str) -> String {
        let line = self.with_timestamp.replace_all(line, "${ts}: ");
        self.standalone.replace_all(&line, "0.000: ").into_owned()
    }
}

/// `2010-02-26T09:32:12.486-0600` 형식을 현지 시각으로 해석합니다.
pub fn parse_datestamp(text: &str) -> Option<NaiveDateTime> {
    let normalized = text.replace(',', ".");
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .ok()
        .map(|stamp| stamp.naive_local())
}

/// 설정의 기준 날짜를 해석합니다.
///
/// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, 로그 날짜 스탬프 형식을 허용합니다.
pub fn parse_reference_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    parse_datestamp(text)
}

/// 기준 시각으로부터의 경과 시간을 `sss.mmm` 형식으로 표현합니다.
pub fn relative_seconds(reference: NaiveDateTime, stamp: NaiveDateTime) -> String {
    let millis = (stamp - reference).num_milliseconds().max(0);
    format!("{}.{:03}", millis / 1000, millis % 1000)
}
