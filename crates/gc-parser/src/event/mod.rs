//! 이벤트 문법 레지스트리 -- 이벤트 종류별 정규식과 필드 추출기
//!
//! 각 이벤트 종류는 [`EventTypeDescriptor`] 하나로 표현됩니다.
//! 서술자는 종류, 완전 일치 정규식, 추출 함수로 구성된 순수 데이터이며
//! [`EventRegistry`]가 구체성 순서(더 구체적인 문법이 먼저)로 보관합니다.
//!
//! # 수집기 계열
//! - [`cms`]: ParNew, CMS serial old, remark, initial mark, 동시 단계
//! - [`parallel`]: PSYoungGen, PSOldGen, ParOldGen
//! - [`serial`]: DefNew, Tenured
//! - [`g1`]: young pause, full GC, remark, cleanup, 동시 단계
//! - [`application`]: 애플리케이션 정지/실행 시간
//! - [`header`]: 로그 시작 헤더
//!
//! # 사용 예시
//! ```ignore
//! use gclens_gc_parser::event::EventRegistry;
//!
//! let registry = EventRegistry::global()?;
//! let descriptor = registry.identify("2.847: [GC concurrent-mark-start]").unwrap();
//! let event = descriptor.parse("2.847: [GC concurrent-mark-start]")?;
//! ```

pub mod application;
pub mod cms;
pub mod g1;
pub mod header;
pub mod parallel;
pub mod serial;

use std::sync::LazyLock;

use regex::{Captures, Regex};

use gclens_core::types::{EventCommon, EventKind, LogEvent, Occupancy, TriggerCause};

use crate::error::GcLogError;
use crate::grammar::{parse_kb, seconds_to_millis, unit_to_kb};

/// 매칭된 라인에서 이벤트를 만드는 추출 함수
pub type ExtractFn = fn(&Fields<'_, '_>) -> Result<LogEvent, GcLogError>;

/// 이벤트 종류 하나의 문법 서술자
pub struct EventTypeDescriptor {
    kind: EventKind,
    pattern: Regex,
    extract: ExtractFn,
}

impl EventTypeDescriptor {
    /// 패턴을 컴파일하여 서술자를 생성합니다.
    pub fn new(
        kind: EventKind,
        pattern: &str,
        extract: ExtractFn,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            kind,
            pattern: Regex::new(pattern)?,
            extract,
        })
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// 컴파일된 라인 문법
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// 라인이 이 문법과 일치하는지 확인합니다.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// 라인을 파싱하여 이벤트를 생성합니다.
    ///
    /// 일치하지 않는 라인에는 [`GcLogError::NoMatch`]를,
    /// 일치하지만 필드를 해석할 수 없는 라인에는 [`GcLogError::Parse`]를 반환합니다.
    pub fn parse(&self, line: &str) -> Result<LogEvent, GcLogError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or(GcLogError::NoMatch { kind: self.kind })?;
        (self.extract)(&Fields {
            kind: self.kind,
            caps: &caps,
            line,
        })
    }
}

impl std::fmt::Debug for EventTypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTypeDescriptor")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// 구체성 순서로 정렬된 서술자 목록
///
/// 한 라인이 여러 문법과 일치할 수 있으므로 순서가 곧 판별 규칙입니다.
#[derive(Debug)]
pub struct EventRegistry {
    descriptors: Vec<EventTypeDescriptor>,
}

static REGISTRY: LazyLock<Result<EventRegistry, regex::Error>> =
    LazyLock::new(EventRegistry::compile);

impl EventRegistry {
    /// 모든 문법을 컴파일합니다.
    ///
    /// 계열 순서: CMS, Parallel, Serial, G1, 애플리케이션, 헤더.
    /// 각 계열 모듈은 자기 서술자를 구체성 순서로 반환합니다.
    pub fn compile() -> Result<Self, regex::Error> {
        let mut descriptors = Vec::with_capacity(21);
        descriptors.extend(cms::descriptors()?);
        descriptors.extend(parallel::descriptors()?);
        descriptors.extend(serial::descriptors()?);
        descriptors.extend(g1::descriptors()?);
        descriptors.extend(application::descriptors()?);
        descriptors.extend(header::descriptors()?);
        Ok(Self { descriptors })
    }

    /// 임의의 서술자 목록으로 레지스트리를 구성합니다 (순서 유지).
    pub fn from_descriptors(descriptors: Vec<EventTypeDescriptor>) -> Self {
        Self { descriptors }
    }

    /// 프로세스 전역 레지스트리 (최초 접근 시 한 번 컴파일)
    pub fn global() -> Result<&'static Self, GcLogError> {
        REGISTRY
            .as_ref()
            .map_err(|e| GcLogError::Grammar(e.clone()))
    }

    pub fn descriptors(&self) -> &[EventTypeDescriptor] {
        &self.descriptors
    }

    /// 라인과 일치하는 첫 번째 서술자를 찾습니다.
    pub fn identify(&self, line: &str) -> Option<&EventTypeDescriptor> {
        self.descriptors.iter().find(|d| d.matches(line))
    }

    /// 종류로 서술자를 찾습니다.
    pub fn descriptor(&self, kind: EventKind) -> Option<&EventTypeDescriptor> {
        self.descriptors.iter().find(|d| d.kind == kind)
    }

    /// 등록된 종류 목록 (판별 순서)
    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.descriptors.iter().map(|d| d.kind)
    }
}

/// 정규식 캡처에 대한 타입 있는 접근자
///
/// 추출 함수는 이 접근자를 통해서만 캡처를 읽습니다.
/// 숫자 변환 실패는 [`GcLogError::Parse`]가 됩니다.
pub struct Fields<'c, 'h> {
    kind: EventKind,
    caps: &'c Captures<'h>,
    line: &'h str,
}

impl<'h> Fields<'_, 'h> {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// 매칭된 전체 라인
    pub fn line(&self) -> &'h str {
        self.line
    }

    /// 선택적 그룹의 텍스트
    pub fn text(&self, name: &str) -> Option<&'h str> {
        self.caps.name(name).map(|m| m.as_str())
    }

    /// 그룹 참여 여부
    pub fn present(&self, name: &str) -> bool {
        self.caps.name(name).is_some()
    }

    /// 필수 그룹의 텍스트
    pub fn required(&self, name: &str) -> Result<&'h str, GcLogError> {
        self.text(name)
            .ok_or_else(|| GcLogError::parse(self.kind, format!("missing field '{name}'")))
    }

    /// 초 단위 필수 그룹을 밀리초로 변환합니다.
    pub fn millis(&self, name: &str) -> Result<u64, GcLogError> {
        let text = self.required(name)?;
        seconds_to_millis(text).ok_or_else(|| {
            GcLogError::parse(self.kind, format!("'{name}' is not a decimal: {text}"))
        })
    }

    /// 초 단위 선택 그룹을 밀리초로 변환합니다.
    pub fn opt_millis(&self, name: &str) -> Result<Option<u64>, GcLogError> {
        if self.present(name) {
            self.millis(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// 타임스탬프 (없으면 0)
    pub fn timestamp(&self, name: &str) -> Result<u64, GcLogError> {
        Ok(self.opt_millis(name)?.unwrap_or(0))
    }

    /// KB 숫자 그룹
    pub fn kb(&self, name: &str) -> Result<u64, GcLogError> {
        let text = self.required(name)?;
        parse_kb(text)
            .ok_or_else(|| GcLogError::parse(self.kind, format!("'{name}' out of range: {text}")))
    }

    /// `{prefix}_init/_end/_alloc` KB 삼중항
    pub fn occupancy(&self, prefix: &str) -> Result<Occupancy, GcLogError> {
        Ok(Occupancy::new(
            self.kb(&format!("{prefix}_init"))?,
            self.kb(&format!("{prefix}_end"))?,
            self.kb(&format!("{prefix}_alloc"))?,
        ))
    }

    /// 선택적 블록 안의 KB 삼중항
    pub fn opt_occupancy(&self, prefix: &str) -> Result<Option<Occupancy>, GcLogError> {
        if self.present(&format!("{prefix}_init")) {
            self.occupancy(prefix).map(Some)
        } else {
            Ok(None)
        }
    }

    /// `used(capacity)` KB 스냅샷
    pub fn snapshot(&self, used: &str, allocated: &str) -> Result<Occupancy, GcLogError> {
        Ok(Occupancy::snapshot(self.kb(used)?, self.kb(allocated)?))
    }

    /// 단위 접미사 크기 그룹을 KB로 변환합니다.
    pub fn unit_kb(&self, name: &str) -> Result<u64, GcLogError> {
        let text = self.required(name)?;
        unit_to_kb(text)
            .ok_or_else(|| GcLogError::parse(self.kind, format!("'{name}' bad size: {text}")))
    }

    /// 단위 접미사 삼중항을 KB로 변환합니다.
    pub fn unit_occupancy(&self, prefix: &str) -> Result<Occupancy, GcLogError> {
        Ok(Occupancy::new(
            self.unit_kb(&format!("{prefix}_init"))?,
            self.unit_kb(&format!("{prefix}_end"))?,
            self.unit_kb(&format!("{prefix}_alloc"))?,
        ))
    }

    /// 선택적 블록 안의 단위 접미사 삼중항
    pub fn opt_unit_occupancy(&self, prefix: &str) -> Result<Option<Occupancy>, GcLogError> {
        if self.present(&format!("{prefix}_init")) {
            self.unit_occupancy(prefix).map(Some)
        } else {
            Ok(None)
        }
    }

    /// 트리거 그룹들과 히스토그램 그룹들로 최종 트리거를 결정합니다.
    ///
    /// `phrases`는 라인 안에 나타나는 순서대로 전달해야 합니다.
    pub fn trigger(&self, phrases: &[&str], histograms: &[&str]) -> Option<TriggerCause> {
        let histogram = histograms.iter().any(|name| self.present(name));
        TriggerCause::resolve(phrases.iter().map(|name| self.text(name)), histogram)
    }

    /// 공통 필드를 생성합니다.
    pub fn common(
        &self,
        timestamp_ms: u64,
        duration_ms: u64,
        trigger: Option<TriggerCause>,
    ) -> EventCommon {
        EventCommon {
            raw_text: self.line.to_owned(),
            timestamp_ms,
            duration_ms,
            trigger,
        }
    }
}
