//! 도메인 타입 -- GC 로그 이벤트 모델
//!
//! 파서가 생성하고 집계기/어드바이저가 소비하는 공통 데이터 구조를 정의합니다.
//! 모든 이벤트는 [`LogEvent`] 닫힌 열거형의 한 variant이며,
//! 각 variant는 공통 필드 [`EventCommon`]을 포함합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 메모리 영역 점유량 (단위: KB)
///
/// 로그의 `init->end(allocated)` 삼중항을 나타냅니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupancy {
    /// 수집 전 점유량
    pub init: u64,
    /// 수집 후 점유량
    pub end: u64,
    /// 할당된 영역 크기
    pub allocated: u64,
}

impl Occupancy {
    /// 새 점유량 삼중항을 생성합니다.
    pub fn new(init: u64, end: u64, allocated: u64) -> Self {
        Self {
            init,
            end,
            allocated,
        }
    }

    /// 전/후 점유량이 같은 스냅샷 형태 (`used(capacity)`)를 생성합니다.
    pub fn snapshot(used: u64, allocated: u64) -> Self {
        Self::new(used, used, allocated)
    }

    /// 성분별 차이를 계산합니다. 음수가 되는 성분은 0으로 고정합니다.
    ///
    /// 합계에서 한 세대를 빼 다른 세대를 유도할 때 사용합니다.
    pub fn saturating_sub(&self, other: &Self) -> Self {
        Self {
            init: self.init.saturating_sub(other.init),
            end: self.end.saturating_sub(other.end),
            allocated: self.allocated.saturating_sub(other.allocated),
        }
    }

    /// `init <= allocated` 및 `end <= allocated` 여부
    ///
    /// 생성 시 강제하지 않습니다. 손상된 로그도 그대로 보존합니다.
    pub fn is_consistent(&self) -> bool {
        self.init <= self.allocated && self.end <= self.allocated
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K->{}K({}K)", self.init, self.end, self.allocated)
    }
}

/// GC 발생 원인
///
/// 로그에 괄호로 표기되는 트리거 문구를 닫힌 집합으로 표현합니다.
/// 문구가 없는 경우는 `Option::None`으로 나타냅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerCause {
    /// `System` / `System.gc()`
    SystemGc,
    /// `Allocation Failure`
    AllocationFailure,
    /// `promotion failed`
    PromotionFailed,
    /// `concurrent mode failure`
    ConcurrentModeFailure,
    /// `concurrent mode interrupted`
    ConcurrentModeInterrupted,
    /// `Heap Inspection Initiated GC`
    HeapInspection,
    /// `Metadata GC Threshold`
    MetadataGcThreshold,
    /// `Last ditch collection`
    LastDitchCollection,
    /// `GCLocker Initiated GC`
    GcLocker,
    /// `JvmtiEnv ForceGarbageCollection`
    JvmtiForced,
    /// `Class Histogram`
    ClassHistogram,
    /// `G1 Evacuation Pause`
    G1EvacuationPause,
    /// `to-space exhausted`
    ToSpaceExhausted,
    /// `Ergonomics` (Parallel 수집기의 적응형 크기 조정)
    Ergonomics,
}

impl TriggerCause {
    /// 로그 문구에서 트리거를 찾습니다.
    ///
    /// 문구는 괄호를 제외한 본문이어야 합니다 (예: `"System.gc()"`).
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        match phrase.trim() {
            "System" | "System.gc()" => Some(Self::SystemGc),
            "Allocation Failure" => Some(Self::AllocationFailure),
            "promotion failed" => Some(Self::PromotionFailed),
            "concurrent mode failure" => Some(Self::ConcurrentModeFailure),
            "concurrent mode interrupted" => Some(Self::ConcurrentModeInterrupted),
            "Heap Inspection Initiated GC" => Some(Self::HeapInspection),
            "Metadata GC Threshold" => Some(Self::MetadataGcThreshold),
            "Last ditch collection" => Some(Self::LastDitchCollection),
            "GCLocker Initiated GC" => Some(Self::GcLocker),
            "JvmtiEnv ForceGarbageCollection" => Some(Self::JvmtiForced),
            "Class Histogram" => Some(Self::ClassHistogram),
            "G1 Evacuation Pause" => Some(Self::G1EvacuationPause),
            "to-space exhausted" => Some(Self::ToSpaceExhausted),
            "Ergonomics" => Some(Self::Ergonomics),
            _ => None,
        }
    }

    /// 안정적인 식별 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemGc => "system-gc",
            Self::AllocationFailure => "allocation-failure",
            Self::PromotionFailed => "promotion-failed",
            Self::ConcurrentModeFailure => "concurrent-mode-failure",
            Self::ConcurrentModeInterrupted => "concurrent-mode-interrupted",
            Self::HeapInspection => "heap-inspection",
            Self::MetadataGcThreshold => "metadata-gc-threshold",
            Self::LastDitchCollection => "last-ditch-collection",
            Self::GcLocker => "gc-locker",
            Self::JvmtiForced => "jvmti-forced",
            Self::ClassHistogram => "class-histogram",
            Self::G1EvacuationPause => "g1-evacuation-pause",
            Self::ToSpaceExhausted => "to-space-exhausted",
            Self::Ergonomics => "ergonomics",
        }
    }

    /// 여러 트리거 후보 중 최종 트리거를 결정합니다.
    ///
    /// 중첩 블록 순서대로 전달된 후보 중 마지막으로 존재하는 문구가 우선합니다.
    /// 명시적 문구가 하나도 없고 클래스 히스토그램 블록이 있으면
    /// [`TriggerCause::ClassHistogram`]을 반환합니다.
    pub fn resolve<'a, I>(phrases: I, class_histogram: bool) -> Option<Self>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        phrases
            .into_iter()
            .flatten()
            .filter_map(Self::from_phrase)
            .last()
            .or(class_histogram.then_some(Self::ClassHistogram))
    }
}

impl fmt::Display for TriggerCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 이벤트 종류 -- [`LogEvent`] variant의 필드 없는 판별자
///
/// 집계기와 어드바이저가 종류를 구분하는 안정적인 태그를 제공합니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// ParNew 수집 실패 후 CMS old 수집으로 전환
    ParNewConcurrentModeFailure,
    /// CMS `Full GC` (serial old)
    CmsSerialOld,
    /// CMS remark 단계
    CmsRemark,
    /// CMS initial mark 단계
    CmsInitialMark,
    /// ParNew young 수집
    ParNew,
    /// CMS 동시 단계 (`CMS-concurrent-*`)
    CmsConcurrent,
    /// Parallel `Full GC` (ParOldGen)
    ParallelOldCompacting,
    /// Parallel `Full GC` (PSOldGen)
    ParallelSerialOld,
    /// Parallel young 수집 (PSYoungGen)
    ParallelScavenge,
    /// Serial `Full GC` (Tenured)
    SerialOld,
    /// Serial young 수집 (DefNew)
    SerialNew,
    /// G1 `Full GC`
    G1FullGc,
    /// G1 young pause
    G1YoungPause,
    /// G1 remark
    G1Remark,
    /// G1 cleanup
    G1Cleanup,
    /// G1 동시 단계 (`GC concurrent-*`)
    G1Concurrent,
    /// 애플리케이션 스레드 정지 시간
    ApplicationStoppedTime,
    /// 애플리케이션 실행 시간
    ApplicationConcurrentTime,
    /// `CommandLine flags:` 헤더
    HeaderCommandLineFlags,
    /// `Memory:` 헤더
    HeaderMemory,
    /// VM 버전 헤더
    HeaderVersion,
}

impl EventKind {
    /// 안정적인 태그 문자열 (serde 표현과 동일)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParNewConcurrentModeFailure => "PAR_NEW_CONCURRENT_MODE_FAILURE",
            Self::CmsSerialOld => "CMS_SERIAL_OLD",
            Self::CmsRemark => "CMS_REMARK",
            Self::CmsInitialMark => "CMS_INITIAL_MARK",
            Self::ParNew => "PAR_NEW",
            Self::CmsConcurrent => "CMS_CONCURRENT",
            Self::ParallelOldCompacting => "PARALLEL_OLD_COMPACTING",
            Self::ParallelSerialOld => "PARALLEL_SERIAL_OLD",
            Self::ParallelScavenge => "PARALLEL_SCAVENGE",
            Self::SerialOld => "SERIAL_OLD",
            Self::SerialNew => "SERIAL_NEW",
            Self::G1FullGc => "G1_FULL_GC",
            Self::G1YoungPause => "G1_YOUNG_PAUSE",
            Self::G1Remark => "G1_REMARK",
            Self::G1Cleanup => "G1_CLEANUP",
            Self::G1Concurrent => "G1_CONCURRENT",
            Self::ApplicationStoppedTime => "APPLICATION_STOPPED_TIME",
            Self::ApplicationConcurrentTime => "APPLICATION_CONCURRENT_TIME",
            Self::HeaderCommandLineFlags => "HEADER_COMMAND_LINE_FLAGS",
            Self::HeaderMemory => "HEADER_MEMORY",
            Self::HeaderVersion => "HEADER_VERSION",
        }
    }

    /// 애플리케이션 스레드를 멈추는 pause 이벤트인지 여부
    ///
    /// 동시 단계, 애플리케이션 시간, 헤더는 pause가 아닙니다.
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self,
            Self::CmsConcurrent
                | Self::G1Concurrent
                | Self::ApplicationStoppedTime
                | Self::ApplicationConcurrentTime
                | Self::HeaderCommandLineFlags
                | Self::HeaderMemory
                | Self::HeaderVersion
        )
    }

    /// 로그 머리말(헤더) 이벤트인지 여부
    pub fn is_header(&self) -> bool {
        matches!(
            self,
            Self::HeaderCommandLineFlags | Self::HeaderMemory | Self::HeaderVersion
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 모든 이벤트가 공유하는 공통 필드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCommon {
    /// 정규화된 원본 라인 (진단용)
    pub raw_text: String,
    /// VM 시작 이후 경과 시간 (ms)
    pub timestamp_ms: u64,
    /// 소요 시간 (ms)
    pub duration_ms: u64,
    /// GC 발생 원인
    pub trigger: Option<TriggerCause>,
}

/// 세대별 점유량을 가진 수집 이벤트 데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionData {
    pub common: EventCommon,
    /// young 세대
    pub young: Option<Occupancy>,
    /// old 세대
    pub old: Option<Occupancy>,
    /// perm 세대 또는 metaspace
    pub perm: Option<Occupancy>,
    /// 힙 전체 (young + old)
    pub combined: Option<Occupancy>,
}

/// 동시 단계 이벤트 데이터
///
/// `duration_ms`는 wall-clock 경과 시간입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrentPhaseData {
    pub common: EventCommon,
    /// 단계 이름 (예: `mark`, `abortable-preclean`, `mark-start`)
    pub phase: String,
    /// CPU 시간 (ms), 로그에 있을 때만
    pub cpu_ms: Option<u64>,
}

/// 애플리케이션 정지 시간 데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoppedTimeData {
    pub common: EventCommon,
    /// safepoint 진입까지 걸린 시간 (ms)
    pub stopping_threads_ms: Option<u64>,
}

/// `CommandLine flags:` 헤더 데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLineFlagsData {
    pub common: EventCommon,
    /// 해석하지 않은 VM 옵션 문자열
    pub flags: String,
}

/// `Memory:` 헤더 데이터 (단위: KB)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryHeaderData {
    pub common: EventCommon,
    pub physical_kb: u64,
    pub physical_free_kb: u64,
    pub swap_kb: u64,
    pub swap_free_kb: u64,
}

/// VM 버전 헤더 데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHeaderData {
    pub common: EventCommon,
    /// VM 이름 (예: `Java HotSpot(TM) 64-Bit Server VM`)
    pub vm_name: String,
    /// JRE 버전 (예: `1.8.0_66-b17`)
    pub jre_version: String,
}

/// GC 로그 이벤트
///
/// 이벤트 종류마다 하나의 variant를 가지는 닫힌 합 타입입니다.
/// `kind` 태그로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEvent {
    ParNewConcurrentModeFailure(CollectionData),
    CmsSerialOld(CollectionData),
    CmsRemark(CollectionData),
    CmsInitialMark(CollectionData),
    ParNew(CollectionData),
    CmsConcurrent(ConcurrentPhaseData),
    ParallelOldCompacting(CollectionData),
    ParallelSerialOld(CollectionData),
    ParallelScavenge(CollectionData),
    SerialOld(CollectionData),
    SerialNew(CollectionData),
    G1FullGc(CollectionData),
    G1YoungPause(CollectionData),
    G1Remark(CollectionData),
    G1Cleanup(CollectionData),
    G1Concurrent(ConcurrentPhaseData),
    ApplicationStoppedTime(StoppedTimeData),
    ApplicationConcurrentTime(EventCommon),
    HeaderCommandLineFlags(CommandLineFlagsData),
    HeaderMemory(MemoryHeaderData),
    HeaderVersion(VersionHeaderData),
}

impl LogEvent {
    /// 이벤트 종류
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ParNewConcurrentModeFailure(_) => EventKind::ParNewConcurrentModeFailure,
            Self::CmsSerialOld(_) => EventKind::CmsSerialOld,
            Self::CmsRemark(_) => EventKind::CmsRemark,
            Self::CmsInitialMark(_) => EventKind::CmsInitialMark,
            Self::ParNew(_) => EventKind::ParNew,
            Self::CmsConcurrent(_) => EventKind::CmsConcurrent,
            Self::ParallelOldCompacting(_) => EventKind::ParallelOldCompacting,
            Self::ParallelSerialOld(_) => EventKind::ParallelSerialOld,
            Self::ParallelScavenge(_) => EventKind::ParallelScavenge,
            Self::SerialOld(_) => EventKind::SerialOld,
            Self::SerialNew(_) => EventKind::SerialNew,
            Self::G1FullGc(_) => EventKind::G1FullGc,
            Self::G1YoungPause(_) => EventKind::G1YoungPause,
            Self::G1Remark(_) => EventKind::G1Remark,
            Self::G1Cleanup(_) => EventKind::G1Cleanup,
            Self::G1Concurrent(_) => EventKind::G1Concurrent,
            Self::ApplicationStoppedTime(_) => EventKind::ApplicationStoppedTime,
            Self::ApplicationConcurrentTime(_) => EventKind::ApplicationConcurrentTime,
            Self::HeaderCommandLineFlags(_) => EventKind::HeaderCommandLineFlags,
            Self::HeaderMemory(_) => EventKind::HeaderMemory,
            Self::HeaderVersion(_) => EventKind::HeaderVersion,
        }
    }

    /// 공통 필드
    pub fn common(&self) -> &EventCommon {
        match self {
            Self::ParNewConcurrentModeFailure(d)
            | Self::CmsSerialOld(d)
            | Self::CmsRemark(d)
            | Self::CmsInitialMark(d)
            | Self::ParNew(d)
            | Self::ParallelOldCompacting(d)
            | Self::ParallelSerialOld(d)
            | Self::ParallelScavenge(d)
            | Self::SerialOld(d)
            | Self::SerialNew(d)
            | Self::G1FullGc(d)
            | Self::G1YoungPause(d)
            | Self::G1Remark(d)
            | Self::G1Cleanup(d) => &d.common,
            Self::CmsConcurrent(d) | Self::G1Concurrent(d) => &d.common,
            Self::ApplicationStoppedTime(d) => &d.common,
            Self::ApplicationConcurrentTime(common) => common,
            Self::HeaderCommandLineFlags(d) => &d.common,
            Self::HeaderMemory(d) => &d.common,
            Self::HeaderVersion(d) => &d.common,
        }
    }

    /// 세대 점유량 데이터 (수집 이벤트만)
    pub fn collection(&self) -> Option<&CollectionData> {
        match self {
            Self::ParNewConcurrentModeFailure(d)
            | Self::CmsSerialOld(d)
            | Self::CmsRemark(d)
            | Self::CmsInitialMark(d)
            | Self::ParNew(d)
            | Self::ParallelOldCompacting(d)
            | Self::ParallelSerialOld(d)
            | Self::ParallelScavenge(d)
            | Self::SerialOld(d)
            | Self::SerialNew(d)
            | Self::G1FullGc(d)
            | Self::G1YoungPause(d)
            | Self::G1Remark(d)
            | Self::G1Cleanup(d) => Some(d),
            _ => None,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.common().raw_text
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.common().timestamp_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.common().duration_ms
    }

    pub fn trigger(&self) -> Option<TriggerCause> {
        self.common().trigger
    }

    pub fn young(&self) -> Option<Occupancy> {
        self.collection().and_then(|d| d.young)
    }

    pub fn old(&self) -> Option<Occupancy> {
        self.collection().and_then(|d| d.old)
    }

    pub fn perm(&self) -> Option<Occupancy> {
        self.collection().and_then(|d| d.perm)
    }

    pub fn combined(&self) -> Option<Occupancy> {
        self.collection().and_then(|d| d.combined)
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @{}ms ({}ms)",
            self.kind(),
            self.timestamp_ms(),
            self.duration_ms()
        )?;
        if let Some(trigger) = self.trigger() {
            write!(f, " trigger={trigger}")?;
        }
        if let Some(combined) = self.combined() {
            write!(f, " heap={combined}")?;
        }
        Ok(())
    }
}

/// 어떤 문법에도 매칭되지 않은 라인
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnidentifiedLine {
    /// 원본 파일 기준 라인 번호 (1부터 시작)
    pub line_number: usize,
    /// 정규화된 라인 텍스트
    pub raw_text: String,
    /// 문법은 매칭됐으나 필드 추출에 실패한 경우의 사유
    pub reason: Option<String>,
}

impl fmt::Display for UnidentifiedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.raw_text)?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}
