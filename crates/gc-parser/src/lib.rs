#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`preprocess`]: 물리 라인을 논리 라인으로 정규화하는 전처리 상태 기계
//! - [`event`]: 이벤트 종류별 문법 서술자와 레지스트리
//! - [`grammar`]: 공용 필드 문법 (타임스탬프, 소요 시간, 영역 크기, 트리거)
//! - [`dispatch`]: 논리 라인을 이벤트 또는 미식별 라인으로 분류
//! - [`run`]: 로그 한 개 전체의 파싱 조립 및 요약
//! - [`config`]: 파서 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! physical lines -> Preprocessor -> CanonicalLine -> Dispatcher -> LogEvent / UnidentifiedLine
//!                       |                               |
//!          decoration/fragment/datestamp         EventRegistry (21 grammars)
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod grammar;
pub mod preprocess;
pub mod run;

// --- 주요 타입 re-export ---

// 실행
pub use run::{GcLogParser, ParsedRun, RunSummary};

// 설정
pub use config::{ParserConfig, ParserConfigBuilder};

// 에러
pub use error::GcLogError;

// 전처리
pub use preprocess::{CanonicalLine, PreprocessContext, Preprocessor, preprocess};

// 이벤트 문법
pub use dispatch::{Dispatched, Dispatcher};
pub use event::{EventRegistry, EventTypeDescriptor};
