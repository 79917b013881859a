//! 이벤트 디스패처 -- 논리 라인을 이벤트 또는 미식별 라인으로 분류
//!
//! 레지스트리의 서술자를 구체성 순서로 시도하여 처음 일치하는 문법으로 파싱합니다.
//! 부수 효과(로깅, 카운터)가 없는 순수 함수입니다.

use gclens_core::types::{LogEvent, UnidentifiedLine};

use crate::error::GcLogError;
use crate::event::EventRegistry;
use crate::preprocess::CanonicalLine;

/// 디스패치 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// 식별된 이벤트
    Event(LogEvent),
    /// 어떤 문법에도 해당하지 않거나 필드 추출에 실패한 라인
    Unidentified(UnidentifiedLine),
}

/// 레지스트리 기반 디스패처
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    registry: &'static EventRegistry,
}

impl Dispatcher {
    /// 전역 레지스트리를 사용하는 디스패처를 생성합니다.
    pub fn new() -> Result<Self, GcLogError> {
        Ok(Self {
            registry: EventRegistry::global()?,
        })
    }

    /// 지정한 레지스트리를 사용하는 디스패처를 생성합니다.
    pub fn with_registry(registry: &'static EventRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'static EventRegistry {
        self.registry
    }

    /// 논리 라인 하나를 분류합니다.
    ///
    /// 문법은 일치했으나 추출에 실패하면 사유와 함께 미식별로 강등합니다.
    pub fn dispatch(&self, line: &CanonicalLine) -> Dispatched {
        let Some(descriptor) = self.registry.identify(&line.text) else {
            return Dispatched::Unidentified(UnidentifiedLine {
                line_number: line.line_number,
                raw_text: line.text.clone(),
                reason: None,
            });
        };

        match descriptor.parse(&line.text) {
            Ok(event) => Dispatched::Event(event),
            Err(e) => Dispatched::Unidentified(UnidentifiedLine {
                line_number: line.line_number,
                raw_text: line.text.clone(),
                reason: Some(e.to_string()),
            }),
        }
    }
}
