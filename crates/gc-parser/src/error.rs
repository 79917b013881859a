//! GC 로그 파서 에러 타입
//!
//! [`GcLogError`]는 파서 크레이트 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<GcLogError> for GclensError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 라인 단위 실패(`Parse`, `NoMatch`)는 실행을 중단시키지 않습니다.
//! 디스패처가 해당 라인을 미식별 라인으로 강등합니다.

use gclens_core::error::{ConfigError, GclensError, ParseError};
use gclens_core::types::EventKind;

/// GC 로그 파서 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum GcLogError {
    /// 문법은 매칭됐으나 필드 추출 실패 (하위 방언, 숫자 범위 초과 등)
    #[error("parse error: {kind}: {reason}")]
    Parse {
        /// 매칭된 이벤트 종류
        kind: EventKind,
        /// 실패 사유
        reason: String,
    },

    /// 매칭되지 않는 라인에 `parse` 호출 (호출 계약 위반)
    #[error("line does not match {kind} grammar")]
    NoMatch {
        /// 시도한 이벤트 종류
        kind: EventKind,
    },

    /// 문법 정규식 컴파일 실패
    #[error("grammar error: {0}")]
    Grammar(#[from] regex::Error),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러 (입력 스트림 읽기 실패)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GcLogError {
    /// 이벤트 종류와 사유로 구조 불일치 에러를 생성합니다.
    pub(crate) fn parse(kind: EventKind, reason: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<GcLogError> for GclensError {
    fn from(err: GcLogError) -> Self {
        match err {
            GcLogError::Parse { kind, reason } => GclensError::Parse(ParseError::Structure {
                kind: kind.to_string(),
                reason,
            }),
            GcLogError::NoMatch { kind } => GclensError::Parse(ParseError::Structure {
                kind: kind.to_string(),
                reason: "line does not match grammar".to_owned(),
            }),
            GcLogError::Grammar(e) => GclensError::Parse(ParseError::Grammar(e.to_string())),
            GcLogError::Config { field, reason } => {
                GclensError::Config(ConfigError::InvalidValue { field, reason })
            }
            GcLogError::Io(e) => GclensError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = GcLogError::parse(EventKind::ParNew, "young allocated overflows u64");
        let msg = err.to_string();
        assert!(msg.contains("PAR_NEW"));
        assert!(msg.contains("overflows"));
    }

    #[test]
    fn no_match_error_display() {
        let err = GcLogError::NoMatch {
            kind: EventKind::G1FullGc,
        };
        assert_eq!(err.to_string(), "line does not match G1_FULL_GC grammar");
    }

    #[test]
    fn converts_to_gclens_error() {
        let err = GcLogError::Config {
            field: "reference_date".to_owned(),
            reason: "bad date".to_owned(),
        };
        let top: GclensError = err.into();
        assert!(matches!(
            top,
            GclensError::Config(ConfigError::InvalidValue { .. })
        ));

        let top: GclensError = GcLogError::parse(EventKind::CmsRemark, "x").into();
        assert!(matches!(top, GclensError::Parse(ParseError::Structure { .. })));
    }

    #[test]
    fn io_error_passes_through() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let top: GclensError = GcLogError::from(io).into();
        assert!(matches!(top, GclensError::Io(_)));
    }
}
