//! 에러 타입 -- 도메인별 에러 정의

/// gclens 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum GclensError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 문법 정규식 컴파일 실패
    #[error("grammar compilation failed: {0}")]
    Grammar(String),

    /// 매칭된 라인의 구조 불일치
    #[error("{kind}: {reason}")]
    Structure { kind: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: GclensError = ConfigError::InvalidValue {
            field: "general.log_level".to_owned(),
            reason: "bad".to_owned(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.starts_with("config error"));
        assert!(msg.contains("general.log_level"));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::Structure {
            kind: "PAR_NEW".to_owned(),
            reason: "missing group".to_owned(),
        };
        assert_eq!(err.to_string(), "PAR_NEW: missing group");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GclensError = io.into();
        assert!(matches!(err, GclensError::Io(_)));
    }
}
