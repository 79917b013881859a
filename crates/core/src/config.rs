//! 설정 관리 -- gclens.toml 파싱 및 런타임 설정
//!
//! [`GclensConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`GCLENS_PARSER_REFERENCE_DATE=2010-02-26` 형식)
//! 3. 설정 파일 (`gclens.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), gclens_core::error::GclensError> {
//! use gclens_core::config::GclensConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = GclensConfig::load("gclens.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = GclensConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, GclensError};

/// 조각 버퍼 최대 크기 상한 (1 MiB)
pub const MAX_FRAGMENT_BYTES_LIMIT: usize = 1024 * 1024;

/// 조각 버퍼 최대 크기 하한
pub const MIN_FRAGMENT_BYTES: usize = 256;

/// gclens 통합 설정
///
/// `gclens.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GclensConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// GC 로그 파서 설정
    #[serde(default)]
    pub parser: ParserSettings,
}

impl GclensConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GclensError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, GclensError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GclensError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                GclensError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, GclensError> {
        toml::from_str(toml_str).map_err(|e| {
            GclensError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `GCLENS_{SECTION}_{FIELD}`
    /// 예: `GCLENS_GENERAL_LOG_LEVEL=debug`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "GCLENS_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "GCLENS_GENERAL_LOG_FORMAT");

        // Parser
        override_opt_string(
            &mut self.parser.reference_date,
            "GCLENS_PARSER_REFERENCE_DATE",
        );
        override_opt_string(&mut self.parser.vm_options, "GCLENS_PARSER_VM_OPTIONS");
        override_usize(
            &mut self.parser.max_fragment_bytes,
            "GCLENS_PARSER_MAX_FRAGMENT_BYTES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 날짜 형식 자체는 파서 크레이트가 `ParserConfig`로 변환할 때 검증합니다.
    pub fn validate(&self) -> Result<(), GclensError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self
            .parser
            .reference_date
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "parser.reference_date".to_owned(),
                reason: "must not be empty when set".to_owned(),
            }
            .into());
        }

        let bytes = self.parser.max_fragment_bytes;
        if !(MIN_FRAGMENT_BYTES..=MAX_FRAGMENT_BYTES_LIMIT).contains(&bytes) {
            return Err(ConfigError::InvalidValue {
                field: "parser.max_fragment_bytes".to_owned(),
                reason: format!(
                    "must be between {MIN_FRAGMENT_BYTES} and {MAX_FRAGMENT_BYTES_LIMIT}, got {bytes}"
                ),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// GC 로그 파서 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// 절대 날짜 스탬프를 상대 시간으로 변환할 기준 시각
    ///
    /// `YYYY-MM-DD` 또는 `YYYY-MM-DDTHH:MM:SS` 형식입니다.
    /// 없으면 로그에서 처음 만나는 날짜 스탬프를 기준으로 사용합니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<String>,
    /// 어드바이저에 그대로 전달할 VM 옵션 문자열
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_options: Option<String>,
    /// 열린 조각 버퍼의 최대 크기 (바이트)
    pub max_fragment_bytes: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            reference_date: None,
            vm_options: None,
            max_fragment_bytes: 64 * 1024,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_opt_string(target: &mut Option<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = Some(val);
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = GclensConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert!(config.parser.reference_date.is_none());
        assert!(config.parser.vm_options.is_none());
        assert_eq!(config.parser.max_fragment_bytes, 65536);
    }

    #[test]
    fn default_config_passes_validation() {
        let config = GclensConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = GclensConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        config.validate().unwrap();
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let config = GclensConfig::parse(
            r#"
[parser]
reference_date = "2010-02-26"
"#,
        )
        .unwrap();
        assert_eq!(config.parser.reference_date.as_deref(), Some("2010-02-26"));
        assert_eq!(config.parser.max_fragment_bytes, 65536);
        assert_eq!(config.general.log_format, "json");
    }

    #[test]
    fn from_str_full_toml() {
        let config = GclensConfig::parse(
            r#"
[general]
log_level = "debug"
log_format = "pretty"

[parser]
reference_date = "2010-04-16T00:00:00"
vm_options = "-Xmx2048m -XX:+UseConcMarkSweepGC"
max_fragment_bytes = 4096
"#,
        )
        .unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(
            config.parser.vm_options.as_deref(),
            Some("-Xmx2048m -XX:+UseConcMarkSweepGC")
        );
        assert_eq!(config.parser.max_fragment_bytes, 4096);
        config.validate().unwrap();
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = GclensConfig::parse("[general\nlog_level = ");
        assert!(matches!(
            result,
            Err(GclensError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = GclensConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = GclensConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.log_format"));
    }

    #[test]
    fn validate_rejects_blank_reference_date() {
        let mut config = GclensConfig::default();
        config.parser.reference_date = Some("   ".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parser.reference_date"));
    }

    #[test]
    fn validate_rejects_out_of_range_fragment_size() {
        let mut config = GclensConfig::default();
        config.parser.max_fragment_bytes = 16;
        assert!(config.validate().is_err());

        config.parser.max_fragment_bytes = MAX_FRAGMENT_BYTES_LIMIT + 1;
        assert!(config.validate().is_err());

        config.parser.max_fragment_bytes = MIN_FRAGMENT_BYTES;
        config.validate().unwrap();
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_GCLENS_STR", "overridden") };
        override_string(&mut val, "TEST_GCLENS_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_GCLENS_STR") };
    }

    #[test]
    fn env_override_opt_string_sets_value() {
        let mut val: Option<String> = None;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_GCLENS_OPT", "-XX:+UseG1GC") };
        override_opt_string(&mut val, "TEST_GCLENS_OPT");
        assert_eq!(val.as_deref(), Some("-XX:+UseG1GC"));
        unsafe { std::env::remove_var("TEST_GCLENS_OPT") };
    }

    #[test]
    fn env_override_usize_invalid_keeps_original() {
        let mut val = 4096usize;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_GCLENS_USIZE_BAD", "lots") };
        override_usize(&mut val, "TEST_GCLENS_USIZE_BAD");
        assert_eq!(val, 4096); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_GCLENS_USIZE_BAD") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_GCLENS_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let mut config = GclensConfig::default();
        config.parser.vm_options = Some("-Xms1g".to_owned());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = GclensConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.parser.vm_options, parsed.parser.vm_options);
        assert!(parsed.parser.reference_date.is_none());
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = GclensConfig::from_file("/nonexistent/path/gclens.toml").await;
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            GclensError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
