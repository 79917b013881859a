//! GC 로그 파서 설정
//!
//! [`ParserConfig`]는 core의 [`ParserSettings`](gclens_core::config::ParserSettings)를
//! 기반으로 해석이 끝난 값(기준 날짜 등)을 담습니다.
//!
//! # 사용 예시
//! ```ignore
//! use gclens_core::config::GclensConfig;
//! use gclens_gc_parser::config::ParserConfig;
//!
//! let core_config = GclensConfig::default();
//! let config = ParserConfig::from_core(&core_config.parser)?;
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use gclens_core::config::{ParserSettings, MAX_FRAGMENT_BYTES_LIMIT, MIN_FRAGMENT_BYTES};

use crate::error::GcLogError;
use crate::preprocess::datestamp::parse_reference_date;

/// 기본 조각 크기 상한 (64 KiB)
pub const DEFAULT_MAX_FRAGMENT_BYTES: usize = 64 * 1024;

/// GC 로그 파서 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// 날짜 스탬프 변환 기준 시각 (없으면 첫 스탬프)
    pub reference_date: Option<NaiveDateTime>,
    /// 외부에서 제공한 JVM 옵션 문자열 (헤더보다 우선)
    pub vm_options: Option<String>,
    /// 누적 조각의 최대 크기 (바이트)
    pub max_fragment_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            reference_date: None,
            vm_options: None,
            max_fragment_bytes: DEFAULT_MAX_FRAGMENT_BYTES,
        }
    }
}

impl ParserConfig {
    /// 새 빌더를 생성합니다.
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::new()
    }

    /// core의 `ParserSettings`에서 파서 설정을 생성합니다.
    ///
    /// 기준 날짜 문자열은 여기서 해석됩니다.
    pub fn from_core(core: &ParserSettings) -> Result<Self, GcLogError> {
        let config = Self {
            reference_date: core
                .reference_date
                .as_deref()
                .map(parse_reference)
                .transpose()?,
            vm_options: core.vm_options.clone(),
            max_fragment_bytes: core.max_fragment_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), GcLogError> {
        if !(MIN_FRAGMENT_BYTES..=MAX_FRAGMENT_BYTES_LIMIT).contains(&self.max_fragment_bytes) {
            return Err(GcLogError::Config {
                field: "max_fragment_bytes".to_owned(),
                reason: format!("must be {MIN_FRAGMENT_BYTES}-{MAX_FRAGMENT_BYTES_LIMIT}"),
            });
        }

        if self
            .vm_options
            .as_deref()
            .is_some_and(|options| options.trim().is_empty())
        {
            return Err(GcLogError::Config {
                field: "vm_options".to_owned(),
                reason: "must not be blank when set".to_owned(),
            });
        }

        Ok(())
    }
}

fn parse_reference(text: &str) -> Result<NaiveDateTime, GcLogError> {
    parse_reference_date(text).ok_or_else(|| GcLogError::Config {
        field: "reference_date".to_owned(),
        reason: format!("'{text}' is not YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"),
    })
}

/// 파서 설정 빌더
#[derive(Debug, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
    reference_text: Option<String>,
}

impl ParserConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기준 날짜를 문자열로 설정합니다. `build` 시 해석됩니다.
    pub fn reference_date(mut self, date: impl Into<String>) -> Self {
        self.reference_text = Some(date.into());
        self
    }

    /// 기준 날짜를 해석된 값으로 설정합니다.
    pub fn reference_datetime(mut self, datetime: NaiveDateTime) -> Self {
        self.reference_text = None;
        self.config.reference_date = Some(datetime);
        self
    }

    pub fn vm_options(mut self, options: impl Into<String>) -> Self {
        self.config.vm_options = Some(options.into());
        self
    }

    pub fn max_fragment_bytes(mut self, bytes: usize) -> Self {
        self.config.max_fragment_bytes = bytes;
        self
    }

    /// 설정을 검증하고 `ParserConfig`를 생성합니다.
    pub fn build(mut self) -> Result<ParserConfig, GcLogError> {
        if let Some(text) = self.reference_text.take() {
            self.config.reference_date = Some(parse_reference(&text)?);
        }
        self.config.validate()?;
        Ok(self.config)
    }
}
