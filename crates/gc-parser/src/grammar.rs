//! 공용 필드 문법 -- 타임스탬프, 소요 시간, 영역 크기, 트리거 문구
//!
//! 모든 이벤트 문법이 같은 조각을 재사용하도록 "타임스탬프는 어떻게 생겼는가"를
//! 한 곳에서 정의합니다. 소수 구분자는 로케일에 따라 `.` 또는 `,`가 올 수 있으므로
//! 모든 숫자 조각이 두 가지를 모두 허용합니다.
//!
//! 정규식 그룹 이름은 하나의 패턴 안에서 중복될 수 없으므로, 캡처가 필요한 조각은
//! 이름을 인자로 받는 함수로 제공하고 나머지는 비캡처 상수로 제공합니다.

/// 상대 타임스탬프 (`ddd.ddd` / `ddd,ddd`, 단위: 초)
pub const TIMESTAMP: &str = r"\d{0,12}[.,]\d{3}";

/// pause 소요 시간 숫자부 (단위: 초)
pub const DURATION: &str = r"\d{1,4}[.,]\d{3,7}";

/// 동시 단계의 CPU/wall 시간 (`1.427/2.228 secs`의 각 항)
pub const CONCURRENT_TIME: &str = r"\d{1,6}[.,]\d{3}";

/// 킬로바이트 단위 크기 (`5589K`)
pub const KB_SIZE: &str = r"\d{1,12}K";

/// 단위 접미사 크기 (`653M`, `30.0G`, `0.0B`)
pub const UNIT_SIZE: &str = r"\d{1,7}(?:[.,]\d{1,2})?[BKMG]";

/// 절대 날짜 스탬프 (`2010-02-26T09:32:12.486-0600`)
pub const DATESTAMP: &str = r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[.,]\d{3}[-+]\d{4}";

/// `[Times: user=0.18 sys=0.02, real=0.04 secs]` 블록
pub const TIMES_BLOCK: &str =
    r"(?: \[Times: user=\d{1,4}[.,]\d{2} sys=\d{1,4}[.,]\d{2}, real=\d{1,4}[.,]\d{2} secs\])";

/// incremental CMS duty cycle 블록 (` icms_dc=5 `)
pub const ICMS_DC_BLOCK: &str = r"(?: icms_dc=\d{1,3} )";

/// 트리거 문구 선택지 (괄호 제외)
pub const TRIGGER: &str = concat!(
    r"System\.gc\(\)|System|Allocation Failure|promotion failed|concurrent mode failure|",
    r"concurrent mode interrupted|Heap Inspection Initiated GC|Metadata GC Threshold|",
    r"Last ditch collection|GCLocker Initiated GC|JvmtiEnv ForceGarbageCollection|",
    r"Class Histogram|G1 Evacuation Pause|to-space exhausted|Ergonomics"
);

/// 라인 끝: 선택적 Times 블록과 후행 공백
pub fn line_end() -> String {
    format!(r"{TIMES_BLOCK}?[ ]*$")
}

/// 전처리 후 남는 클래스 히스토그램 블록 (`11747.379: [Class Histogram:, 2.0947428 secs]`)
pub fn class_histogram_block() -> String {
    format!(r"(?:{TIMESTAMP}: )?\[Class Histogram:?, {DURATION} secs\]")
}

/// CMS 동시 단계 조각 (`3081.621: [CMS-concurrent-mark: 11.907/12.958 secs] [Times: ...]`)
///
/// 수집 라인 중간에 끼어든 조각을 끌어올릴 때와 단독 라인 문법이 공유합니다.
pub fn cms_concurrent_block() -> String {
    format!(
        r"{TIMESTAMP}: \[CMS-concurrent-[a-z-]+(?:: {CONCURRENT_TIME}/{CONCURRENT_TIME} secs)?\]{TIMES_BLOCK}?"
    )
}

/// 이름 있는 타임스탬프 캡처
pub fn ts(name: &str) -> String {
    format!(r"(?P<{name}>{TIMESTAMP})")
}

/// 이름 있는 소요 시간 캡처 (` secs` 접미사 포함, 숫자만 캡처)
pub fn secs(name: &str) -> String {
    format!(r"(?P<{name}>{DURATION}) secs")
}

/// 이름 있는 KB 크기 캡처 (`K` 제외 숫자만 캡처)
pub fn kb(name: &str) -> String {
    format!(r"(?P<{name}>\d{{1,12}})K")
}

/// `init->end(allocated)` KB 삼중항 캡처
///
/// 그룹 이름은 `{prefix}_init`, `{prefix}_end`, `{prefix}_alloc`입니다.
pub fn transition(prefix: &str) -> String {
    format!(
        r"{}->{}\({}\)",
        kb(&format!("{prefix}_init")),
        kb(&format!("{prefix}_end")),
        kb(&format!("{prefix}_alloc"))
    )
}

/// 단위 접미사 크기 캡처 (단위 포함)
pub fn unit(name: &str) -> String {
    format!(r"(?P<{name}>{UNIT_SIZE})")
}

/// 단위 접미사 `init->end(allocated)` 삼중항 캡처
pub fn unit_transition(prefix: &str) -> String {
    format!(
        r"{}->{}\({}\)",
        unit(&format!("{prefix}_init")),
        unit(&format!("{prefix}_end")),
        unit(&format!("{prefix}_alloc"))
    )
}

/// 이름 있는 트리거 문구 캡처 (괄호 미포함)
pub fn trigger(name: &str) -> String {
    format!(r"(?P<{name}>{TRIGGER})")
}

/// 이름 있는 클래스 히스토그램 블록 캡처 (존재 여부 판단용)
pub fn histogram(name: &str) -> String {
    format!(r"(?P<{name}>{})", class_histogram_block())
}

/// 초 단위 십진수를 밀리초로 변환합니다.
///
/// 소수점 넷째 자리에서 반올림합니다 (0.5ms는 올림).
/// `.`과 `,` 구분자를 모두 허용합니다.
pub fn seconds_to_millis(value: &str) -> Option<u64> {
    let (whole, fraction) = match value.find(['.', ',']) {
        Some(idx) => (&value[..idx], &value[idx + 1..]),
        None => (value, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let digits = fraction.as_bytes();
    let mut millis = 0u64;
    for idx in 0..3 {
        millis = millis * 10 + digits.get(idx).map_or(0, |d| u64::from(d - b'0'));
    }
    let round_up = digits.get(3).is_some_and(|d| *d >= b'5');

    whole
        .checked_mul(1000)?
        .checked_add(millis + u64::from(round_up))
}

/// `K` 접미사 없는 KB 숫자를 파싱합니다.
pub fn parse_kb(value: &str) -> Option<u64> {
    value.trim_end_matches('K').parse().ok()
}

/// 단위 접미사 크기를 KB로 변환합니다.
///
/// 2의 거듭제곱 단위를 사용합니다 (1M = 1024K, 1G = 1024×1024K).
/// 바이트 값은 가장 가까운 KB로 반올림합니다.
pub fn unit_to_kb(value: &str) -> Option<u64> {
    let unit = value.chars().last()?;
    let multiplier_bytes: u128 = match unit {
        'B' => 1,
        'K' => 1024,
        'M' => 1024 * 1024,
        'G' => 1024 * 1024 * 1024,
        _ => return None,
    };
    let number = &value[..value.len() - 1];
    let (whole, fraction) = match number.find(['.', ',']) {
        Some(idx) => (&number[..idx], &number[idx + 1..]),
        None => (number, ""),
    };
    if whole.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let scale = 10u128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
    let whole: u128 = whole.parse().ok()?;
    let fraction: u128 = if fraction.is_empty() {
        0
    } else {
        fraction.parse().ok()?
    };

    let numerator = whole
        .checked_mul(scale)?
        .checked_add(fraction)?
        .checked_mul(multiplier_bytes)?;
    let denominator = scale.checked_mul(1024)?;
    u64::try_from(numerator.checked_add(denominator / 2)? / denominator).ok()
}
