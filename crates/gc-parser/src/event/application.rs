//! 애플리케이션 스레드 정지/실행 시간 문법
//!
//! `-XX:+PrintGCApplicationStoppedTime` / `-XX:+PrintGCApplicationConcurrentTime` 출력입니다.
//! 타임스탬프 접두사가 없을 수 있으며, 이 경우 타임스탬프는 0입니다.

use gclens_core::types::{EventKind, LogEvent, StoppedTimeData};

use super::{EventTypeDescriptor, Fields};
use crate::error::GcLogError;
use crate::grammar::{ts, DURATION};

pub fn descriptors() -> Result<Vec<EventTypeDescriptor>, regex::Error> {
    Ok(vec![
        EventTypeDescriptor::new(
            EventKind::ApplicationStoppedTime,
            &stopped_time_pattern(),
            extract_stopped_time,
        )?,
        EventTypeDescriptor::new(
            EventKind::ApplicationConcurrentTime,
            &concurrent_time_pattern(),
            extract_concurrent_time,
        )?,
    ])
}

fn stopped_time_pattern() -> String {
    format!(
        concat!(
            r"^(?:{timestamp}: )?Total time for which application threads were stopped: ",
            r"(?P<duration>{DURATION}) seconds",
            r"(?:, Stopping threads took: (?P<stopping>{DURATION}) seconds)?[ ]*$"
        ),
        timestamp = ts("timestamp"),
        DURATION = DURATION,
    )
}

fn extract_stopped_time(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::ApplicationStoppedTime(StoppedTimeData {
        common: f.common(f.timestamp("timestamp")?, f.millis("duration")?, None),
        stopping_threads_ms: f.opt_millis("stopping")?,
    }))
}

fn concurrent_time_pattern() -> String {
    format!(
        r"^(?:{timestamp}: )?Application time: (?P<duration>{DURATION}) seconds[ ]*$",
        timestamp = ts("timestamp"),
    )
}

fn extract_concurrent_time(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::ApplicationConcurrentTime(f.common(
        f.timestamp("timestamp")?,
        f.millis("duration")?,
        None,
    )))
}
