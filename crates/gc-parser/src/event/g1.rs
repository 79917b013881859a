//! G1 수집기 문법
//!
//! G1은 크기를 단위 접미사(`B`/`K`/`M`/`G`)로 출력합니다. 추출 시 KB로 변환합니다.
//! 세대별 점유량은 `-XX:+PrintGCDetails` 요약 블록 없이는 알 수 없으므로
//! 힙 전체(`combined`)만 채웁니다.

use gclens_core::types::{CollectionData, ConcurrentPhaseData, EventKind, LogEvent};

use super::{EventTypeDescriptor, Fields};
use crate::error::GcLogError;
use crate::grammar::{
    line_end, secs, transition, trigger, ts, unit_transition, DURATION, TIMESTAMP,
};

/// `[Eden: ... Survivors: ... Heap: ...]` 요약 블록
const DETAILS_BLOCK: &str = r"(?:\[Eden: [^\]]*\])";

pub fn descriptors() -> Result<Vec<EventTypeDescriptor>, regex::Error> {
    Ok(vec![
        EventTypeDescriptor::new(EventKind::G1FullGc, &full_gc_pattern(), extract_full_gc)?,
        EventTypeDescriptor::new(
            EventKind::G1YoungPause,
            &young_pause_pattern(),
            extract_young_pause,
        )?,
        EventTypeDescriptor::new(EventKind::G1Remark, &remark_pattern(), extract_remark)?,
        EventTypeDescriptor::new(EventKind::G1Cleanup, &cleanup_pattern(), extract_cleanup)?,
        EventTypeDescriptor::new(
            EventKind::G1Concurrent,
            &concurrent_pattern(),
            extract_concurrent,
        )?,
    ])
}

fn full_gc_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[Full GC(?: \({trigger}\))? {{1,2}}{combined}, {duration}\]",
            r"{DETAILS_BLOCK}?(?:, \[(?:Perm|Metaspace): {perm}\])?{end}"
        ),
        timestamp = ts("timestamp"),
        trigger = trigger("trigger"),
        combined = unit_transition("combined"),
        perm = transition("perm"),
        duration = secs("duration"),
        end = line_end(),
        DETAILS_BLOCK = DETAILS_BLOCK,
    )
}

fn extract_full_gc(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::G1FullGc(CollectionData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.millis("duration")?,
            f.trigger(&["trigger"], &[]),
        ),
        young: None,
        old: None,
        perm: f.opt_occupancy("perm")?,
        combined: Some(f.unit_occupancy("combined")?),
    }))
}

fn young_pause_pattern() -> String {
    format!(
        concat!(
            r"^{timestamp}: \[GC pause (?:\({t1}\) )?\(young\)(?: \(initial-mark\))?(?: \({t2}\))? ",
            r"{combined}, {duration}\]{DETAILS_BLOCK}?{end}"
        ),
        timestamp = ts("timestamp"),
        t1 = trigger("t1"),
        t2 = trigger("t2"),
        combined = unit_transition("combined"),
        duration = secs("duration"),
        end = line_end(),
        DETAILS_BLOCK = DETAILS_BLOCK,
    )
}

fn extract_young_pause(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::G1YoungPause(CollectionData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.millis("duration")?,
            f.trigger(&["t1", "t2"], &[]),
        ),
        young: None,
        old: None,
        perm: None,
        combined: Some(f.unit_occupancy("combined")?),
    }))
}

fn remark_pattern() -> String {
    format!(
        r"^{timestamp}: \[GC remark(?: {TIMESTAMP}: \[[A-Za-z -]+, {DURATION} secs\])*, {duration}\]{end}",
        timestamp = ts("timestamp"),
        duration = secs("duration"),
        end = line_end(),
    )
}

fn extract_remark(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::G1Remark(CollectionData {
        common: f.common(f.timestamp("timestamp")?, f.millis("duration")?, None),
        ..CollectionData::default()
    }))
}

fn cleanup_pattern() -> String {
    format!(
        r"^{timestamp}: \[GC cleanup {combined}, {duration}\]{end}",
        timestamp = ts("timestamp"),
        combined = unit_transition("combined"),
        duration = secs("duration"),
        end = line_end(),
    )
}

fn extract_cleanup(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::G1Cleanup(CollectionData {
        common: f.common(f.timestamp("timestamp")?, f.millis("duration")?, None),
        combined: Some(f.unit_occupancy("combined")?),
        ..CollectionData::default()
    }))
}

fn concurrent_pattern() -> String {
    format!(
        r"^{timestamp}: \[GC concurrent-(?P<phase>[a-z-]+)(?:, {duration})?\]{end}",
        timestamp = ts("timestamp"),
        duration = secs("duration"),
        end = line_end(),
    )
}

fn extract_concurrent(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::G1Concurrent(ConcurrentPhaseData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.opt_millis("duration")?.unwrap_or(0),
            None,
        ),
        phase: f.required("phase")?.to_owned(),
        cpu_ms: None,
    }))
}
