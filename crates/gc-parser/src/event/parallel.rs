//! Parallel 수집기 문법 -- PSYoungGen scavenge와 두 가지 full GC
//!
//! full GC는 old 세대 이름으로만 구분됩니다 (`ParOldGen` 압축 / `PSOldGen` 직렬).

use gclens_core::types::{CollectionData, EventKind, LogEvent};

use super::{EventTypeDescriptor, Fields};
use crate::error::GcLogError;
use crate::grammar::{line_end, secs, transition, trigger, ts};

pub fn descriptors() -> Result<Vec<EventTypeDescriptor>, regex::Error> {
    Ok(vec![
        EventTypeDescriptor::new(
            EventKind::ParallelOldCompacting,
            &full_gc_pattern("ParOldGen"),
            extract_old_compacting,
        )?,
        EventTypeDescriptor::new(
            EventKind::ParallelSerialOld,
            &full_gc_pattern("PSOldGen"),
            extract_serial_old,
        )?,
        EventTypeDescriptor::new(
            EventKind::ParallelScavenge,
            &scavenge_pattern(),
            extract_scavenge,
        )?,
    ])
}

fn full_gc_pattern(old_gen: &str) -> String {
    format!(
        concat!(
            r"^{timestamp}: \[Full GC ?(?:\({trigger}\) ?)?\[PSYoungGen: {young}\] ",
            r"\[{old_gen}: {old}\] {combined},? \[(?:PSPermGen|Metaspace): {perm}\], {duration}\]{end}"
        ),
        timestamp = ts("timestamp"),
        trigger = trigger("trigger"),
        young = transition("young"),
        old_gen = old_gen,
        old = transition("old"),
        combined = transition("combined"),
        perm = transition("perm"),
        duration = secs("duration"),
        end = line_end(),
    )
}

fn full_gc_data(f: &Fields<'_, '_>) -> Result<CollectionData, GcLogError> {
    Ok(CollectionData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.millis("duration")?,
            f.trigger(&["trigger"], &[]),
        ),
        young: Some(f.occupancy("young")?),
        old: Some(f.occupancy("old")?),
        perm: Some(f.occupancy("perm")?),
        combined: Some(f.occupancy("combined")?),
    })
}

fn extract_old_compacting(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    full_gc_data(f).map(LogEvent::ParallelOldCompacting)
}

fn extract_serial_old(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    full_gc_data(f).map(LogEvent::ParallelSerialOld)
}

fn scavenge_pattern() -> String {
    format!(
        r"^{timestamp}: \[GC(?:--)? ?(?:\({trigger}\) ?)?\[PSYoungGen: {young}\] {combined}, {duration}\]{end}",
        timestamp = ts("timestamp"),
        trigger = trigger("trigger"),
        young = transition("young"),
        combined = transition("combined"),
        duration = secs("duration"),
        end = line_end(),
    )
}

fn extract_scavenge(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    let young = f.occupancy("young")?;
    let combined = f.occupancy("combined")?;
    Ok(LogEvent::ParallelScavenge(CollectionData {
        common: f.common(
            f.timestamp("timestamp")?,
            f.millis("duration")?,
            f.trigger(&["trigger"], &[]),
        ),
        young: Some(young),
        old: Some(combined.saturating_sub(&young)),
        perm: None,
        combined: Some(combined),
    }))
}
