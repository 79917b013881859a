//! 로그 시작 헤더 문법 -- VM 버전, 메모리, 명령행 플래그
//!
//! 헤더는 타임스탬프와 소요 시간이 없으므로 둘 다 0입니다.

use gclens_core::types::{
    CommandLineFlagsData, EventKind, LogEvent, MemoryHeaderData, VersionHeaderData,
};

use super::{EventTypeDescriptor, Fields};
use crate::error::GcLogError;

const COMMAND_LINE_FLAGS: &str = r"^CommandLine flags: (?P<flags>.*?)[ ]*$";

const MEMORY: &str = concat!(
    r"^Memory: \d+k page, physical (?P<physical>\d{1,12})k\((?P<physical_free>\d{1,12})k free\)",
    r"(?:, swap (?P<swap>\d{1,12})k\((?P<swap_free>\d{1,12})k free\))?[ ]*$"
);

const VERSION: &str = concat!(
    r"^(?P<vm>(?:Java HotSpot\(TM\)|OpenJDK) [^(]+?) \([^)]+\) for \S+ JRE ",
    r"\((?P<jre>[^)]+)\).*$"
);

pub fn descriptors() -> Result<Vec<EventTypeDescriptor>, regex::Error> {
    Ok(vec![
        EventTypeDescriptor::new(
            EventKind::HeaderCommandLineFlags,
            COMMAND_LINE_FLAGS,
            extract_command_line_flags,
        )?,
        EventTypeDescriptor::new(EventKind::HeaderMemory, MEMORY, extract_memory)?,
        EventTypeDescriptor::new(EventKind::HeaderVersion, VERSION, extract_version)?,
    ])
}

fn extract_command_line_flags(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::HeaderCommandLineFlags(CommandLineFlagsData {
        common: f.common(0, 0, None),
        flags: f.required("flags")?.to_owned(),
    }))
}

fn extract_memory(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    let optional = |name: &str| -> Result<u64, GcLogError> {
        if f.present(name) { f.kb(name) } else { Ok(0) }
    };
    Ok(LogEvent::HeaderMemory(MemoryHeaderData {
        common: f.common(0, 0, None),
        physical_kb: f.kb("physical")?,
        physical_free_kb: f.kb("physical_free")?,
        swap_kb: optional("swap")?,
        swap_free_kb: optional("swap_free")?,
    }))
}

fn extract_version(f: &Fields<'_, '_>) -> Result<LogEvent, GcLogError> {
    Ok(LogEvent::HeaderVersion(VersionHeaderData {
        common: f.common(0, 0, None),
        vm_name: f.required("vm")?.to_owned(),
        jre_version: f.required("jre")?.to_owned(),
    }))
}
