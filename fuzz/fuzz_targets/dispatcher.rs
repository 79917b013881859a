#![no_main]

use libfuzzer_sys::fuzz_target;

use gclens_gc_parser::{CanonicalLine, Dispatched, Dispatcher};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let Ok(dispatcher) = Dispatcher::new() else {
            return;
        };
        match dispatcher.dispatch(&CanonicalLine::new(1, text)) {
            Dispatched::Event(event) => assert_eq!(event.raw_text(), text),
            Dispatched::Unidentified(line) => assert_eq!(line.raw_text, text),
        }
    }
});
