//! Log records emitted by the dispatcher.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use spidev::sim::SimBank;
use spidev::{BusOptions, ChipSelect, DeviceEntry, DeviceId, DeviceRegistry, Dispatcher};

struct Capture {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};

#[test]
fn unwired_ids_log_at_debug() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let registry = DeviceRegistry::builder()
        .device(DeviceId::flash(0), DeviceEntry::active_low(1))
        .unwrap()
        .build();
    let options = BusOptions {
        cmddata_enabled: true,
        ..BusOptions::default()
    };
    let mut cs = Dispatcher::new(&registry, options, SimBank::<4>::new());
    let unwired = DeviceId::from_raw(99);

    cs.select(unwired, true);
    cs.status(unwired);
    let _ = cs.cmddata(unwired, true);
    cs.select(DeviceId::flash(0), true);

    let records = CAPTURE.records.lock().unwrap();
    let debug: Vec<&str> = records
        .iter()
        .filter(|(level, _)| *level == Level::Debug)
        .map(|(_, msg)| msg.as_str())
        .collect();
    assert_eq!(
        debug,
        [
            "select user(99): not wired",
            "status user(99): not wired",
            "cmddata user(99): not wired",
        ]
    );
    assert!(records
        .iter()
        .any(|(level, msg)| *level == Level::Trace && msg.starts_with("select flash(0) true")));
}
