//! Select, status and cmd/data behaviour through the public API.

use std::cell::RefCell;
use std::thread;

use critical_section::Mutex;
use hal::gpio::{GpioBank, Level};
use spidev::shared::SharedBank;
use spidev::sim::SimBank;
use spidev::{
    BusOptions, ChipSelect, DeviceEntry, DeviceId, DeviceRegistry, Dispatcher, Error, Polarity,
    StatusFlags,
};

const FLASH_CS: u32 = 13;

fn wired() -> Vec<(DeviceId, DeviceEntry)> {
    vec![
        (DeviceId::flash(0), DeviceEntry::active_low(FLASH_CS)),
        (DeviceId::flash(1), DeviceEntry::active_high(14)),
        (DeviceId::display(0), DeviceEntry::active_low(15).with_cmddata(16)),
        (DeviceId::touchscreen(0), DeviceEntry::active_high(17)),
    ]
}

fn registry() -> DeviceRegistry {
    wired()
        .into_iter()
        .try_fold(DeviceRegistry::builder(), |b, (id, entry)| b.device(id, entry))
        .unwrap()
        .build()
}

fn cmddata_options() -> BusOptions {
    BusOptions {
        cmddata_enabled: true,
        ..BusOptions::default()
    }
}

#[test]
fn select_follows_polarity_for_every_device() {
    let registry = registry();
    let mut cs = Dispatcher::new(&registry, BusOptions::default(), SimBank::<32>::new());

    for (id, entry) in wired() {
        let pin = entry.select.pin;
        cs.select(id, true);
        assert_eq!(cs.bank().level(pin), entry.select.polarity.asserted(), "{id}");
        cs.select(id, false);
        assert_eq!(cs.bank().level(pin), entry.select.polarity.deasserted(), "{id}");
    }
}

#[test]
fn unmapped_ids_have_no_side_effects() {
    let registry = registry();
    let cs_bank = SimBank::<32>::new();
    let mut cs = Dispatcher::new(&registry, BusOptions::default(), cs_bank);

    for raw in [99, 0xdead_beef, DeviceId::flash(7).raw(), DeviceId::mmcsd(0).raw()] {
        let id = DeviceId::from_raw(raw);
        cs.select(id, true);
        cs.select(id, false);
        assert_eq!(cs.status(id), StatusFlags::EMPTY);
    }
    assert_eq!(cs.bank().total_writes(), 0);
    assert_eq!(cs.bank().reads(), 0);
}

#[test]
fn repeated_select_does_not_toggle() {
    let registry = registry();
    let mut cs = Dispatcher::new(&registry, BusOptions::default(), SimBank::<32>::new());

    cs.select(DeviceId::flash(0), true);
    let once = cs.bank().level(FLASH_CS);
    cs.select(DeviceId::flash(0), true);
    assert_eq!(cs.bank().level(FLASH_CS), once);
    assert_eq!(once, Level::Low);
}

#[test]
fn status_is_zero_without_a_source() {
    let registry = registry();
    let cs = Dispatcher::new(&registry, BusOptions::default(), SimBank::<32>::new());
    for (id, _) in wired() {
        assert_eq!(cs.status(id), StatusFlags::EMPTY);
    }
}

#[test]
fn status_reports_card_detect_and_write_protect() {
    let registry = DeviceRegistry::builder()
        .device(
            DeviceId::mmcsd(0),
            DeviceEntry::active_low(2)
                .with_presence(3, Level::Low)
                .with_write_protect(4, Level::High),
        )
        .unwrap()
        .build();
    let mut cs = Dispatcher::new(&registry, BusOptions::default(), SimBank::<8>::new());

    cs.bank_mut().drive_input(3, Level::High);
    assert_eq!(cs.status(DeviceId::mmcsd(0)), StatusFlags::EMPTY);

    cs.bank_mut().drive_input(3, Level::Low);
    cs.bank_mut().drive_input(4, Level::High);
    let status = cs.status(DeviceId::mmcsd(0));
    assert!(status.contains(StatusFlags::PRESENT));
    assert!(status.contains(StatusFlags::WRITE_PROTECTED));
    assert_eq!(cs.bank().total_writes(), 0);
}

#[test]
fn cmddata_only_for_wired_devices() {
    let registry = registry();
    let mut cs = Dispatcher::new(&registry, cmddata_options(), SimBank::<32>::new());

    for (id, entry) in wired() {
        match entry.cmddata {
            Some(line) => {
                cs.cmddata(id, true).unwrap();
                assert_eq!(cs.bank().level(line.pin), line.level(true));
                cs.cmddata(id, false).unwrap();
                assert_eq!(cs.bank().level(line.pin), line.level(false));
            }
            None => assert_eq!(cs.cmddata(id, true), Err(Error::Unsupported(id))),
        }
    }

    let unmapped = DeviceId::from_raw(99);
    assert_eq!(cs.cmddata(unmapped, false), Err(Error::Unsupported(unmapped)));
}

#[test]
fn independent_buses_do_not_interfere() {
    let spi0 = registry();
    let spi1 = DeviceRegistry::builder()
        .device(DeviceId::flash(0), DeviceEntry::new(FLASH_CS, Polarity::ActiveHigh))
        .unwrap()
        .build();

    let (bank0, bank1) = thread::scope(|s| {
        let a = s.spawn(|| {
            let mut cs = Dispatcher::new(&spi0, BusOptions::default(), SimBank::<32>::new());
            for i in 0..1000 {
                cs.select(DeviceId::flash(0), i % 2 == 0);
            }
            cs.select(DeviceId::flash(0), true);
            cs.into_bank()
        });
        let b = s.spawn(|| {
            let mut cs = Dispatcher::new(&spi1, BusOptions::default(), SimBank::<32>::new());
            for i in 0..1000 {
                cs.select(DeviceId::flash(0), i % 3 == 0);
            }
            cs.select(DeviceId::flash(0), false);
            cs.into_bank()
        });
        (a.join().unwrap(), b.join().unwrap())
    });

    // Same id and pin number on both buses, opposite polarity and final state.
    assert_eq!(bank0.level(FLASH_CS), Level::Low);
    assert_eq!(bank1.level(FLASH_CS), Level::Low);
    assert_eq!(bank0.writes(FLASH_CS), 1001);
    assert_eq!(bank1.writes(FLASH_CS), 1001);
    assert_eq!(bank0.total_writes(), 1001);
    assert_eq!(bank1.total_writes(), 1001);
}

#[test]
fn buses_sharing_one_pio_touch_only_their_own_lines() {
    let spi0 = DeviceRegistry::builder()
        .device(DeviceId::flash(0), DeviceEntry::active_low(1))
        .unwrap()
        .build();
    let spi1 = DeviceRegistry::builder()
        .device(DeviceId::flash(0), DeviceEntry::active_low(2))
        .unwrap()
        .build();

    let pio = Mutex::new(RefCell::new(SimBank::<8>::new()));
    critical_section::with(|cs| {
        let mut bank = pio.borrow_ref_mut(cs);
        bank.configure_output(1, Level::High).unwrap();
        bank.configure_output(2, Level::High).unwrap();
    });

    thread::scope(|s| {
        for registry in [&spi0, &spi1] {
            let bank = SharedBank::new(&pio);
            s.spawn(move || {
                let mut cs = Dispatcher::new(registry, BusOptions::default(), bank);
                for _ in 0..500 {
                    cs.select(DeviceId::flash(0), true);
                    cs.select(DeviceId::flash(0), false);
                }
            });
        }
    });

    critical_section::with(|cs| {
        let bank = pio.borrow_ref(cs);
        assert_eq!(bank.level(1), Level::High);
        assert_eq!(bank.level(2), Level::High);
        assert_eq!(bank.writes(1), 1001);
        assert_eq!(bank.writes(2), 1001);
        assert_eq!(bank.total_writes(), 2002);
    });
}
