//! Core board facade tests: startup state, local I/O, fast-bus
//! primitives, and identification through the facade.

use crate::mock_hw::{MockBroadcast, MockIdLines, MockIrq, NoopDelay, SpyBus};

use groundtest::core_board::{Button, CoreBoard, LedName};
use groundtest::error::{Error, IdentError};
use groundtest::pins;
use groundtest::slots::BoardIdentity;

const REFERENCE_SWEEP: [u16; 8] = [430, 1018, 1139, 1615, 2199, 2812, 3726, 0];

type TestCoreBoard = CoreBoard<SpyBus, SpyBus, MockIdLines, MockBroadcast, MockIrq>;

fn make_core(
    samples: [u16; 8],
) -> (
    TestCoreBoard,
    std::rc::Rc<std::cell::RefCell<Vec<bool>>>,
    std::rc::Rc<std::cell::Cell<bool>>,
) {
    let (broadcast, broadcast_history) = MockBroadcast::new();
    let (irq, irq_level) = MockIrq::new();
    let core = CoreBoard::new(
        SpyBus::new(),
        SpyBus::new(),
        MockIdLines::new(samples),
        broadcast,
        irq,
    )
    .unwrap();
    (core, broadcast_history, irq_level)
}

#[test]
fn startup_closes_channels_and_idles_the_expander() {
    let (mut core, broadcast_history, _irq) = make_core(REFERENCE_SWEEP);

    let bus = core.gate().trunk();
    assert_eq!(bus.mask_history, vec![0x00]);
    // Buttons released high for input, LEDs off.
    assert_eq!(
        bus.device_memory(None, pins::CORE_EXPANDER_ADDRESS),
        Some(&vec![0xFF, 0x00])
    );
    assert_eq!(*broadcast_history.borrow(), vec![false]);
}

#[test]
fn identification_through_the_facade() {
    let (mut core, _bc, _irq) = make_core(REFERENCE_SWEEP);

    let slot = core.find_board(BoardIdentity::Igniter).unwrap();
    assert_eq!(slot.index(), 0);
    assert_eq!(
        core.find_board(BoardIdentity::Solenoid).unwrap().index(),
        1
    );
}

#[test]
fn find_board_reports_missing_identity() {
    let (mut core, _bc, _irq) = make_core([0; 8]);
    assert_eq!(
        core.find_board(BoardIdentity::Igniter),
        Err(Error::Ident(IdentError::NotFound))
    );
}

#[test]
fn fast_bus_round_trip() {
    let (mut core, _bc, _irq) = make_core(REFERENCE_SWEEP);
    let payload = [0xDE, 0xAD, 0xBE, 0xEF];

    core.fast_write(0x42, &payload).unwrap();
    let mut readback = [0u8; 4];
    core.fast_read(0x42, &mut readback).unwrap();
    assert_eq!(readback, payload);
}

#[test]
fn button_poll_skips_expander_while_line_idle() {
    let (mut core, _bc, _irq) = make_core(REFERENCE_SWEEP);

    let before = core.gate().trunk().accesses;
    assert_eq!(core.button_pressed().unwrap(), None);
    assert_eq!(core.gate().trunk().accesses, before);
}

#[test]
fn button_press_decodes_from_expander() {
    let (mut core, _bc, irq) = make_core(REFERENCE_SWEEP);

    irq.set(true);
    core.gate()
        .trunk()
        .prime_read(None, pins::CORE_EXPANDER_ADDRESS, vec![0x04, 0x00]);
    assert_eq!(core.button_pressed().unwrap(), Some(Button::C));
}

#[test]
fn simultaneous_buttons_decode_to_none() {
    let (mut core, _bc, irq) = make_core(REFERENCE_SWEEP);

    irq.set(true);
    core.gate()
        .trunk()
        .prime_read(None, pins::CORE_EXPANDER_ADDRESS, vec![0x06, 0x00]);
    assert_eq!(core.button_pressed().unwrap(), None);
}

#[test]
fn blink_restores_the_led_to_off() {
    let (mut core, _bc, _irq) = make_core(REFERENCE_SWEEP);

    let mut delay = NoopDelay;
    core.blink_led(&mut delay, LedName::D, 3).unwrap();

    let bus = core.gate().trunk();
    assert_eq!(
        bus.device_memory(None, pins::CORE_EXPANDER_ADDRESS),
        Some(&vec![0xFF, 0x00])
    );
}

#[test]
fn broadcast_line_follows_commands() {
    let (mut core, broadcast_history, _irq) = make_core(REFERENCE_SWEEP);

    core.set_broadcast(true).unwrap();
    core.set_broadcast(false).unwrap();
    assert_eq!(*broadcast_history.borrow(), vec![false, true, false]);
}
