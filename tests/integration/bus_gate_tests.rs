//! Bus gate tests: channel bracketing, input validation, error safety.

use crate::mock_hw::SpyBus;

use groundtest::bus::BusGate;
use groundtest::error::{Error, PreconditionError, Result, TransportError};
use groundtest::pins;
use groundtest::ports::I2cPort;

fn make_gate() -> BusGate<SpyBus> {
    BusGate::new(SpyBus::new(), pins::I2C_MUX_ADDRESS)
}

#[test]
fn with_channel_opens_then_closes() {
    let mut gate = make_gate();
    gate.with_channel(3, |bus| bus.write(0x23, &[0xAA, 0x55]))
        .unwrap();

    let bus = gate.trunk();
    assert_eq!(bus.mask_history, vec![0x08, 0x00]);
    assert_eq!(bus.mux_mask, 0x00, "channel left open after success");
}

#[test]
fn with_channel_closes_even_when_operation_fails() {
    let mut gate = make_gate();
    let result: Result<()> =
        gate.with_channel(2, |_bus| Err(TransportError::Nack.into()));

    assert_eq!(result, Err(Error::Transport(TransportError::Nack)));
    let bus = gate.trunk();
    assert_eq!(bus.mask_history, vec![0x04, 0x00]);
    assert_eq!(bus.mux_mask, 0x00, "channel left open after failure");
}

#[test]
fn out_of_range_slot_fails_without_bus_access() {
    let mut gate = make_gate();
    let result = gate.with_channel(8, |bus| bus.write(0x23, &[0]));

    assert_eq!(
        result,
        Err(Error::Precondition(PreconditionError::SlotOutOfRange(8)))
    );
    assert_eq!(gate.trunk().accesses, 0, "hardware touched before validation");
}

#[test]
fn open_failure_propagates_before_the_operation_runs() {
    let mut gate = make_gate();
    gate.trunk().fail_write_addrs = vec![pins::I2C_MUX_ADDRESS];

    let result = gate.with_channel(0, |bus| bus.write(0x23, &[0x01]));
    assert_eq!(result, Err(Error::Transport(TransportError::Nack)));
    // Only the rejected mux write was attempted.
    assert_eq!(gate.trunk().accesses, 1);
}

#[test]
fn close_failure_after_success_is_reported() {
    let mut gate = make_gate();
    gate.trunk().fail_mux_close = true;

    let result = gate.with_channel(5, |bus| bus.write(0x23, &[0x01]));
    assert_eq!(result, Err(Error::Transport(TransportError::Nack)));
}

#[test]
fn sequential_transactions_keep_single_open_discipline() {
    let mut gate = make_gate();
    for slot in 0..8 {
        gate.with_channel(slot, |bus| bus.write(0x23, &[slot]))
            .unwrap();
    }

    let bus = gate.trunk();
    assert!(bus.single_open_discipline_held());
    assert_eq!(bus.mux_mask, 0x00);
    assert_eq!(bus.mask_history.len(), 16);
}

#[test]
fn round_trip_through_one_slot_echoes() {
    let mut gate = make_gate();
    let payload = [0x12, 0x34, 0x56, 0x78];

    gate.with_channel(4, |bus| bus.write(0x23, &payload)).unwrap();

    let mut readback = [0u8; 4];
    gate.with_channel(4, |bus| bus.read(0x23, &mut readback))
        .unwrap();

    assert_eq!(readback, payload);
}

#[test]
fn device_memory_is_scoped_to_its_channel() {
    let mut gate = make_gate();
    gate.with_channel(1, |bus| bus.write(0x23, &[0x11])).unwrap();

    // The same address on a different channel is a different device.
    let mut buf = [0u8; 1];
    let result = gate.with_channel(2, |bus| bus.read(0x23, &mut buf));
    assert_eq!(result, Err(Error::Transport(TransportError::Nack)));
}

#[test]
fn close_all_resets_the_mux() {
    let mut gate = make_gate();
    gate.close_all().unwrap();
    assert_eq!(gate.trunk().mask_history, vec![0x00]);
}
