#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use i2c_block::{BlockTransfer, BusHandle, DeviceAddress, Direction, Transport};

// ---------------------------------------------------------------------------
// Fake transport
// ---------------------------------------------------------------------------

/// One call seen by the fake transport, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Select(u8),
    Transfer { direction: Direction, command: u8, len: usize },
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeError {
    /// Address outside the 7-bit range.
    InvalidAddress,
    /// Nobody acknowledged the transfer.
    Nack,
    /// Transfer issued with no address selected.
    NoAddress,
    /// Release of the device failed.
    Busy,
}

impl std::fmt::Display for FakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for FakeError {}

/// Shared state of the fake, inspected by tests after the transport has
/// moved into a `BusHandle`.
pub struct BusState {
    /// 256 registers per 7-bit address.
    pub registers: Vec<[u8; 256]>,
    pub selected: Option<u8>,
    pub calls: Vec<Call>,
    /// If set, the length byte reported after every transfer.
    pub report_len: Option<u8>,
    /// If set, every transfer fails with this error.
    pub transfer_error: Option<FakeError>,
    pub fail_close: bool,
}

impl BusState {
    fn new() -> Self {
        Self {
            registers: vec![[0u8; 256]; 128],
            selected: None,
            calls: Vec::new(),
            report_len: None,
            transfer_error: None,
            fail_close: false,
        }
    }

    pub fn transfer_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Transfer { .. }))
            .count()
    }
}

/// Register-model bus: writes land in per-device register files and reads
/// return them, with auto-incrementing register addresses.
pub struct RegisterBus {
    state: Rc<RefCell<BusState>>,
}

impl Transport for RegisterBus {
    type Error = FakeError;

    fn select_address(
        &mut self,
        address: DeviceAddress,
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Select(address.get()));
        if !address.is_7bit() {
            return Err(FakeError::InvalidAddress);
        }
        state.selected = Some(address.get());
        Ok(())
    }

    fn block_transfer(
        &mut self,
        transfer: &mut BlockTransfer,
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let len = usize::from(transfer.data().len_prefix());
        state.calls.push(Call::Transfer {
            direction: transfer.direction(),
            command: transfer.command(),
            len,
        });
        if let Some(err) = state.transfer_error {
            return Err(err);
        }
        let device = usize::from(state.selected.ok_or(FakeError::NoAddress)?);
        let start = transfer.command();

        match transfer.direction() {
            Direction::Write => {
                let payload = transfer.data().payload(len).to_vec();
                for (i, byte) in payload.into_iter().enumerate() {
                    let reg = start.wrapping_add(i as u8);
                    state.registers[device][usize::from(reg)] = byte;
                }
            }
            Direction::Read => {
                let regs = state.registers[device];
                let out = transfer.data_mut().payload_mut();
                for (i, slot) in out.iter_mut().take(len).enumerate() {
                    *slot = regs[usize::from(start.wrapping_add(i as u8))];
                }
            }
        }

        if let Some(reported) = state.report_len {
            transfer.data_mut().set_len_prefix(reported);
        }
        Ok(())
    }

    fn close(self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Close);
        if state.fail_close {
            return Err(FakeError::Busy);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn fake_bus() -> (BusHandle<RegisterBus>, Rc<RefCell<BusState>>) {
    init_tracing();
    let state = Rc::new(RefCell::new(BusState::new()));
    let bus = RegisterBus { state: state.clone() };
    (BusHandle::new(bus), state)
}
