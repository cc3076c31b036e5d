//! Interrupt-shared state for the colour sensor's sense line.
//!
//! Two interrupt sources touch this state:
//!
//! - the sense-line edge interrupt calls [`SenseChannel::on_edge`]
//! - the periodic timer interrupt calls [`SenseChannel::on_tick`]
//!
//! The application flow opens a window, waits for it to close, then takes the
//! count. Every operation runs inside one critical section, so a window close
//! and the disarming of the counter are a single step as seen by the edge
//! handler, and a take can never interleave with an increment.
//!
//! ```rust,ignore
//! static SENSE: SenseChannel = SenseChannel::new();
//!
//! #[interrupt]
//! fn PORT1() {
//!     SENSE.on_edge();
//! }
//!
//! #[interrupt]
//! fn TIMER0_A0() {
//!     SENSE.on_tick();
//! }
//! ```

use core::cell::Cell;
use critical_section::{CriticalSection, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CounterState {
    armed: bool,
    pulses: u32,
}

/// Edge counter incremented from the sense-line interrupt.
///
/// Edges are only counted while the counter is armed.
pub struct PulseCounter {
    state: Mutex<Cell<CounterState>>,
}

impl PulseCounter {
    /// Creates a disarmed counter at zero.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(CounterState {
                armed: false,
                pulses: 0,
            })),
        }
    }

    /// Records one sense-line edge. Returns `true` if it was counted.
    pub fn on_edge(&self) -> bool {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            if !state.armed {
                return false;
            }
            state.pulses = state.pulses.saturating_add(1);
            cell.set(state);
            true
        })
    }

    /// Resets the count to zero and starts counting.
    pub fn arm(&self) {
        critical_section::with(|cs| self.arm_in(cs));
    }

    /// Stops counting. Edges delivered after this returns are ignored.
    pub fn disarm(&self) {
        critical_section::with(|cs| self.disarm_in(cs));
    }

    /// Disarms, then reads and resets the count.
    pub fn take(&self) -> u32 {
        critical_section::with(|cs| self.take_in(cs))
    }

    /// Current count without resetting it.
    pub fn peek(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow(cs).get().pulses)
    }

    /// Returns `true` while edges are being counted.
    pub fn is_armed(&self) -> bool {
        critical_section::with(|cs| self.state.borrow(cs).get().armed)
    }

    fn arm_in(&self, cs: CriticalSection<'_>) {
        self.state.borrow(cs).set(CounterState {
            armed: true,
            pulses: 0,
        });
    }

    fn disarm_in(&self, cs: CriticalSection<'_>) {
        let cell = self.state.borrow(cs);
        let mut state = cell.get();
        state.armed = false;
        cell.set(state);
    }

    fn take_in(&self, cs: CriticalSection<'_>) -> u32 {
        let cell = self.state.borrow(cs);
        let pulses = cell.get().pulses;
        cell.set(CounterState {
            armed: false,
            pulses: 0,
        });
        pulses
    }
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a measurement window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowState {
    /// No measurement in progress.
    Idle,

    /// Counting; `elapsed` ticks of `length` have passed.
    Open { elapsed: u16, length: u16 },

    /// Window has closed and counting is disarmed. The count is ready.
    Closed,
}

/// Fixed-length measurement window advanced by a periodic tick.
pub struct MeasurementWindow {
    state: Mutex<Cell<WindowState>>,
}

impl MeasurementWindow {
    /// Creates an idle window.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(WindowState::Idle)),
        }
    }

    /// Current window state.
    pub fn state(&self) -> WindowState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    /// Returns `true` once the open window has run its full length.
    pub fn is_closed(&self) -> bool {
        self.state() == WindowState::Closed
    }

    /// Returns `true` while the window is counting ticks.
    pub fn is_open(&self) -> bool {
        matches!(self.state(), WindowState::Open { .. })
    }

    fn open_in(&self, cs: CriticalSection<'_>, length: u16) {
        self.state
            .borrow(cs)
            .set(WindowState::Open { elapsed: 0, length });
    }

    /// Advances an open window by one tick. Returns `true` on the closing tick.
    fn tick_in(&self, cs: CriticalSection<'_>) -> bool {
        let cell = self.state.borrow(cs);
        match cell.get() {
            WindowState::Open { elapsed, length } => {
                let elapsed = elapsed.saturating_add(1);
                if elapsed >= length {
                    cell.set(WindowState::Closed);
                    true
                } else {
                    cell.set(WindowState::Open { elapsed, length });
                    false
                }
            }
            WindowState::Idle | WindowState::Closed => false,
        }
    }

    fn set_in(&self, cs: CriticalSection<'_>, state: WindowState) {
        self.state.borrow(cs).set(state);
    }
}

impl Default for MeasurementWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Pulse counter and measurement window for one sensor head.
///
/// Intended to live in a `static` shared by the application and both
/// interrupt handlers.
pub struct SenseChannel {
    counter: PulseCounter,
    window: MeasurementWindow,
}

impl SenseChannel {
    /// Creates an idle, disarmed channel.
    pub const fn new() -> Self {
        Self {
            counter: PulseCounter::new(),
            window: MeasurementWindow::new(),
        }
    }

    /// Edge interrupt entry point. Returns `true` if the edge was counted.
    #[inline]
    pub fn on_edge(&self) -> bool {
        self.counter.on_edge()
    }

    /// Timer interrupt entry point. Returns `true` on the tick that closes a window.
    ///
    /// The closing tick disarms the counter in the same critical section that
    /// marks the window closed.
    pub fn on_tick(&self) -> bool {
        critical_section::with(|cs| {
            let closed = self.window.tick_in(cs);
            if closed {
                self.counter.disarm_in(cs);
            }
            closed
        })
    }

    /// Zeroes and arms the counter and opens a window of `length` ticks.
    ///
    /// Any window already open is restarted.
    pub fn begin_window(&self, length: u16) {
        critical_section::with(|cs| {
            self.counter.arm_in(cs);
            self.window.open_in(cs, length);
        });
    }

    /// Returns `true` once the current window has closed.
    pub fn window_closed(&self) -> bool {
        self.window.is_closed()
    }

    /// Returns `true` while edges are being counted.
    pub fn is_counting(&self) -> bool {
        self.counter.is_armed()
    }

    /// Closes the current window early, disarming the counter.
    pub fn force_close(&self) {
        critical_section::with(|cs| {
            self.counter.disarm_in(cs);
            self.window.set_in(cs, WindowState::Closed);
        });
    }

    /// Disarms the counter, takes the count and returns the window to idle.
    pub fn finish_window(&self) -> u32 {
        critical_section::with(|cs| {
            let pulses = self.counter.take_in(cs);
            self.window.set_in(cs, WindowState::Idle);
            pulses
        })
    }

    /// The channel's pulse counter.
    pub fn counter(&self) -> &PulseCounter {
        &self.counter
    }

    /// The channel's measurement window.
    pub fn window(&self) -> &MeasurementWindow {
        &self.window
    }
}

impl Default for SenseChannel {
    fn default() -> Self {
        Self::new()
    }
}
