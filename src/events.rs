//! Interrupt-to-main-loop event plumbing.
//!
//! Two primitives, both lock-free and ISR-safe:
//!
//! - an SPSC **event queue** carrying `Event` discriminants from interrupt
//!   or timer context to the main loop;
//! - the **control-byte mailbox**, a single slot with overwrite semantics.
//!   The serial path writes every received byte into it; the main loop
//!   takes the latest one. A byte that was never processed is simply
//!   replaced — last write wins, which is exactly the behaviour a "most
//!   recent light command" channel wants.
//!
//! ```text
//! UART ISR ──▶ mailbox (1 slot, overwrite) ──▶
//!          ──▶ event queue (SPSC ring)     ──▶  main loop
//! ```

use core::sync::atomic::{AtomicU16, AtomicU8, Ordering};

/// System event types, ordered by rough priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// A control byte arrived on the serial link (read it from the mailbox).
    ControlByteReceived = 0,
    /// Telemetry report timer fired.
    TelemetryTick = 10,
}

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::ControlByteReceived),
        10 => Some(Event::TelemetryTick),
        _ => None,
    }
}

// ── Control-byte mailbox ──────────────────────────────────────
//
// Bit 8 is the valid flag, bits 0-7 carry the byte. A single atomic makes
// flag and payload inseparable, so the consumer can never observe a valid
// flag with a stale byte.

const MAILBOX_VALID: u16 = 0x0100;

static CONTROL_MAILBOX: AtomicU16 = AtomicU16::new(0);

/// Deposit a control byte, replacing any unprocessed one.
/// Safe to call from ISR context.
pub fn post_control_byte(byte: u8) {
    CONTROL_MAILBOX.store(MAILBOX_VALID | u16::from(byte), Ordering::Release);
}

/// Take the most recent control byte, leaving the mailbox empty.
pub fn take_control_byte() -> Option<u8> {
    let v = CONTROL_MAILBOX.swap(0, Ordering::AcqRel);
    if v & MAILBOX_VALID != 0 {
        Some(v as u8)
    } else {
        None
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Producer: ISR / serial-service context. Consumer: the main loop.
// Power-of-two capacity so the wrap is a mask.

const EVENT_QUEUE_CAP: usize = 8;

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: each slot is written by the single producer strictly before the
// head release-store that publishes it, and read by the single consumer
// strictly after the matching acquire-load. No slot is ever accessed from
// both sides at once.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event. Returns `false` when the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next == tail {
        return false;
    }

    // SAFETY: see EVENT_BUFFER above; this is the single producer.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }
    EVENT_HEAD.store(next, Ordering::Release);
    true
}

/// Pop the next event, FIFO. `None` when empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None;
    }

    // SAFETY: see EVENT_BUFFER above; this is the single consumer.
    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}
