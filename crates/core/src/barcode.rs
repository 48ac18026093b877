//! Debouncing for keyboard-wedge ID-card scanners.
//!
//! A scanner "types" the card number in a burst of key events. The burst is
//! over once no key has arrived for [`SCAN_IDLE`]. Enter keeps the burst
//! alive but is never part of the code.

use std::time::{Duration, Instant};

use crate::validation::is_valid_barcode;

pub const SCAN_IDLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKey {
    Char(char),
    Enter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// Six digits, ready for lookup.
    Barcode(String),
    /// A burst that is not a barcode (a person typing, a misread).
    Rejected(String),
}

impl Scan {
    fn from_buffer(buffer: String) -> Self {
        if is_valid_barcode(&buffer) {
            Scan::Barcode(buffer)
        } else {
            Scan::Rejected(buffer)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanBuffer {
    idle: Duration,
    buffer: String,
    last_key: Option<Instant>,
}

impl Default for ScanBuffer {
    fn default() -> Self {
        Self::new(SCAN_IDLE)
    }
}

impl ScanBuffer {
    pub fn new(idle: Duration) -> Self {
        Self {
            idle,
            buffer: String::new(),
            last_key: None,
        }
    }

    /// Feeds one key event. If the previous burst had already gone quiet,
    /// it is completed and returned before the new key is buffered.
    pub fn push(&mut self, key: ScanKey, at: Instant) -> Option<Scan> {
        let finished = self.poll(at);
        if let ScanKey::Char(c) = key {
            self.buffer.push(c);
        }
        self.last_key = Some(at);
        finished
    }

    /// Completes the current burst once it has been quiet for the idle period.
    pub fn poll(&mut self, now: Instant) -> Option<Scan> {
        let last = self.last_key?;
        if now.saturating_duration_since(last) < self.idle {
            return None;
        }
        self.last_key = None;
        if self.buffer.is_empty() {
            return None;
        }
        Some(Scan::from_buffer(std::mem::take(&mut self.buffer)))
    }

    /// When the current burst completes if no further key arrives.
    pub fn deadline(&self) -> Option<Instant> {
        self.last_key.map(|last| last + self.idle)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_key = None;
    }
}
