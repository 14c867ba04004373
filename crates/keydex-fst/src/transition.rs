// State and transition records for zero-copy access to dictionary images.

use bytemuck::{Pod, Zeroable};

/// Bit in [`StateRecord::flags`] marking a final state.
pub const FLAG_FINAL: u16 = 0x0001;

/// State record (16 bytes).
///
/// - `first_transition` (u32): index of the state's first transition record
/// - `transition_count` (u16): number of consecutive transition records
/// - `flags` (u16): bit 0 set when a key ends here
/// - `final_output` (u32): output emitted when a key ends here
/// - `max_remaining` (u32): largest output collectable from this state to
///   any final state below it (final output included)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct StateRecord {
    pub first_transition: u32,
    pub transition_count: u16,
    pub flags: u16,
    pub final_output: u32,
    pub max_remaining: u32,
}

impl StateRecord {
    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags & FLAG_FINAL != 0
    }

    /// Index one past the state's last transition record.
    #[inline]
    pub fn transitions_end(&self) -> u64 {
        self.first_transition as u64 + self.transition_count as u64
    }
}

/// Transition record (12 bytes).
///
/// - `symbol` (u16): input symbol index (never 0, epsilon is not a label)
/// - `_reserved` (u16): padding, zero
/// - `target` (u32): target state index
/// - `output` (u32): output fragment emitted on this transition
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TransitionRecord {
    pub symbol: u16,
    pub _reserved: u16,
    pub target: u32,
    pub output: u32,
}

pub const STATE_RECORD_SIZE: usize = size_of::<StateRecord>();
pub const TRANSITION_RECORD_SIZE: usize = size_of::<TransitionRecord>();

// Static assertions for struct sizes
const _: () = assert!(STATE_RECORD_SIZE == 16);
const _: () = assert!(TRANSITION_RECORD_SIZE == 12);
