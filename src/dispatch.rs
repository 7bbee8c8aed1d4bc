//! Maps the set of supplied flags to the single operation that handles it.
//!
//! Only exact matches against the table are accepted. A flag that is valid
//! on its own still makes the whole set invalid if the combination is not
//! listed.

use crate::error::TimerError;

/// Bit positions of the flags that select an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Flag {
    Time = 1 << 0,
    Sound = 1 << 1,
    Sounds = 1 << 2,
    Notify = 1 << 3,
    AddSound = 1 << 4,
    DeleteSound = 1 << 5,
}

/// Bitmask of present flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagSet(u8);

impl FlagSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    #[cfg(test)]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11_1111)
    }

    pub const fn with(self, flag: Flag) -> Self {
        Self(self.0 | flag as u8)
    }

    pub fn set(&mut self, flag: Flag, present: bool) {
        if present {
            self.0 |= flag as u8;
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Timed,
    TimedSound,
    TimedNotify,
    TimedSoundNotify,
    ListSounds,
    PlaySound,
    AddSound,
    DeleteSound,
}

const TIME: FlagSet = FlagSet::empty().with(Flag::Time);

static DISPATCH_TABLE: [(FlagSet, Operation); 8] = [
    (TIME, Operation::Timed),
    (TIME.with(Flag::Sound), Operation::TimedSound),
    (TIME.with(Flag::Notify), Operation::TimedNotify),
    (
        TIME.with(Flag::Sound).with(Flag::Notify),
        Operation::TimedSoundNotify,
    ),
    (FlagSet::empty().with(Flag::Sounds), Operation::ListSounds),
    (FlagSet::empty().with(Flag::Sound), Operation::PlaySound),
    (FlagSet::empty().with(Flag::AddSound), Operation::AddSound),
    (FlagSet::empty().with(Flag::DeleteSound), Operation::DeleteSound),
];

/// Look up the operation registered for exactly this set of flags.
pub fn resolve(flags: FlagSet) -> Result<Operation, TimerError> {
    let operation = DISPATCH_TABLE
        .iter()
        .find(|(key, _)| *key == flags)
        .map(|(_, op)| *op);

    match operation {
        Some(op) => {
            tracing::debug!("flags {:#08b} dispatch to {:?}", flags.bits(), op);
            Ok(op)
        }
        None => {
            tracing::debug!("flags {:#08b} match no operation", flags.bits());
            Err(TimerError::InvalidArgumentCombination)
        }
    }
}
