//! Session configuration.

/// Default bounded capacity of each session actor's command channel.
pub const DEFAULT_COMMAND_CHANNEL_SIZE: usize = 64;

/// Settings applied to every session the store spawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Capacity of each session actor's command channel. When it fills up,
    /// senders wait (backpressure).
    pub command_channel_size: usize,

    /// Fixed seed for every session's dice. `None` seeds each session from
    /// OS entropy.
    pub dice_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command_channel_size: DEFAULT_COMMAND_CHANNEL_SIZE,
            dice_seed: None,
        }
    }
}
