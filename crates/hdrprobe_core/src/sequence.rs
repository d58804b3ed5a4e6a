//! Request sequencing so late responses cannot overwrite fresher state.
//!
//! Every request carries a [`RequestToken`]. The generation moves forward
//! with each new session; `seq` is monotonic per channel. Render, histogram,
//! calibration and upload responses only apply if they answer the latest
//! request on their channel. Probe responses only need to belong to the
//! current session, so several probes can be in flight together.

/// Independent request streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestChannel {
    Upload,
    Render,
    Probe,
    Calibration,
    Histogram,
}

impl RequestChannel {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            RequestChannel::Upload => 0,
            RequestChannel::Render => 1,
            RequestChannel::Probe => 2,
            RequestChannel::Calibration => 3,
            RequestChannel::Histogram => 4,
        }
    }

    /// Whether only the newest request on this channel may apply.
    pub fn latest_wins(self) -> bool {
        matches!(
            self,
            RequestChannel::Upload
                | RequestChannel::Render
                | RequestChannel::Calibration
                | RequestChannel::Histogram
        )
    }
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub generation: u64,
    pub seq: u64,
    pub channel: RequestChannel,
}

/// Issues tokens and decides whether responses are still current.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    generation: u64,
    latest: [u64; RequestChannel::COUNT],
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new session generation. Outstanding session-bound
    /// responses become stale.
    pub fn begin_session(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Issue the next token on a channel.
    pub fn issue(&mut self, channel: RequestChannel) -> RequestToken {
        let slot = &mut self.latest[channel.index()];
        *slot += 1;
        RequestToken {
            generation: self.generation,
            seq: *slot,
            channel,
        }
    }

    /// Check if a response carrying `token` may still be applied.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        let latest = self.latest[token.channel.index()];
        match token.channel {
            // Uploads start sessions, so only recency matters
            RequestChannel::Upload => token.seq == latest,
            channel if channel.latest_wins() => {
                token.generation == self.generation && token.seq == latest
            }
            _ => token.generation == self.generation,
        }
    }
}
