use serde::{Deserialize, Serialize};

/// Random source injected into spawning and anything else that rolls dice.
pub trait RandomGenerator {
    fn next_u32(&mut self) -> u32;

    /// Uniform f32 in [0.0, 1.0)
    fn next_f32(&mut self) -> f32 {
        // Upper 24 bits keep the mantissa exact
        let value = (self.next_u32() >> 8) as f32;
        value / 16777216.0 // 2^24
    }

    /// Uniform integer in [0, upper). Returns 0 when `upper` is 0.
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.next_u32() % upper
    }

    /// Uniform f32 in [low, high)
    fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_f32()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

// Simple pseudorandom number generator using xorshift algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoRandom {
    state: u64,
}

impl PseudoRandom {
    pub fn new(seed: u64) -> Self {
        // xorshift is stuck at 0 forever
        let state = if seed == 0 { 0x1234567890abcdef } else { seed };
        PseudoRandom { state }
    }

    fn advance(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }
}

impl RandomGenerator for PseudoRandom {
    fn next_u32(&mut self) -> u32 {
        (self.advance() >> 32) as u32
    }
}

/// Replays a fixed list of values in a loop and counts how many were drawn.
/// Lets a test pin every roll and position draw of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRandom {
    values: Vec<u32>,
    cursor: usize,
    draws: usize,
}

impl ScriptedRandom {
    /// Falls back to a single zero when `values` is empty.
    pub fn new(values: Vec<u32>) -> Self {
        let values = if values.is_empty() { vec![0] } else { values };
        ScriptedRandom { values, cursor: 0, draws: 0 }
    }

    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    /// Number of `next_u32` calls so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomGenerator for ScriptedRandom {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.draws += 1;
        value
    }
}

impl<R: RandomGenerator + ?Sized> RandomGenerator for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}
