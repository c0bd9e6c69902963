// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integer statistic counters accumulated per command list and per device.

use std::fmt;

/// The fixed set of statistics tracked by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatCounter {
    /// Draw calls recorded.
    CmdDrawCalls,
    /// Compute dispatches recorded.
    CmdDispatchCalls,
    /// Render passes begun.
    CmdRenderPassCount,
    /// Pipeline barriers recorded.
    CmdBarrierCount,
    /// Device memory allocated by the memory allocator, in bytes.
    MemoryAllocated,
    /// Device memory actually bound to live objects, in bytes.
    MemoryUsed,
    /// Number of compiled graphics pipelines.
    PipeCountGraphics,
    /// Number of compiled compute pipelines.
    PipeCountCompute,
    /// Command lists submitted to the graphics queue.
    QueueSubmitCount,
    /// Images presented.
    QueuePresentCount,
}

impl StatCounter {
    /// Number of counter kinds.
    pub const COUNT: usize = 10;

    /// Every counter kind, in declaration order.
    pub const ALL: [StatCounter; Self::COUNT] = [
        StatCounter::CmdDrawCalls,
        StatCounter::CmdDispatchCalls,
        StatCounter::CmdRenderPassCount,
        StatCounter::CmdBarrierCount,
        StatCounter::MemoryAllocated,
        StatCounter::MemoryUsed,
        StatCounter::PipeCountGraphics,
        StatCounter::PipeCountCompute,
        StatCounter::QueueSubmitCount,
        StatCounter::QueuePresentCount,
    ];

    /// Stable, human-readable name used by overlays and logs.
    pub fn name(self) -> &'static str {
        match self {
            StatCounter::CmdDrawCalls => "cmd_draw_calls",
            StatCounter::CmdDispatchCalls => "cmd_dispatch_calls",
            StatCounter::CmdRenderPassCount => "cmd_render_pass_count",
            StatCounter::CmdBarrierCount => "cmd_barrier_count",
            StatCounter::MemoryAllocated => "memory_allocated",
            StatCounter::MemoryUsed => "memory_used",
            StatCounter::PipeCountGraphics => "pipe_count_graphics",
            StatCounter::PipeCountCompute => "pipe_count_compute",
            StatCounter::QueueSubmitCount => "queue_submit_count",
            StatCounter::QueuePresentCount => "queue_present_count",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value set holding one integer per [`StatCounter`].
///
/// `StatCounters` is a plain value; thread safety comes from whoever owns it
/// (the device guards its store with a dedicated lock, a command list with its
/// recording state). Merging is an elementwise wrapping sum, so it is
/// associative and commutative.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatCounters {
    counters: [u64; StatCounter::COUNT],
}

impl StatCounters {
    /// Creates a set with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one counter.
    pub fn get(&self, counter: StatCounter) -> u64 {
        self.counters[counter.index()]
    }

    /// Overwrites one counter.
    pub fn set(&mut self, counter: StatCounter, value: u64) {
        self.counters[counter.index()] = value;
    }

    /// Adds `amount` to one counter.
    pub fn add(&mut self, counter: StatCounter, amount: u64) {
        let slot = &mut self.counters[counter.index()];
        *slot = slot.wrapping_add(amount);
    }

    /// Adds every counter of `other` into `self`.
    pub fn merge(&mut self, other: &StatCounters) {
        for (dst, src) in self.counters.iter_mut().zip(other.counters.iter()) {
            *dst = dst.wrapping_add(*src);
        }
    }

    /// Sets every counter back to zero.
    pub fn reset(&mut self) {
        self.counters = [0; StatCounter::COUNT];
    }

    /// Iterates over `(counter, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (StatCounter, u64)> + '_ {
        StatCounter::ALL
            .iter()
            .map(move |&counter| (counter, self.get(counter)))
    }
}

impl fmt::Debug for StatCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (counter, value) in self.iter() {
            map.entry(&counter.name(), &value);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(values: &[(StatCounter, u64)]) -> StatCounters {
        let mut result = StatCounters::new();
        for &(counter, value) in values {
            result.set(counter, value);
        }
        result
    }

    #[test]
    fn all_lists_every_counter_once() {
        for (i, counter) in StatCounter::ALL.iter().enumerate() {
            assert_eq!(counter.index(), i);
        }
    }

    #[test]
    fn add_accumulates() {
        let mut stats = StatCounters::new();
        stats.add(StatCounter::QueueSubmitCount, 1);
        stats.add(StatCounter::QueueSubmitCount, 2);
        assert_eq!(stats.get(StatCounter::QueueSubmitCount), 3);
        assert_eq!(stats.get(StatCounter::QueuePresentCount), 0);
    }

    #[test]
    fn merge_is_associative_and_elementwise() {
        let a = counters(&[(StatCounter::CmdDrawCalls, 3), (StatCounter::MemoryUsed, 10)]);
        let b = counters(&[(StatCounter::CmdDrawCalls, 4), (StatCounter::QueueSubmitCount, 1)]);
        let c = counters(&[(StatCounter::MemoryUsed, 5), (StatCounter::QueuePresentCount, 2)]);

        let mut left = a;
        left.merge(&b);
        left.merge(&c);

        let mut bc = b;
        bc.merge(&c);
        let mut right = a;
        right.merge(&bc);

        assert_eq!(left, right);
        for counter in StatCounter::ALL {
            assert_eq!(
                left.get(counter),
                a.get(counter) + b.get(counter) + c.get(counter)
            );
        }
    }

    #[test]
    fn merge_is_commutative() {
        let a = counters(&[(StatCounter::CmdBarrierCount, 9)]);
        let b = counters(&[(StatCounter::CmdBarrierCount, 1), (StatCounter::MemoryAllocated, 7)]);

        let mut ab = a;
        ab.merge(&b);
        let mut ba = b;
        ba.merge(&a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = counters(&[(StatCounter::CmdDispatchCalls, 42)]);
        stats.reset();
        assert_eq!(stats, StatCounters::new());
    }
}
