/** ------------------------------------------------------------
 * Named traffic scenarios for synthetic captures
 * ------------------------------------------------------------- */
use crate::errors::{FlowtraceError, Result};
use crate::flow::FlowMac;
use crate::frame::SyntheticFrame;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const INTERVAL_US: u64 = 100_000;
const BURST_LEN: u64 = 5;
const BURST_GAP_US: u64 = 1_000_000;

/**
 * A run of flows repeated back to back
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub flows: Vec<FlowMac>,
    #[serde(default = "one")]
    pub repeat: usize,
}

fn one() -> usize {
    1
}

impl Segment {
    pub fn new(flows: &[FlowMac], repeat: usize) -> Self {
        Self {
            flows: flows.to_vec(),
            repeat,
        }
    }
}

/**
 * Timestamp assignment for the frames of a scenario
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Timing {
    /// Frame `i` is sent at `i * interval`
    Uniform { interval_us: u64 },
    /// Like `Uniform`, plus `gap` after every `burst_len` frames
    Bursty {
        interval_us: u64,
        burst_len: u64,
        gap_us: u64,
    },
}

impl Timing {
    pub fn timestamp(&self, index: usize) -> Duration {
        let index = index as u64;
        match *self {
            Timing::Uniform { interval_us } => Duration::from_micros(index * interval_us),
            Timing::Bursty {
                interval_us,
                burst_len,
                gap_us,
            } => {
                let bursts = index.checked_div(burst_len).unwrap_or(0);
                Duration::from_micros(index * interval_us + bursts * gap_us)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub pattern: Vec<Segment>,
    pub timing: Timing,
}

impl Scenario {
    fn uniform(name: &str, pattern: Vec<Segment>) -> Self {
        Self {
            name: name.to_string(),
            pattern,
            timing: Timing::Uniform {
                interval_us: INTERVAL_US,
            },
        }
    }

    /// `[a,b,c]*3 + [a]`
    pub fn three_flows() -> Self {
        use crate::flow::FlowMac as M;
        Self::uniform(
            "three_flows",
            vec![Segment::new(&[M::A, M::B, M::C], 3), Segment::new(&[M::A], 1)],
        )
    }

    /// `[a,b,c]*16 + [a,b]`, pausing one second after every five frames
    pub fn three_flows_bursty() -> Self {
        use crate::flow::FlowMac as M;
        Self {
            name: "three_flows_bursty".to_string(),
            pattern: vec![
                Segment::new(&[M::A, M::B, M::C], 16),
                Segment::new(&[M::A, M::B], 1),
            ],
            timing: Timing::Bursty {
                interval_us: INTERVAL_US,
                burst_len: BURST_LEN,
                gap_us: BURST_GAP_US,
            },
        }
    }

    /// `[b,c]*7 + [a]*6 + [a,b,c]*10`
    pub fn two_then_three() -> Self {
        use crate::flow::FlowMac as M;
        Self::uniform(
            "two_then_three",
            vec![
                Segment::new(&[M::B, M::C], 7),
                Segment::new(&[M::A], 6),
                Segment::new(&[M::A, M::B, M::C], 10),
            ],
        )
    }

    /// `[a,b,c,d,e]*10`
    pub fn five_flows() -> Self {
        use crate::flow::FlowMac as M;
        Self::uniform(
            "five_flows",
            vec![Segment::new(&[M::A, M::B, M::C, M::D, M::E], 10)],
        )
    }

    /// `[a,b,c,d,e,f,g]*7 + [a]`
    pub fn seven_flows() -> Self {
        use crate::flow::FlowMac as M;
        Self::uniform(
            "seven_flows",
            vec![
                Segment::new(&[M::A, M::B, M::C, M::D, M::E, M::F, M::G], 7),
                Segment::new(&[M::A], 1),
            ],
        )
    }

    pub fn builtin() -> Vec<Scenario> {
        vec![
            Self::three_flows(),
            Self::three_flows_bursty(),
            Self::two_then_three(),
            Self::five_flows(),
            Self::seven_flows(),
        ]
    }

    /**
     * Look a scenario up by name, first in `extra` then among the built-ins
     */
    pub fn find(name: &str, extra: &[Scenario]) -> Result<Scenario> {
        extra
            .iter()
            .cloned()
            .chain(Self::builtin())
            .find(|scenario| scenario.name == name)
            .ok_or_else(|| FlowtraceError::UnknownScenario(name.to_string()))
    }

    /**
     * Flow of every frame, in sending order
     */
    pub fn flows(&self) -> Vec<FlowMac> {
        self.pattern
            .iter()
            .flat_map(|segment| {
                std::iter::repeat(segment.flows.iter().copied())
                    .take(segment.repeat)
                    .flatten()
            })
            .collect()
    }

    pub fn frames(&self) -> Vec<SyntheticFrame> {
        self.flows()
            .into_iter()
            .enumerate()
            .map(|(i, src)| SyntheticFrame::new(self.timing.timestamp(i), src))
            .collect()
    }
}
