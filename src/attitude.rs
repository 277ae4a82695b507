//! Car balance classification from combined tyre slip.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DecodedFrame;

/// Balance of the car derived from front versus rear tyre slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attitude {
    /// Rear axle slipping more than the front
    Oversteer,
    /// Front axle slipping more than the rear
    Understeer,
    /// Both axles slipping equally
    Neutral,
}

impl Attitude {
    /// Compare integer slip totals for each axle.
    pub fn classify(total_slip_front: i32, total_slip_rear: i32) -> Self {
        if total_slip_rear > total_slip_front {
            Attitude::Oversteer
        } else if total_slip_front > total_slip_rear {
            Attitude::Understeer
        } else {
            Attitude::Neutral
        }
    }
}

impl fmt::Display for Attitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attitude::Oversteer => f.write_str("Oversteer"),
            Attitude::Understeer => f.write_str("Understeer"),
            Attitude::Neutral => f.write_str("Neutral"),
        }
    }
}

/// Combined slip summed per axle, truncated towards zero so that nearly
/// equal axles classify as neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxleSlip {
    pub front: i32,
    pub rear: i32,
}

impl AxleSlip {
    /// Read the four `TireCombinedSlip*` fields from a frame.
    pub fn from_frame(frame: &DecodedFrame) -> Self {
        let front = frame.f32_or_zero("TireCombinedSlipFrontLeft")
            + frame.f32_or_zero("TireCombinedSlipFrontRight");
        let rear = frame.f32_or_zero("TireCombinedSlipRearLeft")
            + frame.f32_or_zero("TireCombinedSlipRearRight");
        Self { front: front as i32, rear: rear as i32 }
    }

    pub fn attitude(&self) -> Attitude {
        Attitude::classify(self.front, self.rear)
    }

    /// Heavy slip with the rear stepping out.
    pub fn traction_lost(&self) -> bool {
        self.front + self.rear > 2 && self.attitude() == Attitude::Oversteer
    }
}
