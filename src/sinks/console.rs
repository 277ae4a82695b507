//! Realtime one-line dashboard.

use std::io::Write;

use crate::attitude::AxleSlip;
use crate::sinks::FrameSink;
use crate::{DecodedFrame, PacketSchema, Result, TelemetryError};

/// Watts per mechanical horsepower.
const WATTS_PER_BHP: f32 = 745.7;
/// Metres per second to miles per hour.
const MPS_TO_MPH: f32 = 2.237;

/// Prints RPM, gear, power, speed, rear slip and balance for each frame.
pub struct ConsoleSink {
    out: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self { out: Box::new(out) }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Dashboard line for a frame, without a trailing newline.
    pub fn render(frame: &DecodedFrame) -> String {
        let slip = AxleSlip::from_frame(frame);
        let rear_slip = frame.f32_or_zero("TireCombinedSlipRearLeft")
            + frame.f32_or_zero("TireCombinedSlipRearRight");

        format!(
            "RPM: {:.0} \t Gear: {} \t BHP: {:.0} \t Speed: {:.0} \t Total slip: {:.0} \t Attitude: {}",
            frame.f32_or_zero("CurrentEngineRpm"),
            frame.u8_or_zero("Gear"),
            frame.f32_or_zero("Power") / WATTS_PER_BHP,
            frame.f32_or_zero("Speed") * MPS_TO_MPH,
            rear_slip,
            slip.attitude()
        )
    }
}

impl FrameSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn publish(&mut self, _schema: &PacketSchema, frame: &DecodedFrame) -> Result<()> {
        let console_error = |err| TelemetryError::file_error("<stdout>".into(), err);

        writeln!(self.out, "{}", Self::render(frame)).map_err(console_error)?;
        if AxleSlip::from_frame(frame).traction_lost() {
            writeln!(self.out, "TRACTION LOST!").map_err(console_error)?;
        }
        Ok(())
    }
}
