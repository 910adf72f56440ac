use crate::error::{RequantError, Result};

/// Destination stage applied after scaling: add the zero point, then clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputStage {
    pub zero_point: i32,
    pub clamp_min: i32,
    pub clamp_max: i32,
}

impl OutputStage {
    pub fn new(zero_point: i32, clamp_min: i32, clamp_max: i32) -> Result<Self> {
        if clamp_min > clamp_max {
            return Err(RequantError::InvalidOutputRange {
                min: clamp_min,
                max: clamp_max,
            });
        }
        Ok(Self {
            zero_point,
            clamp_min,
            clamp_max,
        })
    }

    /// Stage for signed 8-bit destinations.
    pub fn for_i8(zero_point: i32) -> Self {
        Self {
            zero_point,
            clamp_min: i8::MIN as i32,
            clamp_max: i8::MAX as i32,
        }
    }

    /// Stage for unsigned 8-bit destinations.
    pub fn for_u8(zero_point: i32) -> Self {
        Self {
            zero_point,
            clamp_min: u8::MIN as i32,
            clamp_max: u8::MAX as i32,
        }
    }

    #[inline]
    pub fn finish(&self, scaled: i32) -> i32 {
        scaled
            .saturating_add(self.zero_point)
            .clamp(self.clamp_min, self.clamp_max)
    }
}

impl Default for OutputStage {
    fn default() -> Self {
        Self {
            zero_point: 0,
            clamp_min: i32::MIN,
            clamp_max: i32::MAX,
        }
    }
}
