//! Conversion between timeline milliseconds and render frames.
//!
//! The whole composition runs at a single fixed frame rate. Start frames and
//! durations are both floored, so very short spans can quantize to zero
//! frames; consumers skip those rather than treating them as errors.

/// Frame rate of every composition.
pub const FPS: u32 = 30;

/// Frame containing the instant `ms`: `floor(ms / (1000 / fps))`.
///
/// Negative or non-finite input maps to frame 0.
pub fn ms_to_frame(ms: f64, fps: u32) -> u64 {
    // ms * fps / 1000 keeps whole-second boundaries exact (1000ms -> 30)
    let frames = (ms * f64::from(fps) / 1000.0).floor();
    if frames.is_finite() && frames > 0.0 {
        frames as u64
    } else {
        0
    }
}

/// Start of `frame` in milliseconds: `(frame / fps) * 1000`.
pub fn frame_to_ms(frame: u64, fps: u32) -> f64 {
    (frame as f64 / f64::from(fps)) * 1000.0
}

/// Number of whole frames covered by a duration, floored.
pub fn duration_to_frames(duration_ms: f64, fps: u32) -> u64 {
    ms_to_frame(duration_ms, fps)
}

/// Whole seconds to frames, saturating at `u64::MAX`.
pub fn secs_to_frames(secs: u64, fps: u32) -> u64 {
    secs.saturating_mul(u64::from(fps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_second_boundary_quantization() {
        assert_eq!(ms_to_frame(999.0, FPS), 29);
        assert_eq!(ms_to_frame(1000.0, FPS), 30);
        assert_eq!(ms_to_frame(0.0, FPS), 0);
    }

    #[test]
    fn test_short_durations_round_to_zero_frames() {
        assert_eq!(duration_to_frames(0.0, FPS), 0);
        assert_eq!(duration_to_frames(20.0, FPS), 0);
        assert_eq!(duration_to_frames(34.0, FPS), 1);
    }

    #[test]
    fn test_invalid_input_maps_to_frame_zero() {
        assert_eq!(ms_to_frame(-500.0, FPS), 0);
        assert_eq!(ms_to_frame(f64::NAN, FPS), 0);
    }

    #[test]
    fn test_frame_to_ms() {
        assert_eq!(frame_to_ms(30, FPS), 1000.0);
        assert_eq!(frame_to_ms(0, FPS), 0.0);
        assert!((frame_to_ms(1, FPS) - 33.333).abs() < 0.001);
    }

    #[test]
    fn test_secs_to_frames() {
        assert_eq!(secs_to_frames(5, FPS), 150);
        assert_eq!(secs_to_frames(18, FPS), 540);
        assert_eq!(secs_to_frames(u64::MAX / 2, FPS), u64::MAX);
    }

    proptest! {
        #[test]
        fn instant_inside_frame_maps_back_to_it(frame in 0u64..1_000_000) {
            // half a millisecond past the frame start is well inside a 33ms frame
            prop_assert_eq!(ms_to_frame(frame_to_ms(frame, FPS) + 0.5, FPS), frame);
        }

        #[test]
        fn quantization_is_monotonic(a in 0.0f64..10_000_000.0, b in 0.0f64..10_000_000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ms_to_frame(lo, FPS) <= ms_to_frame(hi, FPS));
        }
    }
}
