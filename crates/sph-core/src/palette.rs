use glam::Vec4;

/// Gradient stops from slow to fast.
pub const SPEED_COLORS: [Vec4; 4] = [
    Vec4::new(0.0, 0.75, 1.0, 1.0),
    Vec4::new(0.0, 1.0, 0.0, 1.0),
    Vec4::new(1.0, 1.0, 0.0, 1.0),
    Vec4::new(1.0, 0.0, 0.0, 1.0),
];

const BREAKPOINT_LOW: f32 = 0.33;
const BREAKPOINT_HIGH: f32 = 0.66;

/// Map a normalised speed in [0, 1] onto the four-stop speed gradient.
pub fn speed_color(normalized: f32) -> Vec4 {
    let t = normalized.clamp(0.0, 1.0);
    let [c0, c1, c2, c3] = SPEED_COLORS;
    if t <= BREAKPOINT_LOW {
        c0.lerp(c1, t / BREAKPOINT_LOW)
    } else if t <= BREAKPOINT_HIGH {
        c1.lerp(c2, (t - BREAKPOINT_LOW) / (BREAKPOINT_HIGH - BREAKPOINT_LOW))
    } else {
        c2.lerp(c3, (t - BREAKPOINT_HIGH) / (1.0 - BREAKPOINT_HIGH))
    }
}
