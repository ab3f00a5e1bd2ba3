use tpt_types::Rect;

pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Checks whether a child of `child_height` fits below `cursor_y`, measured
/// from the top of `bounds`.
pub fn check_child_fit(cursor_y: f32, child_height: f32, bounds: Rect) -> BreakAnalysis {
    let available = (bounds.height - cursor_y).max(0.0);
    // Absorb float error from summing line heights.
    const EPSILON: f32 = 0.01;
    BreakAnalysis {
        should_break: child_height > available + EPSILON,
        remaining_height: available,
    }
}
