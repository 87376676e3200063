//! Suggestion panel placement and dialog focus cycling.

use crate::models::{AutocompletePosition, Placement};

/// Gap kept between the panel and the bottom edge.
pub const SAFETY_MARGIN: f64 = 8.0;
/// Panel height assumed before it has been rendered.
pub const MAX_PANEL_HEIGHT: f64 = 240.0;

/// Flip above the caret when the space below cannot fit the panel plus the
/// safety margin. The comparison is strict: exactly enough room stays below.
pub fn desired_placement_auto(space_below: f64, estimated_height: f64) -> Placement {
    if space_below < estimated_height + SAFETY_MARGIN {
        Placement::Top
    } else {
        Placement::Bottom
    }
}

/// Rendered height capped at [`MAX_PANEL_HEIGHT`]; zero means not yet laid out.
pub fn estimated_panel_height(rendered: f64) -> f64 {
    if rendered <= 0.0 {
        MAX_PANEL_HEIGHT
    } else {
        rendered.min(MAX_PANEL_HEIGHT)
    }
}

pub fn resolve_placement(
    position: AutocompletePosition,
    space_below: f64,
    estimated_height: f64,
) -> Placement {
    match position {
        AutocompletePosition::Top => Placement::Top,
        AutocompletePosition::Bottom => Placement::Bottom,
        AutocompletePosition::Auto => desired_placement_auto(space_below, estimated_height),
    }
}

/// Next focus slot for Tab (or Shift+Tab) inside a dialog with `len` slots.
/// `current` may be negative or past the end when nothing is focused.
pub fn compute_next_focus_index(current: isize, len: usize, shift: bool) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    if current < 0 || current as usize >= len {
        return if shift { last } else { 0 };
    }
    let current = current as usize;
    match (shift, current) {
        (false, c) if c == last => 0,
        (true, 0) => last,
        (false, c) => c + 1,
        (true, c) => c - 1,
    }
}
