use serde::{Deserialize, Serialize};

use crate::core::{Rect, Viewport};

/// Identity of a hintable element: a bar, or one segment of a stacked bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HintKey {
    pub index: usize,
    pub segment: Option<usize>,
}

/// Screen region registered during a render pass for pointer resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRegion {
    pub index: usize,
    pub segment: Option<usize>,
    pub rect: Rect,
    pub lines: Vec<String>,
}

impl HitRegion {
    #[must_use]
    pub fn new(index: usize, segment: Option<usize>, rect: Rect, text: &str) -> Self {
        Self {
            index,
            segment,
            rect,
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    #[must_use]
    pub fn key(&self) -> HintKey {
        HintKey {
            index: self.index,
            segment: self.segment,
        }
    }
}

/// Currently active tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub index: usize,
    pub segment: Option<usize>,
    pub region: Rect,
    pub lines: Vec<String>,
}

impl Hint {
    #[must_use]
    pub fn key(&self) -> HintKey {
        HintKey {
            index: self.index,
            segment: self.segment,
        }
    }
}

impl From<&HitRegion> for Hint {
    fn from(region: &HitRegion) -> Self {
        Self {
            index: region.index,
            segment: region.segment,
            region: region.rect,
            lines: region.lines.clone(),
        }
    }
}

/// First region containing `(x, y)`, in registration order.
#[must_use]
pub fn hit_test(regions: &[HitRegion], x: f64, y: f64) -> Option<&HitRegion> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    regions.iter().find(|region| region.rect.contains(x, y))
}

/// Outcome of feeding a pointer resolution into the hint cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintTransition {
    Unchanged,
    Changed,
    Cleared,
}

impl HintTransition {
    #[must_use]
    pub fn needs_redraw(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Replaces `current` with `resolved` when their keys differ.
pub fn apply_resolved_hint(current: &mut Option<Hint>, resolved: Option<Hint>) -> HintTransition {
    let unchanged = match (current.as_ref(), resolved.as_ref()) {
        (None, None) => true,
        (Some(active), Some(next)) => active.key() == next.key(),
        _ => false,
    };
    if unchanged {
        return HintTransition::Unchanged;
    }

    let cleared = resolved.is_none();
    *current = resolved;
    if cleared {
        HintTransition::Cleared
    } else {
        HintTransition::Changed
    }
}

/// Reconciles a cached hint with the regions of a fresh render pass.
///
/// A hint whose key is still registered picks up the new geometry and text;
/// otherwise it is dropped.
pub fn refresh_hint(current: &mut Option<Hint>, regions: &[HitRegion]) {
    let Some(active) = current.as_ref() else {
        return;
    };
    let key = active.key();
    *current = regions
        .iter()
        .find(|region| region.key() == key)
        .map(Hint::from);
}

/// Measured content box of a hint, before placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HintBoxSize {
    pub width: f64,
    pub height: f64,
}

/// Places the hint box to the right of `region`, flipping left on overflow and
/// clamping so the box stays on the surface.
#[must_use]
pub fn place_hint_box(region: Rect, size: HintBoxSize, offset: f64, viewport: Viewport) -> Rect {
    let surface_width = f64::from(viewport.width);
    let surface_height = f64::from(viewport.height);

    let mut x = region.right() + offset;
    if x + size.width > surface_width {
        x = region.x - offset - size.width;
    }
    let x = x.min(surface_width - size.width).max(0.0);

    let y = (region.center_y() - size.height / 2.0)
        .min(surface_height - size.height)
        .max(0.0);

    Rect::new(x, y, size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::{
        Hint, HintBoxSize, HintTransition, HitRegion, apply_resolved_hint, hit_test,
        place_hint_box, refresh_hint,
    };
    use crate::core::{Rect, Viewport};

    fn regions() -> Vec<HitRegion> {
        vec![
            HitRegion::new(0, Some(0), Rect::new(10.0, 50.0, 20.0, 50.0), "first"),
            HitRegion::new(0, Some(1), Rect::new(10.0, 20.0, 20.0, 30.0), "second\nline"),
            HitRegion::new(1, None, Rect::new(10.0, 20.0, 20.0, 80.0), "overlapping"),
        ]
    }

    #[test]
    fn first_registered_match_wins() {
        let regions = regions();
        let hit = hit_test(&regions, 15.0, 30.0).expect("hit");
        assert_eq!((hit.index, hit.segment), (0, Some(1)));
        assert_eq!(hit.lines, vec!["second", "line"]);
        assert!(hit_test(&regions, 100.0, 30.0).is_none());
        assert!(hit_test(&regions, f64::NAN, 30.0).is_none());
    }

    #[test]
    fn transitions_follow_key_changes() {
        let regions = regions();
        let mut current = None;
        assert_eq!(apply_resolved_hint(&mut current, None), HintTransition::Unchanged);

        let first = Hint::from(&regions[0]);
        assert_eq!(
            apply_resolved_hint(&mut current, Some(first.clone())),
            HintTransition::Changed
        );
        assert_eq!(
            apply_resolved_hint(&mut current, Some(first)),
            HintTransition::Unchanged
        );
        assert_eq!(
            apply_resolved_hint(&mut current, Some(Hint::from(&regions[1]))),
            HintTransition::Changed
        );
        assert_eq!(apply_resolved_hint(&mut current, None), HintTransition::Cleared);
        assert!(current.is_none());
    }

    #[test]
    fn refresh_drops_hints_without_region() {
        let regions = regions();
        let mut current = Some(Hint::from(&regions[2]));
        refresh_hint(&mut current, &regions[..2]);
        assert!(current.is_none());

        let mut moved = Some(Hint::from(&regions[0]));
        let relocated = vec![HitRegion::new(0, Some(0), Rect::new(0.0, 0.0, 5.0, 5.0), "new")];
        refresh_hint(&mut moved, &relocated);
        let moved = moved.expect("hint kept");
        assert_eq!(moved.region, Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(moved.lines, vec!["new"]);
    }

    #[test]
    fn hint_box_flips_left_and_clamps_vertically() {
        let viewport = Viewport::new(200, 100);
        let size = HintBoxSize {
            width: 50.0,
            height: 40.0,
        };

        let right = place_hint_box(Rect::new(20.0, 30.0, 10.0, 20.0), size, 5.0, viewport);
        assert_eq!(right, Rect::new(35.0, 20.0, 50.0, 40.0));

        let flipped = place_hint_box(Rect::new(160.0, 30.0, 10.0, 20.0), size, 5.0, viewport);
        assert_eq!(flipped.x, 105.0);

        let clamped_top = place_hint_box(Rect::new(20.0, 0.0, 10.0, 4.0), size, 5.0, viewport);
        assert_eq!(clamped_top.y, 0.0);

        let clamped_bottom = place_hint_box(Rect::new(20.0, 90.0, 10.0, 10.0), size, 5.0, viewport);
        assert_eq!(clamped_bottom.y, 60.0);
    }
}
