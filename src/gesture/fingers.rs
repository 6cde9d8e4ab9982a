use super::hull::{convexity_defects, ConvexityDefect};
use crate::error::PipelineError;
use imageproc::point::Point;

/// Side lengths below this are treated as a collapsed triangle
const MIN_SIDE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerParams {
    /// Largest defect angle, in radians, still counted as a finger gap
    pub max_angle: f64,
    /// Defects no deeper than this many pixels are ignored
    pub min_defect_depth: f64,
}

impl Default for FingerParams {
    fn default() -> Self {
        Self {
            max_angle: std::f64::consts::FRAC_PI_2,
            min_defect_depth: 0.0,
        }
    }
}

/// Outcome of counting gaps between fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerCount {
    /// The hull has fewer than four vertices
    Uncalculated,
    Gaps(usize),
}

/// Convexity defect accepted as the valley between two fingers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerGap {
    pub defect: ConvexityDefect,
    pub far: Point<i32>,
    /// Interior angle at the far point, radians
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FingerAnalysis {
    pub count: FingerCount,
    pub gaps: Vec<FingerGap>,
}

fn as_f64(p: Point<i32>) -> Point<f64> {
    Point::new(p.x as f64, p.y as f64)
}

fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Interior angle at `far` of the triangle `start`, `end`, `far`, from the
/// law of cosines. `None` when either side meeting at `far` has no length.
pub fn defect_angle(start: Point<f64>, end: Point<f64>, far: Point<f64>) -> Option<f64> {
    let a = distance(start, end);
    let b = distance(far, start);
    let c = distance(far, end);
    if b < MIN_SIDE || c < MIN_SIDE {
        return None;
    }

    let cosine = (b * b + c * c - a * a) / (2.0 * b * c);
    Some(cosine.clamp(-1.0, 1.0).acos())
}

pub fn is_finger_gap(angle: f64, max_angle: f64) -> bool {
    angle <= max_angle
}

/// Count the gaps between fingers along a contour.
///
/// `hull` holds the contour's hull vertex indices, as returned by
/// [`hull_indices`](super::hull_indices).
pub fn count_fingers(
    contour: &[Point<i32>],
    hull: &[usize],
    params: &FingerParams,
) -> Result<FingerAnalysis, PipelineError> {
    let _span = tracing::debug_span!("count_fingers").entered();

    if hull.len() < 4 {
        tracing::debug!("Hull has {} points, cannot count fingers", hull.len());
        return Ok(FingerAnalysis {
            count: FingerCount::Uncalculated,
            gaps: Vec::new(),
        });
    }

    let gaps: Vec<FingerGap> = convexity_defects(contour, hull, params.min_defect_depth)?
        .into_iter()
        .filter_map(|defect| {
            let far = contour[defect.far];
            let angle = defect_angle(
                as_f64(contour[defect.start]),
                as_f64(contour[defect.end]),
                as_f64(far),
            )?;
            is_finger_gap(angle, params.max_angle).then_some(FingerGap { defect, far, angle })
        })
        .collect();

    Ok(FingerAnalysis {
        count: FingerCount::Gaps(gaps.len()),
        gaps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::hull_indices;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

    const EPS: f64 = 1e-9;

    fn pt(x: f64, y: f64) -> Point<f64> {
        Point::new(x, y)
    }

    fn contour(coords: &[(i32, i32)]) -> Vec<Point<i32>> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn right_angle_at_far_point() {
        let angle = defect_angle(pt(1.0, 0.0), pt(0.0, 1.0), pt(0.0, 0.0)).unwrap();
        assert!((angle - FRAC_PI_2).abs() < EPS);
        assert!(is_finger_gap(angle, FRAC_PI_2));
    }

    // far = (0, 1) puts the right angle at `start`; the angle at `far` is 45°
    #[test]
    fn right_triangle_with_right_angle_at_start() {
        let angle = defect_angle(pt(0.0, 0.0), pt(1.0, 0.0), pt(0.0, 1.0)).unwrap();
        assert!((angle - FRAC_PI_4).abs() < EPS);
        assert!(is_finger_gap(angle, FRAC_PI_2));
    }

    #[test]
    fn equilateral_is_a_gap() {
        let angle = defect_angle(pt(0.0, 0.0), pt(2.0, 0.0), pt(1.0, 3f64.sqrt())).unwrap();
        assert!((angle - FRAC_PI_3).abs() < EPS);
        assert!(is_finger_gap(angle, FRAC_PI_2));
    }

    #[test]
    fn obtuse_is_not_a_gap() {
        let end = pt((2.0 * FRAC_PI_3).cos(), (2.0 * FRAC_PI_3).sin());
        let angle = defect_angle(pt(1.0, 0.0), end, pt(0.0, 0.0)).unwrap();
        assert!((angle - 2.0 * FRAC_PI_3).abs() < EPS);
        assert!(!is_finger_gap(angle, FRAC_PI_2));
    }

    #[test]
    fn collapsed_triangle_has_no_angle() {
        assert_eq!(defect_angle(pt(0.0, 0.0), pt(3.0, 0.0), pt(0.0, 0.0)), None);
        assert_eq!(defect_angle(pt(0.0, 0.0), pt(3.0, 0.0), pt(3.0, 0.0)), None);
    }

    #[test]
    fn triangle_contour_is_uncalculated() {
        let shape = contour(&[(0, 0), (10, 0), (5, 8)]);
        let analysis = count_fingers(&shape, &[0, 1, 2], &FingerParams::default()).unwrap();
        assert_eq!(analysis.count, FingerCount::Uncalculated);
        assert!(analysis.gaps.is_empty());
    }

    #[test]
    fn four_sharp_valleys() {
        // five fingertips on a shallow arc above a palm
        let shape = contour(&[
            (0, 100),
            (0, 10),
            (10, 60),
            (20, 3),
            (30, 60),
            (40, 0),
            (50, 60),
            (60, 3),
            (70, 60),
            (80, 10),
            (80, 100),
        ]);
        let hull = hull_indices(&shape).unwrap();
        let mut vertices = hull.clone();
        vertices.sort_unstable();
        assert_eq!(vertices, vec![0, 1, 3, 5, 7, 9, 10]);

        let analysis = count_fingers(&shape, &hull, &FingerParams::default()).unwrap();
        assert_eq!(analysis.count, FingerCount::Gaps(4));
        let mut valleys: Vec<_> = analysis.gaps.iter().map(|g| (g.far.x, g.far.y)).collect();
        valleys.sort_unstable();
        assert_eq!(valleys, vec![(10, 60), (30, 60), (50, 60), (70, 60)]);
    }

    #[test]
    fn wide_valley_is_ignored() {
        let shape = contour(&[(0, 0), (20, 0), (30, 4), (40, 0), (60, 0), (60, 40), (0, 40)]);
        let hull = hull_indices(&shape).unwrap();

        let analysis = count_fingers(&shape, &hull, &FingerParams::default()).unwrap();
        assert_eq!(analysis.count, FingerCount::Gaps(0));
    }

    #[test]
    fn shallow_acute_notch_counts_by_default() {
        // 53° V cut two pixels deep into the top of a block
        let shape = contour(&[(0, 10), (10, 0), (11, 2), (12, 0), (22, 10), (22, 30), (0, 30)]);
        let hull = hull_indices(&shape).unwrap();

        let analysis = count_fingers(&shape, &hull, &FingerParams::default()).unwrap();
        assert_eq!(analysis.count, FingerCount::Gaps(1));
        assert_eq!((analysis.gaps[0].far.x, analysis.gaps[0].far.y), (11, 2));

        let filtered = FingerParams {
            min_defect_depth: 2.0,
            ..Default::default()
        };
        let analysis = count_fingers(&shape, &hull, &filtered).unwrap();
        assert_eq!(analysis.count, FingerCount::Gaps(0));
    }
}
