use crate::cv::cv_points;
use crate::error::PipelineError;
use imageproc::point::Point;
use opencv::core::{Vec4i, Vector};
use opencv::imgproc;

/// Defect depths come back as fixed point with 8 fractional bits
const DEPTH_SCALE: f64 = 256.0;

/// Concavity between two consecutive hull vertices of a contour.
///
/// `start`, `end` and `far` index into the contour; `depth` is the distance in
/// pixels from the far point to the hull edge `start -> end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvexityDefect {
    pub start: usize,
    pub end: usize,
    pub far: usize,
    pub depth: f64,
}

impl ConvexityDefect {
    fn from_raw(raw: Vec4i) -> Self {
        let [start, end, far, depth] = raw.0;
        Self {
            start: start as usize,
            end: end as usize,
            far: far as usize,
            depth: depth as f64 / DEPTH_SCALE,
        }
    }
}

/// Indices of the convex hull vertices of a contour, in hull order.
///
/// Collinear points are dropped, so a rectangle yields four indices however
/// densely its edges are sampled.
pub fn hull_indices(contour: &[Point<i32>]) -> Result<Vec<usize>, PipelineError> {
    if contour.is_empty() {
        return Ok(Vec::new());
    }

    let mut hull = Vector::<i32>::new();
    imgproc::convex_hull(&cv_points(contour), &mut hull, false, false)?;
    Ok(hull.iter().map(|i| i as usize).collect())
}

/// Deepest contour point between every pair of consecutive hull vertices.
///
/// `hull` comes from [`hull_indices`] on the same contour. Only defects
/// deeper than `min_depth` are reported.
pub fn convexity_defects(
    contour: &[Point<i32>],
    hull: &[usize],
    min_depth: f64,
) -> Result<Vec<ConvexityDefect>, PipelineError> {
    if hull.len() < 3 || contour.len() < 4 {
        return Ok(Vec::new());
    }

    let hull: Vector<i32> = hull.iter().map(|&i| i as i32).collect();
    let mut raw = Vector::<Vec4i>::new();
    imgproc::convexity_defects(&cv_points(contour), &hull, &mut raw)?;

    Ok(raw
        .iter()
        .map(ConvexityDefect::from_raw)
        .filter(|defect| defect.depth > min_depth)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(i32, i32)]) -> Vec<Point<i32>> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn sorted(mut indices: Vec<usize>) -> Vec<usize> {
        indices.sort_unstable();
        indices
    }

    #[test]
    fn rectangle_drops_edge_points() {
        let contour = points(&[(0, 0), (5, 0), (10, 0), (10, 5), (10, 10), (5, 10), (0, 10), (0, 5)]);
        let hull = hull_indices(&contour).unwrap();
        assert_eq!(sorted(hull.clone()), vec![0, 2, 4, 6]);
        assert!(convexity_defects(&contour, &hull, 0.0).unwrap().is_empty());
    }

    #[test]
    fn notch_is_a_defect() {
        // square with a V cut into the top edge
        let contour = points(&[(0, 0), (4, 0), (5, 6), (6, 0), (10, 0), (10, 10), (0, 10)]);
        let hull = hull_indices(&contour).unwrap();
        assert_eq!(sorted(hull.clone()), vec![0, 4, 5, 6]);

        let defects = convexity_defects(&contour, &hull, 0.0).unwrap();
        assert_eq!(defects.len(), 1);
        assert_eq!(sorted(vec![defects[0].start, defects[0].end]), vec![0, 4]);
        assert_eq!(defects[0].far, 2);
        assert!((defects[0].depth - 6.0).abs() < 1e-2);

        assert!(convexity_defects(&contour, &hull, 6.0).unwrap().is_empty());
    }

    #[test]
    fn degenerate_inputs() {
        assert!(hull_indices(&[]).unwrap().is_empty());
        assert!(convexity_defects(&points(&[(0, 0), (3, 0)]), &[0, 1], 0.0)
            .unwrap()
            .is_empty());
    }
}
