use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::point::Point;

/// Closed boundary of a connected foreground region, in tracing order
pub type Contour = Vec<Point<i32>>;

/// Find every outer and hole border in a binary mask.
///
/// Straight runs are compressed to their end points so that later hull and
/// defect passes only see the corners of the boundary.
pub fn find_shapes(mask: &GrayImage) -> Vec<Contour> {
    let _span = tracing::debug_span!("find_contours").entered();

    find_contours::<i32>(mask)
        .into_iter()
        .map(|contour| compress_runs(&contour.points))
        .collect()
}

/// Keep only the end points of horizontal, vertical and diagonal runs
pub fn compress_runs(points: &[Point<i32>]) -> Contour {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let direction = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());

    points
        .iter()
        .enumerate()
        .filter(|&(i, &p)| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            direction(prev, p) != direction(p, next)
        })
        .map(|(_, &p)| p)
        .collect()
}

/// Area enclosed by a contour (shoelace formula)
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();

    twice.abs() as f64 / 2.0
}

/// Index of the contour with the largest area.
///
/// Ties keep the first contour seen. Returns `None` only when there are no
/// contours at all.
pub fn select_largest(contours: &[Contour]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, contour) in contours.iter().enumerate() {
        let area = contour_area(contour);
        if best.map_or(true, |(_, max)| area > max) {
            best = Some((index, area));
        }
    }

    best.map(|(index, _)| index)
}
