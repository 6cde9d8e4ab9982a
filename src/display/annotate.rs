use crate::gesture::FingerGap;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use imageproc::point::Point;

const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const HULL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const GAP_COLOR: Rgb<u8> = Rgb([0, 84, 211]);
const GAP_RADIUS: i32 = 8;

fn draw_closed(canvas: &mut RgbImage, points: &[Point<i32>], color: Rgb<u8>) {
    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        draw_line_segment_mut(
            canvas,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            color,
        );
    }
}

/// Draw the hand outline, its hull and the finger gaps onto a frame
pub fn annotate(canvas: &mut RgbImage, contour: &[Point<i32>], hull: &[usize], gaps: &[FingerGap]) {
    draw_closed(canvas, contour, CONTOUR_COLOR);

    let hull_points: Vec<Point<i32>> = hull.iter().map(|&i| contour[i]).collect();
    draw_closed(canvas, &hull_points, HULL_COLOR);

    for gap in gaps {
        draw_filled_circle_mut(canvas, (gap.far.x, gap.far.y), GAP_RADIUS, GAP_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{count_fingers, hull_indices, FingerParams};

    #[test]
    fn draws_outline_and_gaps() {
        let mut canvas = RgbImage::new(40, 40);
        let contour = vec![
            Point::new(5, 5),
            Point::new(15, 5),
            Point::new(20, 25),
            Point::new(25, 5),
            Point::new(35, 5),
            Point::new(35, 35),
            Point::new(5, 35),
        ];
        let hull = hull_indices(&contour).unwrap();
        let fingers = count_fingers(&contour, &hull, &FingerParams::default()).unwrap();
        assert_eq!(fingers.gaps.len(), 1);

        annotate(&mut canvas, &contour, &hull, &fingers.gaps);

        assert_eq!(*canvas.get_pixel(5, 20), HULL_COLOR);
        assert_eq!(*canvas.get_pixel(20, 25), GAP_COLOR);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([0, 0, 0]));
    }
}
