use crate::error::PipelineError;
use image::{GrayImage, RgbImage};
use imageproc::point::Point;
use opencv::core::{self, Mat, Scalar, Vector, CV_8UC1, CV_8UC3};
use opencv::prelude::*;

fn filled_mat(width: u32, height: u32, typ: i32, data: &[u8]) -> opencv::Result<Mat> {
    let mut mat =
        Mat::new_rows_cols_with_default(height as i32, width as i32, typ, Scalar::all(0.0))?;
    mat.data_bytes_mut()?.copy_from_slice(data);
    Ok(mat)
}

/// Copy an RGB image into an 8-bit, three channel matrix.
/// Channel order stays RGB; callers that need BGR convert explicitly.
pub fn mat_from_rgb(image: &RgbImage) -> opencv::Result<Mat> {
    filled_mat(image.width(), image.height(), CV_8UC3, image.as_raw())
}

pub fn mat_from_gray(image: &GrayImage) -> opencv::Result<Mat> {
    filled_mat(image.width(), image.height(), CV_8UC1, image.as_raw())
}

fn layout_error(mat: &Mat) -> PipelineError {
    PipelineError::MatLayout {
        rows: mat.rows(),
        cols: mat.cols(),
        typ: mat.typ(),
    }
}

fn mat_bytes(mat: &Mat, typ: i32) -> Result<(u32, u32, Vec<u8>), PipelineError> {
    if mat.typ() != typ || !mat.is_continuous() || mat.rows() <= 0 || mat.cols() <= 0 {
        return Err(layout_error(mat));
    }
    let data = mat.data_bytes()?.to_vec();
    Ok((mat.cols() as u32, mat.rows() as u32, data))
}

pub fn rgb_from_mat(mat: &Mat) -> Result<RgbImage, PipelineError> {
    let (width, height, data) = mat_bytes(mat, CV_8UC3)?;
    RgbImage::from_raw(width, height, data).ok_or_else(|| layout_error(mat))
}

pub fn gray_from_mat(mat: &Mat) -> Result<GrayImage, PipelineError> {
    let (width, height, data) = mat_bytes(mat, CV_8UC1)?;
    GrayImage::from_raw(width, height, data).ok_or_else(|| layout_error(mat))
}

pub fn cv_points(points: &[Point<i32>]) -> Vector<core::Point> {
    points.iter().map(|p| core::Point::new(p.x, p.y)).collect()
}
