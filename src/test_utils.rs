//! Synthetic frames and pixel probes shared by the unit tests.

use opencv::{
    core::{Mat, Point, Scalar, Vec3b, CV_8UC3},
    imgproc,
    prelude::*,
};

pub(crate) const WIDTH: i32 = 640;
pub(crate) const HEIGHT: i32 = 480;

/// A frame filled with one BGR color.
pub(crate) fn solid_frame(rows: i32, cols: i32, bgr: [f64; 3]) -> Mat {
    Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::new(bgr[0], bgr[1], bgr[2], 0.0))
        .unwrap()
}

pub(crate) fn black_frame() -> Mat {
    solid_frame(HEIGHT, WIDTH, [0.0, 0.0, 0.0])
}

/// Black 640x480 road with one white stroke per lane, both inside the default ROI.
///
/// Right stroke slopes +0.5, left stroke -0.5 (image y grows downwards).
pub(crate) fn two_lane_frame() -> Mat {
    let mut frame = black_frame();
    let white = Scalar::new(255.0, 255.0, 255.0, 0.0);
    for (a, b) in [((330, 300), (480, 375)), ((310, 300), (160, 375))] {
        imgproc::line(
            &mut frame,
            Point::new(a.0, a.1),
            Point::new(b.0, b.1),
            white,
            6,
            imgproc::LINE_8,
            0,
        )
        .unwrap();
    }
    frame
}

pub(crate) fn pixel(frame: &Mat, row: i32, col: i32) -> [u8; 3] {
    let px = frame.at_2d::<Vec3b>(row, col).unwrap();
    [px[0], px[1], px[2]]
}

pub(crate) fn is_all_zero(frame: &Mat) -> bool {
    frame.data_bytes().unwrap().iter().all(|&v| v == 0)
}
