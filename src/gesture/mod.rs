mod contour;
mod fingers;
mod hull;
mod pose;

pub use contour::{contour_area, find_shapes, select_largest, Contour};
pub use fingers::{count_fingers, FingerAnalysis, FingerCount, FingerGap, FingerParams};
pub use hull::hull_indices;
pub use pose::{classify, HandPose, PoseRules};
