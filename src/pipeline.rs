use crate::config::PipelineConfig;
use crate::display::annotate;
use crate::error::PipelineError;
use crate::gesture::{
    classify, contour_area, count_fingers, find_shapes, hull_indices, select_largest, Contour,
    FingerAnalysis, FingerParams, HandPose, PoseRules,
};
use crate::segmentation::{
    extract_foreground, extract_shape, BackgroundModel, BackgroundSubtractor, Foreground,
    Preprocessor, Shape,
};
use image::RgbImage;
use std::time::{Duration, Instant};

/// Log averaged stage timings every this many frames
const STATS_INTERVAL: u64 = 30;

/// Everything the pipeline derived from one frame
pub struct FrameAnalysis {
    pub pose: HandPose,
    /// Preprocessed frame with the outline, hull and finger gaps drawn on
    pub annotated: RgbImage,
    pub foreground: Foreground,
    pub shape: Shape,
    /// Largest contour, `None` when the silhouette is empty
    pub contour: Option<Contour>,
    /// Hull vertex indices into `contour`
    pub hull: Vec<usize>,
    pub fingers: Option<FingerAnalysis>,
}

#[derive(Default)]
struct StageStats {
    frames: u64,
    preprocess: Duration,
    segment: Duration,
    shape: Duration,
    gesture: Duration,
}

impl StageStats {
    fn log(&self, learning_rate: f32) {
        let avg_ms = |total: Duration| total.as_secs_f64() * 1000.0 / self.frames as f64;
        let preprocess_ms = avg_ms(self.preprocess);
        let segment_ms = avg_ms(self.segment);
        let shape_ms = avg_ms(self.shape);
        let gesture_ms = avg_ms(self.gesture);

        tracing::info!(
            "Frame {}: preprocess={:.1}ms, segment={:.1}ms, shape={:.1}ms, gesture={:.1}ms, total={:.1}ms, learning_rate={:.5}",
            self.frames,
            preprocess_ms,
            segment_ms,
            shape_ms,
            gesture_ms,
            preprocess_ms + segment_ms + shape_ms + gesture_ms,
            learning_rate
        );
    }
}

/// Per-frame hand pose pipeline.
///
/// Owns the background model, which learns across every frame passed to
/// [`HandPosePipeline::process`]; everything else is recomputed per frame.
pub struct HandPosePipeline {
    config: PipelineConfig,
    preprocessor: Preprocessor,
    background: BackgroundModel,
    finger_params: FingerParams,
    pose_rules: PoseRules,
    stats: StageStats,
}

impl HandPosePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        Ok(Self {
            preprocessor: Preprocessor::new(config.smoothing, config.mirror),
            background: BackgroundModel::new(config.background_params())?,
            finger_params: config.finger_params(),
            pose_rules: config.pose_rules(),
            stats: StageStats::default(),
            config,
        })
    }

    pub fn process(&mut self, frame: &RgbImage) -> Result<FrameAnalysis, PipelineError> {
        let _span = tracing::debug_span!("process_frame").entered();
        if frame.width() == 0 || frame.height() == 0 {
            return Err(PipelineError::EmptyFrame);
        }

        let start = Instant::now();
        let mut annotated = self.preprocessor.prepare(frame)?;
        let preprocess_time = start.elapsed();

        let start = Instant::now();
        let foreground = extract_foreground(
            &annotated,
            &mut self.background,
            self.config.erode_iterations,
        )?;
        let segment_time = start.elapsed();

        let start = Instant::now();
        let shape = extract_shape(&foreground.image, self.config.blur_size, self.config.threshold)?;
        let shape_time = start.elapsed();

        let start = Instant::now();
        let mut shapes = find_shapes(&shape.mask);
        let contour = select_largest(&shapes).map(|index| shapes.swap_remove(index));

        let (hull, fingers) = match &contour {
            Some(contour) => {
                let hull = hull_indices(contour)?;
                let fingers = count_fingers(contour, &hull, &self.finger_params)?;
                tracing::debug!(
                    area = contour_area(contour),
                    hull = hull.len(),
                    "Selected contour of {} points",
                    contour.len()
                );
                for gap in &fingers.gaps {
                    tracing::debug!(
                        x = gap.far.x,
                        y = gap.far.y,
                        depth = gap.defect.depth,
                        angle = gap.angle.to_degrees(),
                        "Finger gap"
                    );
                }
                annotate(&mut annotated, contour, &hull, &fingers.gaps);
                (hull, Some(fingers))
            }
            None => {
                tracing::debug!("No shape found");
                (Vec::new(), None)
            }
        };

        let pose = classify(fingers.as_ref().map(|f| f.count), &self.pose_rules);
        let gesture_time = start.elapsed();

        tracing::debug!(
            contours = shapes.len() + contour.is_some() as usize,
            count = ?fingers.as_ref().map(|f| f.count),
            "Classified frame as {} ({})",
            pose,
            pose.code()
        );

        self.stats.frames += 1;
        self.stats.preprocess += preprocess_time;
        self.stats.segment += segment_time;
        self.stats.shape += shape_time;
        self.stats.gesture += gesture_time;
        if self.stats.frames % STATS_INTERVAL == 0 {
            self.stats.log(self.background.learning_rate());
        }

        Ok(FrameAnalysis {
            pose,
            annotated,
            foreground,
            shape,
            contour,
            hull,
            fingers,
        })
    }

    pub fn frames_processed(&self) -> u64 {
        self.background.frames_seen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::gesture::FingerCount;
    use image::Rgb;

    const WIDTH: u32 = 200;
    const HEIGHT: u32 = 160;

    fn backdrop() -> RgbImage {
        RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([12, 14, 10]))
    }

    fn with_block(x0: u32, y0: u32, size: u32) -> RgbImage {
        let mut frame = backdrop();
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                frame.put_pixel(x, y, Rgb([245, 240, 235]));
            }
        }
        frame
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PipelineConfig {
            blur_size: 20,
            ..Default::default()
        };
        assert!(matches!(
            HandPosePipeline::new(config),
            Err(PipelineError::Config(ConfigError::BlurSize(20)))
        ));
    }

    #[test]
    fn empty_scene_has_no_pose() {
        let mut pipeline = HandPosePipeline::new(PipelineConfig::default()).unwrap();
        for _ in 0..3 {
            let analysis = pipeline.process(&backdrop()).unwrap();
            assert_eq!(analysis.pose, HandPose::None);
            assert!(analysis.contour.is_none());
            assert!(analysis.fingers.is_none());
        }
        assert_eq!(pipeline.frames_processed(), 3);
    }

    #[test]
    fn solid_block_reads_as_fist() {
        let mut pipeline = HandPosePipeline::new(PipelineConfig::default()).unwrap();
        for _ in 0..3 {
            pipeline.process(&backdrop()).unwrap();
        }

        let analysis = pipeline.process(&with_block(60, 40, 80)).unwrap();

        let contour = analysis.contour.as_ref().expect("block should produce a contour");
        assert!(contour_area(contour) > 70.0 * 70.0);
        assert!(analysis.hull.len() >= 4);
        assert_eq!(
            analysis.fingers.as_ref().map(|f| f.count),
            Some(FingerCount::Gaps(0))
        );
        assert_eq!(analysis.pose, HandPose::Fist);
        assert_eq!(analysis.foreground.mask.get_pixel(100, 80).0[0], 255);
        assert_eq!(analysis.foreground.mask.get_pixel(10, 10).0[0], 0);
    }

    #[test]
    fn frame_size_change_is_an_error() {
        let mut pipeline = HandPosePipeline::new(PipelineConfig::default()).unwrap();
        pipeline.process(&backdrop()).unwrap();
        let smaller = RgbImage::from_pixel(WIDTH / 2, HEIGHT, Rgb([12, 14, 10]));
        assert!(matches!(
            pipeline.process(&smaller),
            Err(PipelineError::FrameSizeChanged { .. })
        ));
        assert!(matches!(
            pipeline.process(&RgbImage::new(0, 0)),
            Err(PipelineError::EmptyFrame)
        ));
    }
}
