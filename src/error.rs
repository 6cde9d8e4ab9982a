use thiserror::Error;

/// Rejected pipeline configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("blur size must be odd and at least 3, got {0}")]
    BlurSize(u32),

    #[error("background history must be at least one frame")]
    EmptyHistory,

    #[error("variance threshold must be positive, got {0}")]
    VarThreshold(f32),

    #[error("shadow detection is not supported")]
    ShadowDetection,

    #[error("finger angle must be within (0, pi] radians, got {0}")]
    FingerAngle(f64),

    #[error("defect depth must be a finite non-negative number, got {0}")]
    DefectDepth(f64),

    #[error("fingers-spread range {min}..={max} is empty")]
    SpreadRange { min: usize, max: usize },
}

/// Failures while running a frame through the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("received an empty frame")]
    EmptyFrame,

    #[error("frame size changed from {expected:?} to {actual:?}")]
    FrameSizeChanged {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("unexpected {rows}x{cols} matrix of type {typ} from OpenCV")]
    MatLayout { rows: i32, cols: i32, typ: i32 },

    #[error("OpenCV call failed: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
