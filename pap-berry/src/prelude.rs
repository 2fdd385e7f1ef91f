//! 🔬欢迎光临🧫
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{ComponentId, Idx2d};

pub use crate::data::{CellImage, LabelMap, Mask};

pub use crate::consts::Region;
pub use crate::consts::{FEATURE_LEN, IMAGE_EXTENSIONS};

pub use crate::segment::{ColorParams, IntensityParams, Segmentation, Segmenter, SegmenterKind};

pub use crate::features::{FeatureName, FeatureVector};
pub use crate::pipeline::{extract_features, extract_features_with_masks, Extraction, Pipeline};

pub use crate::classify::{assess, Classifier, LogisticRegression, Prediction, RiskClass};
pub use crate::error::{PipelineError, Stage};
