//! 灰度阈值分割.

use super::{RegionSelection, Segmentation, Segmenter};
use crate::consts::{luma, MIN_COMPONENT_AREA};
use crate::error::SegmentationError;
use crate::{CellImage, LabelMap, Mask, Region};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 灰度阈值分割参数.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityParams {
    /// 归一化灰度阈值. 灰度严格大于该值的像素为前景.
    pub threshold: f64,

    /// 保留连通分量的最小面积. 面积严格小于该值的分量被移除.
    pub min_area: usize,
}

impl Default for IntensityParams {
    fn default() -> Self {
        Self {
            threshold: luma::THRESHOLD,
            min_area: MIN_COMPONENT_AREA,
        }
    }
}

/// 灰度阈值分割.
///
/// 感知加权灰度化后以固定阈值二值化, 标记 8-连通分量并移除小分量,
/// 最后选取面积最大的分量. 该策略不区分细胞核与细胞质:
/// 两个区域都在同一个物理分量上计算.
#[derive(Clone, Debug, Default)]
pub struct IntensitySegmenter {
    params: IntensityParams,
}

impl IntensitySegmenter {
    /// 初始化.
    #[inline]
    pub fn new(params: IntensityParams) -> Self {
        Self { params }
    }

    /// 二值化.
    pub fn binarize(&self, image: &CellImage) -> Mask {
        let threshold = self.params.threshold;
        Mask::from_array(image.to_luminance().map(|&v| v > threshold))
    }
}

impl Segmenter for IntensitySegmenter {
    fn segment(&self, image: &CellImage) -> Result<Segmentation, SegmentationError> {
        let binary = self.binarize(image);
        let mut labels = LabelMap::label(&binary);
        let total = labels.len();
        let removed = labels.remove_small(self.params.min_area);
        log::debug!(
            "Intensity threshold {}: {total} components, {removed} below {} pixels",
            self.params.threshold,
            self.params.min_area
        );

        let nucleus = RegionSelection::largest(labels, Region::Nucleus)?;
        let mask = nucleus.labels.component_mask(nucleus.id);
        Ok(Segmentation {
            nucleus,
            cytoplasm: None,
            nucleus_mask: mask.clone(),
            cytoplasm_mask: mask,
        })
    }
}
