//! 细胞核/细胞质分割.
//!
//! 两种可互换的策略都实现 [`Segmenter`], 并满足同一输出约定:
//! 每个区域一个 mask 与一个被选中的连通分量, 否则返回错误.

mod color;
mod intensity;

use crate::error::SegmentationError;
use crate::{CellImage, ComponentId, LabelMap, Mask, Region};

pub use color::{ColorParams, ColorSegmenter};
pub use intensity::{IntensityParams, IntensitySegmenter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 分割策略.
pub trait Segmenter {
    /// 对 `image` 进行分割.
    fn segment(&self, image: &CellImage) -> Result<Segmentation, SegmentationError>;
}

/// 标记图中被选中代表某一区域的连通分量.
#[derive(Clone, Debug)]
pub struct RegionSelection {
    /// 连通分量标记图.
    pub labels: LabelMap,

    /// 被选中的分量编号.
    pub id: ComponentId,
}

impl RegionSelection {
    /// 从标记图中选出面积最大的分量. 面积相同时取编号最小者.
    ///
    /// 标记图中没有任何分量时返回 `Err`.
    pub fn largest(labels: LabelMap, region: Region) -> Result<Self, SegmentationError> {
        let id = labels
            .largest()
            .ok_or(SegmentationError::NoComponent { region })?;
        log::debug!(
            "Selected component {id} (area {}) of {} as the {region}",
            labels.area(id),
            labels.len()
        );
        Ok(Self { labels, id })
    }

    /// 被选中分量的面积.
    #[inline]
    pub fn area(&self) -> usize {
        self.labels.area(self.id)
    }
}

/// 一次分割的结果.
#[derive(Clone, Debug)]
pub struct Segmentation {
    /// 细胞核分量.
    pub nucleus: RegionSelection,

    /// 细胞质分量. `None` 表示细胞质与细胞核使用同一个物理分量.
    pub cytoplasm: Option<RegionSelection>,

    /// 用于展示的细胞核 mask.
    pub nucleus_mask: Mask,

    /// 用于展示的细胞质 mask.
    pub cytoplasm_mask: Mask,
}

impl Segmentation {
    /// 细胞质分量. 若没有独立的细胞质分量, 则返回细胞核分量.
    #[inline]
    pub fn cytoplasm(&self) -> &RegionSelection {
        self.cytoplasm.as_ref().unwrap_or(&self.nucleus)
    }

    /// 细胞质是否与细胞核共用同一个分量.
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.cytoplasm.is_none()
    }
}

/// 由配置选择的分割策略.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Clone, Debug, PartialEq)]
pub enum SegmenterKind {
    /// 灰度阈值.
    Intensity(IntensityParams),

    /// 颜色范围.
    Color(ColorParams),
}

impl SegmenterKind {
    /// 以默认参数使用灰度阈值策略.
    #[inline]
    pub fn intensity() -> Self {
        Self::Intensity(IntensityParams::default())
    }

    /// 以默认参数使用颜色范围策略.
    #[inline]
    pub fn color() -> Self {
        Self::Color(ColorParams::default())
    }

    /// 策略名称.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Intensity(_) => "intensity",
            Self::Color(_) => "color",
        }
    }
}

impl Default for SegmenterKind {
    fn default() -> Self {
        Self::intensity()
    }
}

impl Segmenter for SegmenterKind {
    fn segment(&self, image: &CellImage) -> Result<Segmentation, SegmentationError> {
        match self {
            Self::Intensity(params) => IntensitySegmenter::new(params.clone()).segment(image),
            Self::Color(params) => ColorSegmenter::new(params.clone()).segment(image),
        }
    }
}
