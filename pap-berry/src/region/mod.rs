//! 连通分量的几何属性.
//!
//! 对细胞核与细胞质使用完全相同的估计方法, 保证二者派生的比值可比.

mod moments;
mod perimeter;

use crate::error::FeatureError;
use crate::{ComponentId, Idx2d, LabelMap};
use moments::CentralMoments;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 单个连通分量的区域属性.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegionProperties {
    /// 面积 (像素个数).
    pub area: usize,

    /// 周长估计, 见 [`analyze`].
    pub perimeter: f64,

    /// 等效椭圆长轴长度.
    pub major_axis: f64,

    /// 等效椭圆短轴长度.
    pub minor_axis: f64,
}

impl RegionProperties {
    /// 直接构造.
    #[inline]
    pub const fn new(area: usize, perimeter: f64, major_axis: f64, minor_axis: f64) -> Self {
        Self {
            area,
            perimeter,
            major_axis,
            minor_axis,
        }
    }

    /// 直接从像素集合计算区域属性. `pixels` 不能为空, 且不能含重复索引.
    ///
    /// `shape` 为所在图像的形状, 图像外的像素视为不属于该区域.
    pub fn from_pixels(pixels: &[Idx2d], shape: Idx2d) -> Self {
        let moments = CentralMoments::from_pixels(pixels);
        let (major_axis, minor_axis) = moments.axis_lengths();
        Self {
            area: pixels.len(),
            perimeter: perimeter::weighted_boundary_length(pixels, shape),
            major_axis,
            minor_axis,
        }
    }
}

/// 计算标记图 `labels` 中编号为 `component_id` 的分量的区域属性.
///
/// - 面积: 像素个数.
/// - 周长: 内边界加权计数. 内边界像素是 4-邻域中存在非本分量像素
///   (或位于图像外) 的本分量像素. 每个内边界像素按其 8-邻域中内边界像素的
///   排布被赋予 1, √2 或 (1 + √2) / 2 的权重. 实心 N x N 正方形的结果为
///   `4N - 4`.
/// - 长/短轴: 像素坐标协方差矩阵特征值 `λ` 对应的 `4√λ`.
///
/// 同一像素集合的结果总是逐位相同.
///
/// # 注意
///
/// 由该周长派生的圆度 `4π · 面积 / 周长²` 与理想值存在偏差:
///
/// 1. 半径 `R >= 10` 的实心圆盘, 圆度落在 `0.88..=1.0` 内 (约 0.91), 伸长度为 1.0.
/// 2. 实心 N x N 正方形只有在 `N >= 9` 时圆度才小于 1.0; `N = 8` 时约为 1.026.
pub fn analyze(
    labels: &LabelMap,
    component_id: ComponentId,
) -> Result<RegionProperties, FeatureError> {
    let pixels: Vec<Idx2d> = labels.pixels(component_id).collect();
    if pixels.is_empty() {
        return Err(FeatureError::EmptyComponent { id: component_id });
    }
    let props = RegionProperties::from_pixels(&pixels, labels.shape());
    log::debug!("Component {component_id}: {props:?}");
    Ok(props)
}
