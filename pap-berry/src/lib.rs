#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 将一张宫颈细胞显微图像转化为确定的、有序的 13 维形态学特征向量,
//! 供外部的高/低风险分类器使用.
//!
//! 该 crate 只提供 `safe` 接口. 所有可能因用户输入而失败的操作都返回 `Result`,
//! 并且错误会指明失败的处理阶段 (加载、分割、区域分析、特征合成).
//!
//! # 注意
//!
//! 1. 当前设计假设每张图像中恰好存在一个细胞核区域和一个细胞质区域,
//!   不处理多细胞分割.
//! 2. 分类器不在本 crate 内加载. 调用方负责构造并注入实现了
//!   [`Classifier`] 的模型.
//!
//! # 开发计划
//!
//! ### 图像加载 ✅
//!
//! 支持 JPEG/PNG/BMP, 统一转换为 3 通道 8-bit RGB.
//!
//! 实现位于 `pap-berry/src/data/cell.rs`.
//!
//! ### 二值 mask 与形态学闭运算 ✅
//!
//! 方形结构元, 图像外像素在膨胀与腐蚀中均被忽略.
//!
//! 实现位于 `pap-berry/src/data/mask.rs`.
//!
//! ### 8-邻域连通分量标记 ✅
//!
//! 按行优先顺序从 1 开始分配编号. 选取最大分量时, 面积相同取编号最小者.
//!
//! 实现位于 `pap-berry/src/data/labels.rs`.
//!
//! ### 两种分割策略 ✅
//!
//! 1. 灰度阈值: 感知加权灰度化, 阈值 0.5, 去除面积小于 100 的分量. ✅
//! 2. 颜色范围: 与参考颜色逐通道比较, 3x3 闭运算. ✅
//!
//! 两者都实现 [`Segmenter`], 由 [`SegmenterKind`] 按配置选择.
//!
//! 实现位于 `pap-berry/src/segment/*`.
//!
//! ### 区域属性 ✅
//!
//! 面积, 周长 (内边界加权计数), 等效椭圆长/短轴.
//!
//! 实现位于 `pap-berry/src/region/*`.
//!
//! ### 特征合成与分类器接口 ✅
//!
//! 实现位于 `pap-berry/src/features.rs` 和 `pap-berry/src/classify.rs`.
//!
//! ### 批量并行提取 ✅
//!
//! 打开 `rayon` feature 后, [`Pipeline::run_batch`] 并行处理多张图像.
//! 每张图像拥有独立的数组, 不共享任何可变状态.

/// 二维索引 `(高, 宽)`, 即 `(行, 列)`.
pub type Idx2d = (usize, usize);

/// 连通分量编号. `0` 代表背景.
pub type ComponentId = u32;

pub mod classify;
pub mod consts;
mod data;
pub mod error;
pub mod features;
mod neighbour;
pub mod pipeline;
pub mod prelude;
pub mod region;
pub mod segment;

pub use classify::{assess, Assessment, Classifier, LogisticRegression, Prediction, RiskClass};
pub use consts::Region;
pub use data::{CellImage, LabelMap, Mask};
pub use error::{FeatureError, LoadError, PipelineError, SegmentationError, Stage};
pub use features::{compose, FeatureName, FeatureVector};
pub use pipeline::{extract_features, extract_features_with_masks, Extraction, Pipeline};
pub use region::{analyze, RegionProperties};
pub use segment::{
    ColorParams, ColorSegmenter, IntensityParams, IntensitySegmenter, RegionSelection,
    Segmentation, Segmenter, SegmenterKind,
};
