//! 特征提取流水线: 加载 → 分割 → 区域分析 → 特征合成.
//!
//! 每次运行拥有独立的图像与 mask, 不共享任何可变状态,
//! 因此多张图像可以安全地并行处理.

use crate::error::PipelineError;
use crate::segment::{Segmenter, SegmenterKind};
use crate::{analyze, compose, CellImage, FeatureVector, Mask};
use std::path::Path;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
    }
}

/// 一次成功运行的产物.
#[derive(Clone, Debug)]
pub struct Extraction {
    /// 13 维特征向量.
    pub features: FeatureVector,

    /// 细胞核 mask.
    pub nucleus_mask: Mask,

    /// 细胞质 mask.
    pub cytoplasm_mask: Mask,
}

/// 特征提取流水线.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    segmenter: SegmenterKind,
}

impl Pipeline {
    /// 以指定的分割策略初始化.
    #[inline]
    pub fn new(segmenter: SegmenterKind) -> Self {
        Self { segmenter }
    }

    /// 当前的分割策略.
    #[inline]
    pub fn segmenter(&self) -> &SegmenterKind {
        &self.segmenter
    }

    /// 处理 `path` 路径下的图像.
    pub fn run<P: AsRef<Path>>(&self, path: P) -> Result<Extraction, PipelineError> {
        let image = CellImage::open(path)?;
        self.run_image(&image)
    }

    /// 处理以字节缓冲给出的已编码图像.
    pub fn run_bytes(&self, bytes: &[u8]) -> Result<Extraction, PipelineError> {
        let image = CellImage::from_bytes(bytes)?;
        self.run_image(&image)
    }

    /// 处理已解码的图像.
    pub fn run_image(&self, image: &CellImage) -> Result<Extraction, PipelineError> {
        let seg = self.segmenter.segment(image)?;

        let nucleus =
            analyze(&seg.nucleus.labels, seg.nucleus.id).map_err(PipelineError::analyze)?;
        let cytoplasm = match seg.cytoplasm {
            Some(ref c) => analyze(&c.labels, c.id).map_err(PipelineError::analyze)?,
            None => nucleus,
        };
        let features = compose(&nucleus, &cytoplasm).map_err(PipelineError::compose)?;
        log::debug!(
            "Extracted {} features with the {} segmenter",
            features.len(),
            self.segmenter.name()
        );

        Ok(Extraction {
            features,
            nucleus_mask: seg.nucleus_mask,
            cytoplasm_mask: seg.cytoplasm_mask,
        })
    }

    /// 依次处理多张图像. 结果与 `paths` 一一对应, 顺序相同.
    #[cfg(not(feature = "rayon"))]
    pub fn run_batch<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<Result<Extraction, PipelineError>> {
        paths.iter().map(|p| self.run(p)).collect()
    }

    /// 借助 `rayon` 并行处理多张图像. 结果与 `paths` 一一对应, 顺序相同.
    #[cfg(feature = "rayon")]
    pub fn run_batch<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
    ) -> Vec<Result<Extraction, PipelineError>> {
        paths.par_iter().map(|p| self.run(p)).collect()
    }
}

/// 以默认的灰度阈值策略提取特征.
pub fn extract_features<P: AsRef<Path>>(path: P) -> Result<FeatureVector, PipelineError> {
    Pipeline::new(SegmenterKind::intensity())
        .run(path)
        .map(|e| e.features)
}

/// 以默认的颜色范围策略提取特征, 并返回 `(特征, 细胞核 mask, 细胞质 mask)`.
pub fn extract_features_with_masks<P: AsRef<Path>>(
    path: P,
) -> Result<(FeatureVector, Mask, Mask), PipelineError> {
    Pipeline::new(SegmenterKind::color())
        .run(path)
        .map(|e| (e.features, e.nucleus_mask, e.cytoplasm_mask))
}
