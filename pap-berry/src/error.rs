//! 运行时错误.
//!
//! 每个处理阶段有独立的错误类型. [`PipelineError`] 汇总它们,
//! 并通过 [`PipelineError::stage`] 指明失败的阶段.

use crate::{ComponentId, Region};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 图像加载错误.
#[derive(Debug, Error)]
pub enum LoadError {
    /// 文件不存在或不可读.
    #[error("cannot read image file `{}`", .path.display())]
    Io {
        /// 目标路径.
        path: PathBuf,

        /// 底层 I/O 错误.
        #[source]
        source: std::io::Error,
    },

    /// 无法识别或解码图像格式.
    #[error("cannot decode image")]
    Decode(#[from] image::ImageError),

    /// 解码结果不含任何像素.
    #[error("image has no pixels")]
    Empty,

    /// 解码后的像素缓冲与图像形状不符.
    #[error("pixel buffer does not match image shape")]
    Layout(#[from] ndarray::ShapeError),
}

/// 分割错误.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    /// 过滤后该区域的 mask 中不存在任何合格的连通分量.
    #[error("no qualifying connected component found for the {region}")]
    NoComponent {
        /// 失败的区域.
        region: Region,
    },
}

/// 区域分析或特征合成错误.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    /// 指定编号的连通分量不含任何像素.
    #[error("connected component {id} has no pixels")]
    EmptyComponent {
        /// 连通分量编号.
        id: ComponentId,
    },

    /// 区域属性为负数或非有限值.
    #[error("invalid {property} of the {region}: {value}")]
    InvalidProperty {
        /// 所属区域.
        region: Region,

        /// 属性名.
        property: &'static str,

        /// 非法值.
        value: f64,
    },
}

/// 处理阶段.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    /// 图像加载.
    Load,

    /// 分割.
    Segment,

    /// 区域分析.
    Analyze,

    /// 特征合成.
    Compose,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Load => "load",
            Self::Segment => "segment",
            Self::Analyze => "analyze",
            Self::Compose => "compose",
        };
        f.write_str(s)
    }
}

/// 完整流水线的错误. 不会伴随任何部分填充的特征向量.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 加载阶段失败.
    #[error("load stage failed: {0}")]
    Load(#[from] LoadError),

    /// 分割阶段失败.
    #[error("segment stage failed: {0}")]
    Segment(#[from] SegmentationError),

    /// 区域分析或特征合成阶段失败.
    #[error("{stage} stage failed: {source}")]
    Feature {
        /// [`Stage::Analyze`] 或 [`Stage::Compose`].
        stage: Stage,

        /// 底层错误.
        #[source]
        source: FeatureError,
    },
}

impl PipelineError {
    /// 失败的阶段.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Load(_) => Stage::Load,
            Self::Segment(_) => Stage::Segment,
            Self::Feature { stage, .. } => *stage,
        }
    }

    #[inline]
    pub(crate) fn analyze(source: FeatureError) -> Self {
        Self::Feature {
            stage: Stage::Analyze,
            source,
        }
    }

    #[inline]
    pub(crate) fn compose(source: FeatureError) -> Self {
        Self::Feature {
            stage: Stage::Compose,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_reporting() {
        let e = PipelineError::from(LoadError::Empty);
        assert_eq!(e.stage(), Stage::Load);

        let e = PipelineError::from(SegmentationError::NoComponent {
            region: Region::Cytoplasm,
        });
        assert_eq!(e.stage(), Stage::Segment);
        assert!(e.to_string().contains("cytoplasm"));

        let e = PipelineError::analyze(FeatureError::EmptyComponent { id: 3 });
        assert_eq!(e.stage(), Stage::Analyze);
        assert_eq!(e.to_string(), "analyze stage failed: connected component 3 has no pixels");
    }
}
