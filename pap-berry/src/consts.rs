//! 通用常量.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 灰度化与灰度阈值.
pub mod luma {
    /// 感知加权灰度系数, 依次对应 R, G, B.
    pub const WEIGHTS: [f64; 3] = [0.2125, 0.7154, 0.0721];

    /// 归一化 (0.0 ~ 1.0) 灰度上的前景阈值. 严格大于该值的像素为前景.
    pub const THRESHOLD: f64 = 0.5;
}

/// 颜色范围分割使用的参考颜色 (RGB).
pub mod color {
    /// 细胞核参考颜色 (蓝).
    pub const NUCLEUS: [u8; 3] = [0, 0, 255];

    /// 细胞质参考颜色 (暗蓝).
    pub const CYTOPLASM: [u8; 3] = [0, 0, 128];

    /// 逐通道容差. 每个通道的差的绝对值都 **严格小于** 该值时才算匹配.
    pub const TOLERANCE: u8 = 50;
}

/// mask 可视化时使用的单通道灰度值.
pub mod gray {
    /// 背景像素.
    pub const BACKGROUND: u8 = 0;

    /// 前景像素.
    pub const FOREGROUND: u8 = 255;
}

/// 灰度阈值分割中保留连通分量的最小面积 (像素数).
pub const MIN_COMPONENT_AREA: usize = 100;

/// 闭运算方形结构元的边长.
pub const CLOSING_SIDE: usize = 3;

/// 特征向量的长度.
pub const FEATURE_LEN: usize = 13;

/// 可被加载的图像扩展名 (小写).
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// 解剖学区域.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Region {
    /// 细胞核.
    Nucleus,

    /// 细胞质.
    Cytoplasm,
}

impl Region {
    /// 是否为细胞核.
    #[inline]
    pub fn is_nucleus(&self) -> bool {
        matches!(self, Self::Nucleus)
    }

    /// 是否为细胞质.
    #[inline]
    pub fn is_cytoplasm(&self) -> bool {
        !self.is_nucleus()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nucleus => f.write_str("nucleus"),
            Self::Cytoplasm => f.write_str("cytoplasm"),
        }
    }
}
