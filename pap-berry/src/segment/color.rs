//! 颜色范围分割.

use super::{RegionSelection, Segmentation, Segmenter};
use crate::consts::{color, CLOSING_SIDE};
use crate::error::SegmentationError;
use crate::{CellImage, LabelMap, Mask, Region};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 颜色范围分割参数.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorParams {
    /// 细胞核参考颜色 (RGB).
    pub nucleus: [u8; 3],

    /// 细胞质参考颜色 (RGB).
    pub cytoplasm: [u8; 3],

    /// 逐通道容差. 差的绝对值严格小于该值时才算匹配.
    pub tolerance: u8,

    /// 闭运算结构元边长.
    pub closing_side: usize,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            nucleus: color::NUCLEUS,
            cytoplasm: color::CYTOPLASM,
            tolerance: color::TOLERANCE,
            closing_side: CLOSING_SIDE,
        }
    }
}

/// 判断 `pixel` 是否在 `reference` 的 `tolerance` 范围内.
#[inline]
fn matches(pixel: [u8; 3], reference: [u8; 3], tolerance: u8) -> bool {
    pixel
        .iter()
        .zip(reference.iter())
        .all(|(&p, &r)| (p as i16 - r as i16).abs() < tolerance as i16)
}

/// 颜色范围分割.
///
/// 两个区域的 mask 分别独立计算, 一个像素可以同时属于两者.
/// 每个 mask 经闭运算后标记 8-连通分量, 并各自选取面积最大的分量.
#[derive(Clone, Debug, Default)]
pub struct ColorSegmenter {
    params: ColorParams,
}

impl ColorSegmenter {
    /// 初始化.
    #[inline]
    pub fn new(params: ColorParams) -> Self {
        Self { params }
    }

    /// 与参考颜色 `reference` 匹配的像素构成的 mask, 未经闭运算.
    pub fn color_mask(&self, image: &CellImage, reference: [u8; 3]) -> Mask {
        let tolerance = self.params.tolerance;
        Mask::from_fn(image.shape(), |pos| {
            matches(image.pixel(pos), reference, tolerance)
        })
    }

    fn select(
        &self,
        image: &CellImage,
        region: Region,
    ) -> Result<(Mask, RegionSelection), SegmentationError> {
        let reference = match region {
            Region::Nucleus => self.params.nucleus,
            Region::Cytoplasm => self.params.cytoplasm,
        };
        let mask = self
            .color_mask(image, reference)
            .closing(self.params.closing_side);
        let labels = LabelMap::label(&mask);
        debug_assert_eq!(labels.shape(), image.shape());
        log::debug!(
            "Color {reference:?}: {} pixels after closing, {} components",
            mask.count(),
            labels.len()
        );
        let selection = RegionSelection::largest(labels, region)?;
        Ok((mask, selection))
    }
}

impl Segmenter for ColorSegmenter {
    fn segment(&self, image: &CellImage) -> Result<Segmentation, SegmentationError> {
        let (nucleus_mask, nucleus) = self.select(image, Region::Nucleus)?;
        let (cytoplasm_mask, cytoplasm) = self.select(image, Region::Cytoplasm)?;

        // 两个 mask 都与图像同形状, 因此 `overlap` 总是 `Some`.
        if let Some(n) = nucleus_mask.overlap(&cytoplasm_mask).filter(|&n| n > 0) {
            log::warn!("{n} pixels are classified as both nucleus and cytoplasm");
        }

        Ok(Segmentation {
            nucleus,
            cytoplasm: Some(cytoplasm),
            nucleus_mask,
            cytoplasm_mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const WHITE: [u8; 3] = [255, 255, 255];

    /// 白色背景, 按顺序绘制矩形 `(h0, w0, 高, 宽, 颜色)`, 后者覆盖前者.
    fn painted(shape: (u32, u32), rects: &[(u32, u32, u32, u32, [u8; 3])]) -> CellImage {
        let (height, width) = shape;
        let img = RgbImage::from_fn(width, height, |x, y| {
            let c = rects
                .iter()
                .rev()
                .find(|&&(h0, w0, h, w, _)| (h0..h0 + h).contains(&y) && (w0..w0 + w).contains(&x))
                .map_or(WHITE, |r| r.4);
            Rgb(c)
        });
        CellImage::from_rgb(img).unwrap()
    }

    /// 暗蓝色细胞质包裹蓝色细胞核.
    fn cell() -> CellImage {
        painted(
            (40, 40),
            &[(5, 5, 30, 30, color::CYTOPLASM), (15, 15, 10, 10, color::NUCLEUS)],
        )
    }

    #[test]
    fn test_matches_is_strict() {
        assert!(matches([0, 0, 255], color::NUCLEUS, 50));
        assert!(matches([49, 0, 206], color::NUCLEUS, 50));
        assert!(!matches([50, 0, 255], color::NUCLEUS, 50));
        assert!(!matches([0, 0, 205], color::NUCLEUS, 50));
        assert!(!matches(WHITE, color::CYTOPLASM, 50));
    }

    #[test]
    fn test_nucleus_inside_cytoplasm() {
        let seg = ColorSegmenter::default().segment(&cell()).unwrap();
        assert!(!seg.is_shared());
        assert_eq!(seg.nucleus.area(), 100);
        assert_eq!(seg.cytoplasm().area(), 800);
        assert_eq!(seg.nucleus_mask.count(), 100);
        assert_eq!(seg.cytoplasm_mask.count(), 800);
        assert_eq!(seg.nucleus_mask.overlap(&seg.cytoplasm_mask), Some(0));
        assert_eq!(seg.cytoplasm_mask.get((20, 20)), Some(false));
    }

    #[test]
    fn test_masks_share_image_shape() {
        let img = painted(
            (23, 31),
            &[(2, 3, 8, 9, color::NUCLEUS), (12, 20, 9, 10, color::CYTOPLASM)],
        );
        let seg = ColorSegmenter::default().segment(&img).unwrap();
        assert_eq!(seg.nucleus_mask.shape(), (23, 31));
        assert_eq!(seg.cytoplasm_mask.shape(), (23, 31));
        assert_eq!(seg.nucleus.labels.shape(), (23, 31));
        assert_eq!(seg.cytoplasm().labels.shape(), (23, 31));
        assert_eq!(seg.nucleus_mask.overlap(&seg.cytoplasm_mask), Some(0));
    }

    #[test]
    fn test_closing_fills_gap() {
        let img = painted(
            (30, 30),
            &[
                (5, 5, 10, 10, color::NUCLEUS),
                (9, 9, 1, 1, WHITE),
                (20, 5, 6, 20, color::CYTOPLASM),
            ],
        );
        let s = ColorSegmenter::default();
        assert_eq!(s.color_mask(&img, color::NUCLEUS).count(), 99);
        let seg = s.segment(&img).unwrap();
        assert_eq!(seg.nucleus.area(), 100);
        assert_eq!(seg.cytoplasm().area(), 120);
    }

    #[test]
    fn test_largest_component_per_mask() {
        let img = painted(
            (40, 40),
            &[
                (2, 2, 4, 4, color::NUCLEUS),
                (10, 10, 8, 8, color::NUCLEUS),
                (25, 2, 10, 10, color::CYTOPLASM),
                (25, 20, 5, 5, color::CYTOPLASM),
            ],
        );
        let seg = ColorSegmenter::default().segment(&img).unwrap();
        assert_eq!(seg.nucleus.area(), 64);
        assert_eq!(seg.cytoplasm().area(), 100);
        // 展示用 mask 保留所有匹配像素.
        assert_eq!(seg.nucleus_mask.count(), 16 + 64);
        assert_eq!(seg.cytoplasm_mask.count(), 100 + 25);
    }

    #[test]
    fn test_missing_region_fails() {
        let only_nucleus = painted((20, 20), &[(5, 5, 6, 6, color::NUCLEUS)]);
        let err = ColorSegmenter::default().segment(&only_nucleus).unwrap_err();
        assert_eq!(err, SegmentationError::NoComponent { region: Region::Cytoplasm });

        let only_cytoplasm = painted((20, 20), &[(5, 5, 6, 6, color::CYTOPLASM)]);
        let err = ColorSegmenter::default().segment(&only_cytoplasm).unwrap_err();
        assert_eq!(err, SegmentationError::NoComponent { region: Region::Nucleus });
    }

    #[test]
    fn test_overlapping_references_are_kept() {
        let params = ColorParams {
            nucleus: [0, 0, 200],
            cytoplasm: [0, 0, 180],
            ..ColorParams::default()
        };
        let img = painted((20, 20), &[(4, 4, 8, 8, [0, 0, 190])]);
        let seg = ColorSegmenter::new(params).segment(&img).unwrap();
        assert_eq!(seg.nucleus_mask, seg.cytoplasm_mask);
        assert_eq!(seg.nucleus_mask.overlap(&seg.cytoplasm_mask), Some(64));
    }
}
