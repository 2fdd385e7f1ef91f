//! 图像加载.

use crate::consts::luma;
use crate::error::LoadError;
use crate::Idx2d;
use image::RgbImage;
use itertools::iproduct;
use ndarray::{Array2, Array3, ArrayView3};
use std::fs;
use std::path::Path;

/// 已加载的 3 通道 RGB 细胞图像, 像素值范围 0 ~ 255.
///
/// 数据布局为 `(高, 宽, 通道)`. 加载后不可变.
#[derive(Clone, Debug)]
pub struct CellImage {
    data: Array3<u8>,
}

impl CellImage {
    /// 通道数.
    pub const CHANNELS: usize = 3;

    /// 从 `path` 读取并解码图像. 格式由文件内容判断, 而非扩展名.
    ///
    /// 文件不存在或不可读、无法解码、解码为零像素时返回 `Err`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        let image = Self::from_bytes(&bytes)?;
        log::debug!(
            "Loaded `{}`: {}x{} pixels",
            path.display(),
            image.height(),
            image.width()
        );
        Ok(image)
    }

    /// 从内存中的编码字节流解码图像.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let decoded = image::load_from_memory(bytes)?;
        Self::from_rgb(decoded.to_rgb8())
    }

    /// 直接使用已解码的 RGB 图像.
    pub fn from_rgb(rgb: RgbImage) -> Result<Self, LoadError> {
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::Empty);
        }
        let shape = (height as usize, width as usize, Self::CHANNELS);
        let data = Array3::from_shape_vec(shape, rgb.into_raw())?;
        Ok(Self { data })
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView3<u8> {
        self.data.view()
    }

    /// 图像的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        let &[h, w, _] = self.data.shape() else {
            unreachable!()
        };
        (h, w)
    }

    /// 获得图像的高.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape().0
    }

    /// 获得图像的宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// 获取 `(h, w)` 处的 `[R, G, B]`. 越界时 panic.
    #[inline]
    pub fn pixel(&self, (h, w): Idx2d) -> [u8; 3] {
        [self.data[(h, w, 0)], self.data[(h, w, 1)], self.data[(h, w, 2)]]
    }

    /// 以行优先规则, 获取能迭代图像所有 `(索引, 像素)` 的迭代器.
    pub fn indexed_pixels(&self) -> impl Iterator<Item = (Idx2d, [u8; 3])> + '_ {
        let (h, w) = self.shape();
        iproduct!(0..h, 0..w).map(|pos| (pos, self.pixel(pos)))
    }

    /// 感知加权灰度图, 值域 0.0 ~ 1.0.
    pub fn to_luminance(&self) -> Array2<f64> {
        Array2::from_shape_fn(self.shape(), |pos| luminance(self.pixel(pos)))
    }
}

/// 单个 RGB 像素的归一化感知灰度.
#[inline]
pub(crate) fn luminance(rgb: [u8; 3]) -> f64 {
    rgb.iter()
        .zip(luma::WEIGHTS)
        .map(|(&c, k)| c as f64 / 255.0 * k)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb};
    use std::io::Cursor;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_luminance_extremes() {
        assert!(f64_eq(luminance([0, 0, 0]), 0.0));
        assert!(f64_eq(luminance([255, 255, 255]), 1.0));
        assert!(f64_eq(luminance([0, 255, 0]), 0.7154));
        // 纯蓝远低于阈值.
        assert!(luminance([0, 0, 255]) < luma::THRESHOLD);
    }

    #[test]
    fn test_from_rgb_layout() {
        let rgb = RgbImage::from_fn(4, 2, |x, y| Rgb([x as u8, y as u8, 7]));
        let img = CellImage::from_rgb(rgb).unwrap();
        assert_eq!(img.shape(), (2, 4));
        assert_eq!(img.pixel((1, 3)), [3, 1, 7]);
        assert_eq!(img.indexed_pixels().count(), 8);
        assert_eq!(img.indexed_pixels().nth(5), Some(((1, 1), [1, 1, 7])));
    }

    #[test]
    fn test_from_bytes_png() {
        let rgb = RgbImage::from_pixel(3, 5, Rgb([10, 20, 30]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        let img = CellImage::from_bytes(buf.get_ref()).unwrap();
        assert_eq!(img.shape(), (5, 3));
        assert_eq!(img.pixel((4, 2)), [10, 20, 30]);
    }

    #[test]
    fn test_load_errors() {
        let err = CellImage::open("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));

        let err = CellImage::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));

        let err = CellImage::from_rgb(RgbImage::new(0, 4)).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }
}
