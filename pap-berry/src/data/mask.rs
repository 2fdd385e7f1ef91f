//! 二值 mask 及其形态学操作.

use crate::consts::gray;
use crate::Idx2d;
use image::{GrayImage, ImageResult, Luma};
use ndarray::{s, Array2, ArrayView2};
use std::path::Path;

/// 二维二值 mask. `true` 代表该像素属于目标区域.
///
/// 与来源图像同高同宽.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    data: Array2<bool>,
}

impl Mask {
    /// 全背景 mask.
    #[inline]
    pub fn empty(shape: Idx2d) -> Self {
        Self {
            data: Array2::from_elem(shape, false),
        }
    }

    /// 以 `f(索引)` 构造 mask.
    #[inline]
    pub fn from_fn(shape: Idx2d, f: impl FnMut(Idx2d) -> bool) -> Self {
        Self {
            data: Array2::from_shape_fn(shape, f),
        }
    }

    /// 直接包装底层数组.
    #[inline]
    pub fn from_array(data: Array2<bool>) -> Self {
        Self { data }
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<bool> {
        self.data.view()
    }

    /// 直接获得底层数据.
    #[inline]
    pub fn into_raw(self) -> Array2<bool> {
        self.data
    }

    /// mask 的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获取给定位置的值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<bool> {
        self.data.get(pos).copied()
    }

    /// 前景像素个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&p| p).count()
    }

    /// 是否为全背景.
    #[inline]
    pub fn is_blank(&self) -> bool {
        !self.data.iter().any(|&p| p)
    }

    /// 以行优先规则, 获取能迭代所有前景像素索引的迭代器.
    pub fn foreground(&self) -> impl Iterator<Item = Idx2d> + '_ {
        self.data
            .indexed_iter()
            .filter_map(|(pos, &p)| p.then_some(pos))
    }

    /// 两个 mask 同时为前景的像素个数. 形状不同时返回 `None`.
    pub fn overlap(&self, other: &Mask) -> Option<usize> {
        (self.shape() == other.shape()).then(|| {
            self.data
                .iter()
                .zip(other.data.iter())
                .filter(|&(&a, &b)| a && b)
                .count()
        })
    }

    /// 以边长为 `side` 的方形结构元膨胀.
    ///
    /// 结构元实际边长为 `2 * (side / 2) + 1`. 图像外的像素被忽略.
    pub fn dilate(&self, side: usize) -> Mask {
        self.square_filter(side, |window| window.iter().any(|&p| p))
    }

    /// 以边长为 `side` 的方形结构元腐蚀.
    ///
    /// 结构元实际边长为 `2 * (side / 2) + 1`. 图像外的像素被忽略,
    /// 因此贴着图像边缘的前景不会被边缘本身腐蚀.
    pub fn erode(&self, side: usize) -> Mask {
        self.square_filter(side, |window| window.iter().all(|&p| p))
    }

    /// 形态学闭运算: 先膨胀, 后腐蚀. 用于填补单像素空洞、平滑边缘.
    #[inline]
    pub fn closing(&self, side: usize) -> Mask {
        self.dilate(side).erode(side)
    }

    /// 对每个像素取以其为中心、裁剪到图像内部的方形窗口, 以 `op` 求值.
    fn square_filter(&self, side: usize, op: impl Fn(ArrayView2<bool>) -> bool) -> Mask {
        let r = side / 2;
        let (h_len, w_len) = self.shape();
        if r == 0 || h_len == 0 || w_len == 0 {
            return self.clone();
        }
        Mask::from_fn((h_len, w_len), |(h, w)| {
            let (h0, h1) = (h.saturating_sub(r), (h + r).min(h_len - 1));
            let (w0, w1) = (w.saturating_sub(r), (w + r).min(w_len - 1));
            op(self.data.slice(s![h0..=h1, w0..=w1]))
        })
    }

    /// 转化为单通道灰度图: 前景为 255, 背景为 0.
    pub fn to_gray_image(&self) -> GrayImage {
        let (height, width) = self.shape();
        let mut buf = GrayImage::new(width as u32, height as u32);
        for ((h, w), &p) in self.data.indexed_iter() {
            let v = if p { gray::FOREGROUND } else { gray::BACKGROUND };
            buf.put_pixel(w as u32, h as u32, Luma([v]));
        }
        buf
    }

    /// 以可视化友好的方式 (前景白, 背景黑) 将 mask 保存到 `path` 路径.
    #[inline]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_gray_image().save(path)
    }
}
