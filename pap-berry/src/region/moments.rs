//! 二阶中心矩与等效椭圆.

use crate::Idx2d;

/// 以面积归一化的二阶中心矩, 即像素 `(行, 列)` 坐标的总体协方差.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct CentralMoments {
    /// 行方向方差.
    pub(crate) rr: f64,

    /// 列方向方差.
    pub(crate) cc: f64,

    /// 行列协方差.
    pub(crate) rc: f64,
}

impl CentralMoments {
    /// 从像素集合计算. 所有累加都以整数进行, 结果与访问顺序无关.
    ///
    /// `pixels` 为空时所有分量为 0.
    pub(crate) fn from_pixels(pixels: &[Idx2d]) -> Self {
        if pixels.is_empty() {
            return Self {
                rr: 0.0,
                cc: 0.0,
                rc: 0.0,
            };
        }
        let (mut sr, mut sc, mut srr, mut scc, mut src) = (0i128, 0i128, 0i128, 0i128, 0i128);
        for &(r, c) in pixels {
            let (r, c) = (r as i128, c as i128);
            sr += r;
            sc += c;
            srr += r * r;
            scc += c * c;
            src += r * c;
        }
        let n = pixels.len() as i128;
        let denom = (n * n) as f64;

        // n^2 * mu = n * sum(x * y) - sum(x) * sum(y), 在整数域内精确求得.
        Self {
            rr: (n * srr - sr * sr) as f64 / denom,
            cc: (n * scc - sc * sc) as f64 / denom,
            rc: (n * src - sr * sc) as f64 / denom,
        }
    }

    /// 协方差矩阵的两个特征值 `(大, 小)`, 均被截断到非负.
    pub(crate) fn eigenvalues(&self) -> (f64, f64) {
        let half_trace = (self.rr + self.cc) / 2.0;
        let half_diff = (self.rr - self.cc) / 2.0;
        let radius = (half_diff * half_diff + self.rc * self.rc).sqrt();
        ((half_trace + radius).max(0.0), (half_trace - radius).max(0.0))
    }

    /// 等效椭圆的 `(长轴, 短轴)` 长度.
    #[inline]
    pub(crate) fn axis_lengths(&self) -> (f64, f64) {
        let (l1, l2) = self.eigenvalues();
        (4.0 * l1.sqrt(), 4.0 * l2.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel() {
        let m = CentralMoments::from_pixels(&[(7, 9)]);
        assert_eq!(m.axis_lengths(), (0.0, 0.0));
    }

    #[test]
    fn test_order_independent() {
        let mut px: Vec<Idx2d> = (0..40).map(|i| (i * 7 % 13, i * 3 % 11)).collect();
        let a = CentralMoments::from_pixels(&px);
        px.reverse();
        let b = CentralMoments::from_pixels(&px);
        assert_eq!(a, b);
    }

    #[test]
    fn test_diagonal_line() {
        // 对角线: 所有方差都在 45 度方向.
        let px: Vec<Idx2d> = (0..5).map(|i| (i, i)).collect();
        let m = CentralMoments::from_pixels(&px);
        assert!((m.rr - 2.0).abs() < 1e-12);
        assert!((m.rc - 2.0).abs() < 1e-12);
        let (l1, l2) = m.eigenvalues();
        assert!((l1 - 4.0).abs() < 1e-12);
        assert!(l2.abs() < 1e-12);
    }
}
