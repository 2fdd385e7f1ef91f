//! 内边界加权周长估计.

use crate::neighbour::{shifted, DIAGONAL, N4};
use crate::Idx2d;
use std::collections::HashSet;
use std::f64::consts::SQRT_2;

/// 编码种类数. 最大编码为 `1 + 2 * 4 + 10 * 4 = 49`.
const CODES: usize = 50;

/// 编码 `code` 对应的周长权重.
///
/// 编码 = `1 + 2 * (4-邻域中边界像素数) + 10 * (对角中边界像素数)`.
/// 直线段 (5, 7, 15, 17, 25, 27) 为 1, 斜线段 (21, 33) 为 √2,
/// 拐角 (13, 23) 为 (1 + √2) / 2, 其余为 0.
fn weight(code: usize) -> f64 {
    match code {
        5 | 7 | 15 | 17 | 25 | 27 => 1.0,
        21 | 33 => SQRT_2,
        13 | 23 => (1.0 + SQRT_2) / 2.0,
        _ => 0.0,
    }
}

/// 估计像素集合 `pixels` 的周长. `shape` 外的位置视为不属于该集合.
///
/// 先统计每种编码的出现次数, 再按编码顺序加权求和, 结果与像素的访问顺序无关.
pub(crate) fn weighted_boundary_length(pixels: &[Idx2d], shape: Idx2d) -> f64 {
    let inside: HashSet<Idx2d> = pixels.iter().copied().collect();
    let is_inside = |pos: Idx2d, d: (isize, isize)| {
        shifted(pos, d, shape).is_some_and(|p| inside.contains(&p))
    };

    // 4-邻域中存在外部像素的像素即为内边界.
    let boundary: HashSet<Idx2d> = pixels
        .iter()
        .copied()
        .filter(|&pos| !N4.iter().all(|&d| is_inside(pos, d)))
        .collect();
    let on_boundary = |pos: Idx2d, d: (isize, isize)| {
        shifted(pos, d, shape).is_some_and(|p| boundary.contains(&p))
    };

    let mut histogram = [0u64; CODES];
    for &pos in boundary.iter() {
        let straight = N4.iter().filter(|&&d| on_boundary(pos, d)).count();
        let diagonal = DIAGONAL.iter().filter(|&&d| on_boundary(pos, d)).count();
        histogram[1 + 2 * straight + 10 * diagonal] += 1;
    }

    histogram
        .iter()
        .enumerate()
        .map(|(code, &n)| n as f64 * weight(code))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    fn disk(radius: usize) -> (Vec<Idx2d>, Idx2d) {
        let n = 2 * radius + 5;
        let c = (n / 2) as isize;
        let r2 = (radius * radius) as isize;
        let px = iproduct!(0..n, 0..n)
            .filter(|&(h, w)| {
                let (dh, dw) = (h as isize - c, w as isize - c);
                dh * dh + dw * dw <= r2
            })
            .collect();
        (px, (n, n))
    }

    #[test]
    fn test_weights() {
        assert_eq!(weight(5), 1.0);
        assert_eq!(weight(21), SQRT_2);
        assert_eq!(weight(1), 0.0);
        assert_eq!(weight(49), 0.0);
    }

    #[test]
    fn test_square_perimeter() {
        for n in [3usize, 10, 20] {
            let px: Vec<Idx2d> = iproduct!(2..2 + n, 2..2 + n).collect();
            let p = weighted_boundary_length(&px, (n + 4, n + 4));
            assert!((p - (4 * n - 4) as f64).abs() < 1e-9, "n = {n}, p = {p}");
        }
    }

    #[test]
    fn test_degenerate_shapes() {
        assert_eq!(weighted_boundary_length(&[(1, 1)], (3, 3)), 0.0);
        let line: Vec<Idx2d> = (0..5).map(|w| (1, w + 1)).collect();
        assert!((weighted_boundary_length(&line, (3, 7)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_disk_perimeter_close_to_circumference() {
        let (px, shape) = disk(20);
        let p = weighted_boundary_length(&px, shape);
        let circumference = 2.0 * std::f64::consts::PI * 20.0;
        assert!((p - circumference).abs() / circumference < 0.06, "p = {p}");
    }
}
