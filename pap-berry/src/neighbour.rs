//! 像素邻域.

use crate::Idx2d;

/// 4-邻域偏移: 上, 下, 左, 右.
pub(crate) const N4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 对角偏移: 左上, 右上, 左下, 右下.
pub(crate) const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 求 `pos + delta`. 结果越出 `shape` (高, 宽) 时返回 `None`.
#[inline]
pub(crate) fn shifted(
    (h, w): Idx2d,
    (dh, dw): (isize, isize),
    (h_len, w_len): Idx2d,
) -> Option<Idx2d> {
    let h = h.checked_add_signed(dh)?;
    let w = w.checked_add_signed(dw)?;
    (h < h_len && w < w_len).then_some((h, w))
}

/// 获得 `pos` 的 8-邻域像素索引. 保证返回的索引都不越界.
#[inline]
pub(crate) fn n8_positions(pos: Idx2d, shape: Idx2d) -> impl Iterator<Item = Idx2d> {
    N4.into_iter()
        .chain(DIAGONAL)
        .filter_map(move |d| shifted(pos, d, shape))
}
