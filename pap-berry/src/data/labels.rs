//! 连通分量标记图.

use super::Mask;
use crate::neighbour::n8_positions;
use crate::{ComponentId, Idx2d};
use ndarray::{Array2, ArrayView2};
use std::collections::VecDeque;

/// 连通分量标记图. 每个 8-连通的前景像素集合被分配一个唯一正整数编号,
/// `0` 代表背景.
///
/// 编号按行优先扫描中首次遇到该分量的先后顺序, 从 1 开始连续分配.
/// 被 [`LabelMap::remove_small`] 移除的分量保留其编号空位, 不重新编号.
#[derive(Clone, Debug)]
pub struct LabelMap {
    data: Array2<ComponentId>,

    /// `areas[id - 1]` 为编号 `id` 的分量面积. 已移除的分量面积为 0.
    areas: Vec<usize>,
}

impl LabelMap {
    /// 按照 8-相邻规则标记 `mask` 的所有前景连通分量.
    ///
    /// 两个像素 `p1` 和 `p2` 属于同一个分量, 当且仅当存在一条从 `p1` 到 `p2`
    /// 的 8-相邻路径, 且路径上的所有像素都是前景.
    pub fn label(mask: &Mask) -> Self {
        let shape = mask.shape();
        let mut data = Array2::<ComponentId>::zeros(shape);
        let mut areas = Vec::with_capacity(4);
        let mut bfs_q = VecDeque::with_capacity(16);

        for seed in mask.foreground() {
            if data[seed] != 0 {
                continue;
            }
            let id = areas.len() as ComponentId + 1;
            let mut area = 0usize;
            data[seed] = id;
            bfs_q.push_back(seed);
            while let Some(cur) = bfs_q.pop_front() {
                area += 1;
                for neigh in n8_positions(cur, shape) {
                    if data[neigh] == 0 && mask.get(neigh) == Some(true) {
                        data[neigh] = id;
                        bfs_q.push_back(neigh);
                    }
                }
            }
            areas.push(area);
        }
        Self { data, areas }
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<ComponentId> {
        self.data.view()
    }

    /// 标记图的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获取给定位置的编号. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<ComponentId> {
        self.data.get(pos).copied()
    }

    /// 编号为 `id` 的分量面积. 不存在或已移除时为 0.
    #[inline]
    pub fn area(&self, id: ComponentId) -> usize {
        match id {
            0 => 0,
            id => self.areas.get(id as usize - 1).copied().unwrap_or(0),
        }
    }

    /// 以升序获取所有现存分量的编号.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.areas
            .iter()
            .enumerate()
            .filter_map(|(idx, &area)| (area > 0).then_some(idx as ComponentId + 1))
    }

    /// 现存分量的个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids().count()
    }

    /// 是否不存在任何分量.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 将面积严格小于 `min_area` 的分量涂为背景. 返回被移除的分量个数.
    pub fn remove_small(&mut self, min_area: usize) -> usize {
        let mut removed = 0;
        for area in self.areas.iter_mut().filter(|a| **a > 0 && **a < min_area) {
            *area = 0;
            removed += 1;
        }
        if removed > 0 {
            let areas = &self.areas;
            self.data
                .iter_mut()
                .filter(|id| **id != 0 && areas[**id as usize - 1] == 0)
                .for_each(|id| *id = 0);
        }
        removed
    }

    /// 面积最大的分量编号. 面积相同时取编号最小者. 不存在分量时返回 `None`.
    pub fn largest(&self) -> Option<ComponentId> {
        let mut best: Option<(ComponentId, usize)> = None;
        for id in self.ids() {
            let area = self.area(id);
            if best.map_or(true, |(_, a)| area > a) {
                best = Some((id, area));
            }
        }
        best.map(|(id, _)| id)
    }

    /// 以行优先规则, 获取编号为 `id` 的分量的所有像素索引.
    pub fn pixels(&self, id: ComponentId) -> impl Iterator<Item = Idx2d> + '_ {
        self.data
            .indexed_iter()
            .filter_map(move |(pos, &v)| (id != 0 && v == id).then_some(pos))
    }

    /// 位置 `pos` 是否属于分量 `id`. 越界时返回 `false`.
    #[inline]
    pub fn contains(&self, pos: Idx2d, id: ComponentId) -> bool {
        id != 0 && self.get(pos) == Some(id)
    }

    /// 编号为 `id` 的分量单独构成的 mask.
    pub fn component_mask(&self, id: ComponentId) -> Mask {
        Mask::from_array(self.data.map(|&v| id != 0 && v == id))
    }

    /// 所有现存分量构成的 mask.
    pub fn foreground_mask(&self) -> Mask {
        Mask::from_array(self.data.map(|&v| v != 0))
    }
}
