//! 细胞图像及其派生数组: 二值 mask 与连通分量标记图.
//!
//! 这些对象都按请求新建, 不跨请求缓存.

mod cell;
mod labels;
mod mask;

pub use cell::CellImage;
pub use labels::LabelMap;
pub use mask::Mask;
