//! 特征合成.
//!
//! 由细胞核与细胞质的区域属性派生出固定顺序的 13 维特征向量.
//! 下游分类器的输入顺序依赖于 [`FeatureName::ALL`], 不可改变.

use crate::consts::FEATURE_LEN;
use crate::error::FeatureError;
use crate::{Region, RegionProperties};
use std::f64::consts::PI;
use std::fmt;

/// 特征名.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FeatureName {
    /// 细胞核面积.
    NucleusArea,
    /// 细胞质面积.
    CytoplasmArea,
    /// 核质面积比.
    AreaRatio,
    /// 细胞核短轴长度.
    NucleusMinorAxis,
    /// 细胞质短轴长度.
    CytoplasmMinorAxis,
    /// 细胞核长轴长度.
    NucleusMajorAxis,
    /// 细胞质长轴长度.
    CytoplasmMajorAxis,
    /// 细胞核伸长度.
    NucleusElongation,
    /// 细胞核圆度.
    NucleusRoundness,
    /// 细胞质圆度.
    CytoplasmRoundness,
    /// 细胞质伸长度.
    CytoplasmElongation,
    /// 细胞核周长.
    NucleusPerimeter,
    /// 细胞质周长.
    CytoplasmPerimeter,
}

impl FeatureName {
    /// 规范顺序.
    pub const ALL: [FeatureName; FEATURE_LEN] = [
        Self::NucleusArea,
        Self::CytoplasmArea,
        Self::AreaRatio,
        Self::NucleusMinorAxis,
        Self::CytoplasmMinorAxis,
        Self::NucleusMajorAxis,
        Self::CytoplasmMajorAxis,
        Self::NucleusElongation,
        Self::NucleusRoundness,
        Self::CytoplasmRoundness,
        Self::CytoplasmElongation,
        Self::NucleusPerimeter,
        Self::CytoplasmPerimeter,
    ];

    /// 在规范顺序中的位置.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 展示用名称.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NucleusArea => "Nucleus Area",
            Self::CytoplasmArea => "Cytoplasm Area",
            Self::AreaRatio => "Nucleus/Cytoplasm Area Ratio",
            Self::NucleusMinorAxis => "Nucleus Minor Axis Length",
            Self::CytoplasmMinorAxis => "Cytoplasm Minor Axis Length",
            Self::NucleusMajorAxis => "Nucleus Major Axis Length",
            Self::CytoplasmMajorAxis => "Cytoplasm Major Axis Length",
            Self::NucleusElongation => "Nucleus Elongation",
            Self::NucleusRoundness => "Nucleus Roundness",
            Self::CytoplasmRoundness => "Cytoplasm Roundness",
            Self::CytoplasmElongation => "Cytoplasm Elongation",
            Self::NucleusPerimeter => "Nucleus Perimeter",
            Self::CytoplasmPerimeter => "Cytoplasm Perimeter",
        }
    }

    /// 训练数据集中的列名.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NucleusArea => "Kerne_A",
            Self::CytoplasmArea => "Cyto_A",
            Self::AreaRatio => "K/C",
            Self::NucleusMinorAxis => "KerneShort",
            Self::CytoplasmMinorAxis => "CytoShort",
            Self::NucleusMajorAxis => "KerneLong",
            Self::CytoplasmMajorAxis => "CytoLong",
            Self::NucleusElongation => "KerneElong",
            Self::NucleusRoundness => "KerneRund",
            Self::CytoplasmRoundness => "CytoRund",
            Self::CytoplasmElongation => "CytoElong",
            Self::NucleusPerimeter => "KernePeri",
            Self::CytoplasmPerimeter => "CytoPeri",
        }
    }

    /// 按展示用名称查找.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl fmt::Display for FeatureName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 有序特征向量. 总是恰好包含 [`FeatureName::ALL`] 中的 13 项,
/// 每一项都是有限的非负实数.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_LEN],
}

impl FeatureVector {
    /// 获取某一项特征的值.
    #[inline]
    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    /// 以规范顺序迭代 `(特征名, 值)`.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ALL.into_iter().zip(self.values.iter().copied())
    }

    /// 以规范顺序获取特征名.
    #[inline]
    pub fn names(&self) -> [FeatureName; FEATURE_LEN] {
        FeatureName::ALL
    }

    /// 以规范顺序获取所有值, 即分类器输入.
    #[inline]
    pub fn as_array(&self) -> [f64; FEATURE_LEN] {
        self.values
    }

    /// 特征个数.
    #[inline]
    pub const fn len(&self) -> usize {
        FEATURE_LEN
    }

    /// 恒为 `false`.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for FeatureVector {
    /// 每行一项: `名称: 值`, 值保留 4 位小数.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{:<30}{value:.4}", format!("{name}:"))?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FeatureVector {
    /// 序列化为按规范顺序排列的 `{名称: 值}` 映射.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(FEATURE_LEN))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.label(), &value)?;
        }
        map.end()
    }
}

/// 伸长度: 长轴 / 短轴. 短轴为 0 时定义为 0.
#[inline]
pub fn elongation(props: &RegionProperties) -> f64 {
    ratio(props.major_axis, props.minor_axis)
}

/// 圆度: `4π · 面积 / 周长²`. 完美圆形为 1.0. 周长为 0 时定义为 0.
///
/// 在 [`crate::analyze`] 的周长估计下, 实心圆盘约为 0.91, 而边长小于 9 的
/// 实心正方形会大于 1.0. 结果不做截断.
#[inline]
pub fn roundness(props: &RegionProperties) -> f64 {
    if props.perimeter == 0.0 {
        return 0.0;
    }
    4.0 * PI * props.area as f64 / (props.perimeter * props.perimeter)
}

/// 核质面积比. 细胞质面积为 0 时定义为 0.
#[inline]
pub fn area_ratio(nucleus: &RegionProperties, cytoplasm: &RegionProperties) -> f64 {
    ratio(nucleus.area as f64, cytoplasm.area as f64)
}

#[inline]
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// 检查区域属性的浮点分量都为有限非负数.
fn validate(region: Region, props: &RegionProperties) -> Result<(), FeatureError> {
    let checks = [
        ("perimeter", props.perimeter),
        ("major axis length", props.major_axis),
        ("minor axis length", props.minor_axis),
    ];
    match checks.into_iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        Some((property, value)) => Err(FeatureError::InvalidProperty {
            region,
            property,
            value,
        }),
        None => Ok(()),
    }
}

/// 由两个区域的属性合成特征向量. 纯函数, 不修改输入.
///
/// 任一区域的属性为负数或非有限值时返回 `Err`, 不产生部分填充的向量.
pub fn compose(
    nucleus: &RegionProperties,
    cytoplasm: &RegionProperties,
) -> Result<FeatureVector, FeatureError> {
    validate(Region::Nucleus, nucleus)?;
    validate(Region::Cytoplasm, cytoplasm)?;

    let values = [
        nucleus.area as f64,
        cytoplasm.area as f64,
        area_ratio(nucleus, cytoplasm),
        nucleus.minor_axis,
        cytoplasm.minor_axis,
        nucleus.major_axis,
        cytoplasm.major_axis,
        elongation(nucleus),
        roundness(nucleus),
        roundness(cytoplasm),
        elongation(cytoplasm),
        nucleus.perimeter,
        cytoplasm.perimeter,
    ];
    debug_assert!(values.iter().all(|v| v.is_finite() && *v >= 0.0));
    Ok(FeatureVector { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use FeatureName::*;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_canonical_order() {
        let labels: Vec<&str> = FeatureName::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(
            labels,
            [
                "Nucleus Area",
                "Cytoplasm Area",
                "Nucleus/Cytoplasm Area Ratio",
                "Nucleus Minor Axis Length",
                "Cytoplasm Minor Axis Length",
                "Nucleus Major Axis Length",
                "Cytoplasm Major Axis Length",
                "Nucleus Elongation",
                "Nucleus Roundness",
                "Cytoplasm Roundness",
                "Cytoplasm Elongation",
                "Nucleus Perimeter",
                "Cytoplasm Perimeter",
            ]
        );
        for (i, f) in FeatureName::ALL.into_iter().enumerate() {
            assert_eq!(f.index(), i);
            assert_eq!(FeatureName::from_label(f.label()), Some(f));
        }
        assert_eq!(FeatureName::from_label("Volume"), None);
    }

    #[test]
    fn test_compose_values() {
        let n = RegionProperties::new(100, 40.0, 12.0, 8.0);
        let c = RegionProperties::new(400, 80.0, 30.0, 20.0);
        let v = compose(&n, &c).unwrap();
        assert!(f64_eq(v.get(NucleusArea), 100.0));
        assert!(f64_eq(v.get(CytoplasmArea), 400.0));
        assert!(f64_eq(v.get(AreaRatio), 0.25));
        assert!(f64_eq(v.get(NucleusMinorAxis), 8.0));
        assert!(f64_eq(v.get(CytoplasmMajorAxis), 30.0));
        assert!(f64_eq(v.get(NucleusElongation), 1.5));
        assert!(f64_eq(v.get(CytoplasmElongation), 1.5));
        assert!(f64_eq(v.get(NucleusRoundness), 4.0 * PI * 100.0 / 1600.0));
        assert!(f64_eq(v.get(CytoplasmPerimeter), 80.0));
        assert_eq!(v.iter().count(), 13);
        assert_eq!(v.as_array()[11], 40.0);
    }

    #[test]
    fn test_zero_guards() {
        let n = RegionProperties::new(50, 0.0, 5.0, 0.0);
        let c = RegionProperties::new(0, 0.0, 0.0, 0.0);
        let v = compose(&n, &c).unwrap();
        assert_eq!(v.get(AreaRatio), 0.0);
        assert_eq!(v.get(NucleusElongation), 0.0);
        assert_eq!(v.get(NucleusRoundness), 0.0);
        assert_eq!(v.get(CytoplasmRoundness), 0.0);
        assert!(v.iter().all(|(_, x)| x.is_finite() && x >= 0.0));
    }

    #[test]
    fn test_invalid_properties() {
        let good = RegionProperties::new(10, 10.0, 4.0, 3.0);
        let nan = RegionProperties::new(10, f64::NAN, 4.0, 3.0);
        let neg = RegionProperties::new(10, 10.0, 4.0, -1.0);

        let err = compose(&nan, &good).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidProperty {
                region: Region::Nucleus,
                property: "perimeter",
                ..
            }
        ));
        let err = compose(&good, &neg).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidProperty {
                region: Region::Cytoplasm,
                property: "minor axis length",
                ..
            }
        ));
    }

    #[test]
    fn test_display_lines() {
        let p = RegionProperties::new(4, 4.0, 2.0, 2.0);
        let text = compose(&p, &p).unwrap().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("Nucleus Area:"));
        assert!(lines[2].ends_with("1.0000"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_keeps_order() {
        let p = RegionProperties::new(4, 4.0, 2.0, 2.0);
        let json = serde_json::to_string(&compose(&p, &p).unwrap()).unwrap();
        let first = json.find("Nucleus Area").unwrap();
        let ratio = json.find("Nucleus/Cytoplasm Area Ratio").unwrap();
        let last = json.find("Cytoplasm Perimeter").unwrap();
        assert!(first < ratio && ratio < last);
    }
}
