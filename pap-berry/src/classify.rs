//! 高/低风险分类器接口.
//!
//! 本 crate 不负责训练或加载模型, 只定义分类器的输入 ([`FeatureVector`])
//! 与输出 ([`Prediction`]). [`LogisticRegression`] 是一个只读的线性模型,
//! 可由调用方从 JSON 等格式反序列化得到.

use crate::consts::FEATURE_LEN;
use crate::error::PipelineError;
use crate::{Extraction, FeatureVector, Pipeline};
use std::fmt;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 风险类别.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum RiskClass {
    /// 低风险.
    Low = 0,

    /// 高风险.
    High = 1,
}

impl RiskClass {
    /// 类别编号.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// 是否为高风险.
    #[inline]
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low Risk (Class {})", self.code()),
            Self::High => write!(f, "High Risk (Class {})", self.code()),
        }
    }
}

/// 一次预测.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Prediction {
    /// 预测类别.
    pub class: RiskClass,

    /// 预测类别的概率. 分类器不提供概率时为 `None`.
    pub probability: Option<f64>,
}

/// 风险分类器.
pub trait Classifier {
    /// 对特征向量 `features` 给出预测.
    fn predict(&self, features: &FeatureVector) -> Prediction;
}

/// 逻辑回归模型: `p(High) = sigmoid(w · x + b)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LogisticRegression {
    /// 权重, 顺序与 [`crate::FeatureName::ALL`] 一致.
    pub coefficients: [f64; FEATURE_LEN],

    /// 截距.
    pub intercept: f64,
}

impl LogisticRegression {
    /// 初始化.
    #[inline]
    pub fn new(coefficients: [f64; FEATURE_LEN], intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// 线性部分 `w · x + b`.
    pub fn decision(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_array())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    /// 高风险的概率.
    #[inline]
    pub fn probability_high(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.decision(features))
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Prediction {
        let p = self.probability_high(features);
        let (class, probability) = if p >= 0.5 {
            (RiskClass::High, p)
        } else {
            (RiskClass::Low, 1.0 - p)
        };
        Prediction {
            class,
            probability: Some(probability),
        }
    }
}

/// 特征提取与预测的结果.
#[derive(Clone, Debug)]
pub struct Assessment {
    /// 提取结果.
    pub extraction: Extraction,

    /// 预测.
    pub prediction: Prediction,
}

/// 用 `pipeline` 处理 `path` 处的图像, 并交由 `classifier` 预测.
pub fn assess<C, P>(
    pipeline: &Pipeline,
    classifier: &C,
    path: P,
) -> Result<Assessment, PipelineError>
where
    C: Classifier + ?Sized,
    P: AsRef<Path>,
{
    let extraction = pipeline.run(path)?;
    let prediction = classifier.predict(&extraction.features);
    log::debug!("Prediction: {prediction:?}");
    Ok(Assessment {
        extraction,
        prediction,
    })
}
