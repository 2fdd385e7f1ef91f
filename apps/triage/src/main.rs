//! 宫颈细胞图像风险分诊.
//!
//! 对每张图像提取 13 维特征, 若能找到分类模型则同时给出风险预测.

mod profile;
mod result;
mod runner;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use pap_berry::{Classifier, Extraction, LogisticRegression, Pipeline, Prediction, SegmenterKind};
use simple_logger::SimpleLogger;
use std::fs;
use std::path::{Path, PathBuf};
use utils::loader;

/// 分割方式.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Mode {
    /// 灰度阈值.
    Intensity,
    /// 颜色范围.
    Color,
    /// 同时运行两种策略并对比耗时.
    Compare,
}

/// Extract morphological features from cervical cell images and triage them.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Image files or directories of images (jpg, jpeg, png, bmp).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Segmentation strategy.
    #[arg(short, long, value_enum, default_value_t = Mode::Intensity)]
    segmenter: Mode,

    /// Directory to write `<stem>_nucleus.png` and `<stem>_cytoplasm.png` into.
    #[arg(long, value_name = "DIR")]
    masks: Option<PathBuf>,

    /// Print features as JSON.
    #[arg(long)]
    json: bool,

    /// Logistic model (JSON). Defaults to `$PAP_BERRY_MODEL` or `~/.pap-berry/model.json`.
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// 加载分类模型.
///
/// 显式指定的路径必须可用; 默认路径不存在时返回 `None`.
fn load_model(explicit: Option<&Path>) -> anyhow::Result<Option<LogisticRegression>> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match loader::model_path_from_env_or_home() {
            Some(p) if p.is_file() => p,
            _ => {
                log::warn!("No classifier model found, only features will be reported");
                return Ok(None);
            }
        },
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("cannot read model `{}`", path.display()))?;
    let model = serde_json::from_str(&text)
        .with_context(|| format!("invalid model `{}`", path.display()))?;
    log::info!("Loaded classifier model from `{}`", path.display());
    Ok(Some(model))
}

/// 细胞核与细胞质 mask 的输出路径.
fn mask_paths(dir: &Path, image: &Path) -> (PathBuf, PathBuf) {
    let stem = loader::file_stem(image);
    (
        dir.join(format!("{stem}_nucleus.png")),
        dir.join(format!("{stem}_cytoplasm.png")),
    )
}

fn save_masks(dir: &Path, image: &Path, e: &Extraction) -> anyhow::Result<()> {
    let (nucleus, cytoplasm) = mask_paths(dir, image);
    e.nucleus_mask
        .save(&nucleus)
        .with_context(|| format!("cannot write `{}`", nucleus.display()))?;
    e.cytoplasm_mask
        .save(&cytoplasm)
        .with_context(|| format!("cannot write `{}`", cytoplasm.display()))?;
    Ok(())
}

/// 预测结果的文字描述.
fn prediction_lines(p: &Prediction) -> Vec<String> {
    let mut lines = vec![format!("Prediction: {}", p.class)];
    if let Some(prob) = p.probability {
        lines.push(format!("Confidence: {:.1}%", prob * 100.0));
    }
    lines
}

fn print_text(image: &Path, e: &Extraction, prediction: Option<&Prediction>) {
    utils::sep();
    println!("Image: {}", image.display());
    print!("{}", e.features);
    for line in prediction.map(prediction_lines).unwrap_or_default() {
        println!("{line}");
    }
}

fn print_json(
    image: &Path,
    e: &Extraction,
    prediction: Option<&Prediction>,
) -> anyhow::Result<()> {
    let value = serde_json::json!({
        "image": image.display().to_string(),
        "features": e.features,
        "prediction": prediction,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// 以单一策略处理全部图像. 返回失败的图像个数.
fn triage(args: &Args, kind: SegmenterKind, images: &[PathBuf]) -> anyhow::Result<usize> {
    let model = load_model(args.model.as_deref())?;
    if let Some(dir) = &args.masks {
        fs::create_dir_all(dir).with_context(|| format!("cannot create `{}`", dir.display()))?;
    }

    let pipeline = Pipeline::new(kind);
    let mut failed = 0;
    for (image, r) in images.iter().zip(pipeline.run_batch(images)) {
        let e = match r {
            Ok(e) => e,
            Err(err) => {
                log::error!("{}: {err}", image.display());
                failed += 1;
                continue;
            }
        };
        let prediction = model.as_ref().map(|m| m.predict(&e.features));
        if let Some(dir) = &args.masks {
            save_masks(dir, image, &e)?;
        }
        if args.json {
            print_json(image, &e, prediction.as_ref())?;
        } else {
            print_text(image, &e, prediction.as_ref());
        }
    }
    Ok(failed)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(level(args.verbose))
        .env()
        .init()?;

    let images = loader::discover_images(&args.inputs)?;
    if images.is_empty() {
        bail!("no images found");
    }
    log::info!("Found {} images", images.len());

    let kind = match args.segmenter {
        Mode::Intensity => SegmenterKind::intensity(),
        Mode::Color => SegmenterKind::color(),
        Mode::Compare => {
            let r = runner::compare(&images)?;
            r.report(std::io::stdout().lock())?;
            return Ok(());
        }
    };

    let failed = triage(&args, kind, &images)?;
    if failed > 0 {
        bail!("{failed} of {} images failed", images.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pap_berry::RiskClass;

    #[test]
    fn test_prediction_lines() {
        let p = Prediction {
            class: RiskClass::High,
            probability: Some(0.8734),
        };
        assert_eq!(
            prediction_lines(&p),
            ["Prediction: High Risk (Class 1)", "Confidence: 87.3%"]
        );
        let p = Prediction {
            class: RiskClass::Low,
            probability: None,
        };
        assert_eq!(prediction_lines(&p), ["Prediction: Low Risk (Class 0)"]);
    }

    #[test]
    fn test_mask_paths() {
        let (n, c) = mask_paths(Path::new("out"), Path::new("data/cell_07.jpg"));
        assert_eq!(n, Path::new("out/cell_07_nucleus.png"));
        assert_eq!(c, Path::new("out/cell_07_cytoplasm.png"));
    }

    #[test]
    fn test_args() {
        let args =
            Args::try_parse_from(["triage", "-s", "compare", "--json", "-vv", "a.png"]).unwrap();
        assert_eq!(args.segmenter, Mode::Compare);
        assert!(args.json);
        assert_eq!(level(args.verbose), LevelFilter::Debug);
        assert!(Args::try_parse_from(["triage"]).is_err());
    }

    #[test]
    fn test_explicit_model_must_exist() {
        let missing = std::env::temp_dir().join("pap-berry-no-such-model.json");
        assert!(load_model(Some(missing.as_path())).is_err());
    }
}
