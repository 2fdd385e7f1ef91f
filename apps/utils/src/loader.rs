//! 模型路径解析与图像发现.

use pap_berry::consts::IMAGE_EXTENSIONS;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 模型路径环境变量.
pub const MODEL_ENV: &str = "PAP_BERRY_MODEL";

/// 获取 `$HOME` 下的某一路径. 无法确定用户目录时返回 `None`.
pub fn home_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.extend(it);
    Some(ans)
}

/// 获取分类模型路径.
///
/// 1. 若环境变量 `$PAP_BERRY_MODEL` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/.pap-berry/model.json`.
pub fn model_path_from_env_or_home() -> Option<PathBuf> {
    match env::var(MODEL_ENV) {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => home_dir_with([".pap-berry", "model.json"]),
    }
}

/// `path` 的扩展名是否为可加载的图像格式 (不区分大小写).
pub fn is_image<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// 展开输入路径.
///
/// 文件原样保留; 目录被替换为其中 (不递归) 所有图像文件, 按文件名排序.
pub fn discover_images<P: AsRef<Path>>(inputs: &[P]) -> io::Result<Vec<PathBuf>> {
    let mut ans = Vec::with_capacity(inputs.len());
    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            ans.push(input.to_path_buf());
            continue;
        }
        let mut found = fs::read_dir(input)?
            .map(|e| e.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        found.retain(|p| p.is_file() && is_image(p));
        found.sort();
        ans.extend(found);
    }
    Ok(ans)
}

/// 文件名主干, 用于派生输出文件名.
pub fn file_stem<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map_or_else(|| "image".to_string(), |s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image("a/b/cell.png"));
        assert!(is_image("cell.JPG"));
        assert!(is_image("cell.jpeg"));
        assert!(is_image("cell.bmp"));
        assert!(!is_image("cell.tiff"));
        assert!(!is_image("cell"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("/tmp/sample_01.png"), "sample_01");
        assert_eq!(file_stem(""), "image");
    }

    #[test]
    fn test_discover_images() {
        let dir = env::temp_dir().join(format!("pap-berry-utils-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for name in ["b.png", "a.jpg", "notes.txt"] {
            fs::write(dir.join(name), b"").unwrap();
        }
        fs::create_dir_all(dir.join("nested.png")).unwrap();

        let single = PathBuf::from("explicit.tiff");
        let found = discover_images(&[dir.clone(), single.clone()]).unwrap();
        assert_eq!(found, vec![dir.join("a.jpg"), dir.join("b.png"), single]);
    }
}
