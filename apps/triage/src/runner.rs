//! 分割策略对比.

use crate::profile::Profile;
use crate::result::CompareResult;
use anyhow::anyhow;
use pap_berry::{Pipeline, SegmenterKind};
use std::path::PathBuf;
use std::thread;

/// 以 `kind` 策略依次处理 `images`, 统计耗时与失败阶段.
fn profile(kind: SegmenterKind, images: &[PathBuf]) -> Profile {
    let pipeline = Pipeline::new(kind);
    let mut p = Profile::new();
    for path in images {
        p.task_start();
        let r = pipeline.run(path);
        p.task_elapsed(path);
        match r {
            Ok(_) => p.count_success(),
            Err(e) => {
                log::debug!("{}: {e}", path.display());
                p.count_failure(e.stage());
            }
        }
    }
    p.finish()
}

/// 两种分割策略各占一个线程, 同时处理全部 `images`.
pub fn compare(images: &[PathBuf]) -> anyhow::Result<CompareResult> {
    log::info!(
        "Comparing segmenters on {} images ({} cpus)",
        images.len(),
        utils::cpus()
    );
    thread::scope(|s| {
        let handles = [SegmenterKind::intensity(), SegmenterKind::color()]
            .map(|k| (k.name(), s.spawn(move || profile(k, images))));

        let mut data = Vec::with_capacity(handles.len());
        for (name, th) in handles {
            let p = th
                .join()
                .map_err(|_| anyhow!("the {name} segmenter thread panicked"))?;
            data.push((name, p));
        }
        Ok(CompareResult::from_iter(data))
    })
}
