//! 分割策略运行统计.

use pap_berry::Stage;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 可累加的计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时 (`self.start()`).
    #[inline]
    fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 获得总共累计下来的时间 (以微秒为单位).
    #[inline]
    fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

/// 处理阶段在统计数组中的位置.
const STAGES: [Stage; 4] = [Stage::Load, Stage::Segment, Stage::Analyze, Stage::Compose];

#[inline]
fn stage_index(stage: Stage) -> usize {
    match stage {
        Stage::Load => 0,
        Stage::Segment => 1,
        Stage::Analyze => 2,
        Stage::Compose => 3,
    }
}

/// 单个分割策略的数据统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 成功提取特征的图片个数.
    succeeded: u64,

    /// 各阶段失败的图片个数, 顺序同 [`STAGES`].
    failures: [u64; 4],

    /// 处理图片花费的总时间.
    task_time: AccTimer,

    /// 整个任务花费的总时间.
    real_time: AccTimer,

    /// 最耗时的一张图片及其耗时.
    slowest: Option<(Duration, PathBuf)>,
}

impl Profile {
    /// 初始化. 同时开始计算总时间.
    #[inline]
    pub fn new() -> Self {
        Self {
            succeeded: 0,
            failures: [0; 4],
            task_time: AccTimer::new(),
            real_time: AccTimer::new(),
            slowest: None,
        }
    }

    /// 开始一张图片的计时.
    #[inline]
    pub fn task_start(&mut self) {
        self.task_time.start();
    }

    /// 结束 `path` 这张图片的计时.
    #[inline]
    pub fn task_elapsed(&mut self, path: &Path) {
        let d = self.task_time.elapsed();
        self.observe(d, path);
    }

    fn observe(&mut self, d: Duration, path: &Path) {
        if self.slowest.as_ref().map_or(true, |(most, _)| d > *most) {
            self.slowest = Some((d, path.to_path_buf()));
        }
    }

    /// 记录一次成功.
    #[inline]
    pub fn count_success(&mut self) {
        self.succeeded += 1;
    }

    /// 记录一次在 `stage` 阶段的失败.
    #[inline]
    pub fn count_failure(&mut self, stage: Stage) {
        self.failures[stage_index(stage)] += 1;
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 获得成功个数.
    #[inline]
    pub fn get_succeeded(&self) -> u64 {
        self.succeeded
    }

    /// 获得 `stage` 阶段的失败个数.
    #[inline]
    pub fn get_failures(&self, stage: Stage) -> u64 {
        self.failures[stage_index(stage)]
    }

    /// 按阶段迭代失败个数.
    pub fn failures(&self) -> impl Iterator<Item = (Stage, u64)> + '_ {
        STAGES.into_iter().zip(self.failures.iter().copied())
    }

    /// 获得已处理的图片总数.
    #[inline]
    pub fn get_processed(&self) -> u64 {
        self.succeeded + self.failures.iter().sum::<u64>()
    }

    /// 以微秒为单位获得处理图片的总时间.
    #[inline]
    pub fn get_task_time_us(&self) -> u64 {
        self.task_time.get_total_us()
    }

    /// 以微秒为单位获得总自然时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以微秒为单位获得每张图片的平均处理时间. 未处理任何图片时返回 `None`.
    pub fn get_avg_task_time_us(&self) -> Option<f64> {
        match self.get_processed() {
            0 => None,
            n => Some(self.get_task_time_us() as f64 / n as f64),
        }
    }

    /// 获得最耗时的图片及其耗时. 未处理任何图片时返回 `None`.
    pub fn get_slowest(&self) -> Option<(Duration, &Path)> {
        self.slowest.as_ref().map(|(d, p)| (*d, p.as_path()))
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
