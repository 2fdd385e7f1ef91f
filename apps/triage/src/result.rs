//! 对比结果.

use crate::profile::Profile;
use std::io::{self, Write};

/// 将 `p` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.1}"),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Images processed: {}", p.get_processed())?;
    writeln!(w, "{S4}Succeeded: {}", p.get_succeeded())?;
    for (stage, n) in p.failures() {
        writeln!(w, "{S4}Failed at {stage}: {n}")?;
    }
    writeln!(w, "{S4}Total task time: {} us", p.get_task_time_us())?;
    writeln!(
        w,
        "{S4}Average task time: {} us",
        f64_to_display(p.get_avg_task_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    match p.get_slowest() {
        Some((d, path)) => write!(
            w,
            "{S4}Slowest image `{}` costs {} us",
            path.display(),
            d.as_micros()
        )?,
        None => write!(w, "{S4}Slowest image: /")?,
    }
    Ok(())
}

/// 对比最终结果.
pub struct CompareResult {
    data: Vec<(&'static str, Profile)>,
}

impl CompareResult {
    pub fn from_iter<I: IntoIterator<Item = (&'static str, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 将全部统计写进 `w` 中.
    pub fn report<W: Write>(&self, mut w: W) -> io::Result<()> {
        utils::sep_to(&mut w)?;
        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut w)?;
            writeln!(w)?;
            utils::sep_to(&mut w)?;
        }
        Ok(())
    }
}
