//! Metrics Parser - 从 worker 输出中提取性能指标
//!
//! worker 在 stdout 打印形如 `SERIAL done. Time(s)=0.12 Throughput(MB/s)=85.3` 的行，
//! 两个字段在行内的先后顺序不固定。

use serde::Serialize;

const TIME_MARKER: &str = "Time(s)";
const THROUGHPUT_MARKER: &str = "Throughput(MB/s)";

/// 单次执行的性能指标
///
/// 解析不到时为 (0.0, 0.0)，这只表示数据缺失而不是错误
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Metrics {
    /// 耗时（秒）
    pub elapsed_secs: f64,
    /// 吞吐量（MB/s）
    pub throughput_mbps: f64,
}

impl Metrics {
    /// 逐行扫描输出文本，最后一个合法的指标行生效
    pub fn parse(output: &str) -> Self {
        output
            .lines()
            .filter(|line| {
                line.contains(&format!("{}=", TIME_MARKER))
                    && line.contains(&format!("{}=", THROUGHPUT_MARKER))
            })
            .filter_map(parse_line)
            .last()
            .unwrap_or_default()
    }
}

/// 解析单行；任一数值非法时整行作废，不影响之前累积的结果
fn parse_line(line: &str) -> Option<Metrics> {
    let normalized = line.replace('=', " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    let value_after = |marker: &str| -> Option<f64> {
        let pos = tokens.iter().position(|t| *t == marker)?;
        let value: f64 = tokens.get(pos + 1)?.parse().ok()?;
        (value.is_finite() && value >= 0.0).then_some(value)
    };

    Some(Metrics {
        elapsed_secs: value_after(TIME_MARKER)?,
        throughput_mbps: value_after(THROUGHPUT_MARKER)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_metrics_line() {
        assert_eq!(Metrics::parse(""), Metrics::default());
        assert_eq!(
            Metrics::parse("MPI done. Empty file.\nnothing to see"),
            Metrics::default()
        );
    }

    #[test]
    fn test_single_line() {
        let m = Metrics::parse("SERIAL done. Time(s)=0.25 Throughput(MB/s)=40.5\n");
        assert_eq!(m.elapsed_secs, 0.25);
        assert_eq!(m.throughput_mbps, 40.5);
    }

    #[test]
    fn test_tokens_in_reverse_order() {
        let m = Metrics::parse("Throughput(MB/s)=12 Time(s)=3.5");
        assert_eq!(m.elapsed_secs, 3.5);
        assert_eq!(m.throughput_mbps, 12.0);
    }

    #[test]
    fn test_last_match_wins() {
        let text = "rank 0 Time(s)=1.0 Throughput(MB/s)=10.0\n\
                    warmup\n\
                    MPI done. Processes=4 Time(s)=2.0 Throughput(MB/s)=20.0";
        let m = Metrics::parse(text);
        assert_eq!(m.elapsed_secs, 2.0);
        assert_eq!(m.throughput_mbps, 20.0);
    }

    #[test]
    fn test_malformed_line_does_not_corrupt_previous_match() {
        let text = "OPENMP done. Time(s)=0.5 Throughput(MB/s)=99.0\n\
                    Time(s)=notanumber Throughput(MB/s)=1.0\n\
                    Time(s)=1.0 Throughput(MB/s)=\n\
                    Time(s)=-3 Throughput(MB/s)=1.0";
        let m = Metrics::parse(text);
        assert_eq!(m.elapsed_secs, 0.5);
        assert_eq!(m.throughput_mbps, 99.0);
    }

    #[test]
    fn test_line_with_only_one_marker_is_ignored() {
        let m = Metrics::parse("Time(s)=4.0\nThroughput(MB/s)=8.0");
        assert_eq!(m, Metrics::default());
    }
}
