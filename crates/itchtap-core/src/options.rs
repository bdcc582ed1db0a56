//! 监听选项与统计信息（模块）
use std::fmt;
use std::path::PathBuf;

/// 默认的 JSONL 输出路径（亦为采样的源文件）
pub const DEFAULT_FEED_OUTPUT: &str = "out/parsed.jsonl";

/// 行情接收选项
#[derive(Debug, Clone)]
pub struct ListenOptions {
    /// 监听端口（绑定 0.0.0.0）
    pub port: u16,
    /// JSONL 输出文件；已存在则截断，父目录不会自动创建
    pub output: PathBuf,
}

/// 解析统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedStats {
    /// 成功解码并写出的消息数
    pub messages_parsed: usize,
    /// 未知类型或长度不足、无法解码的消息数
    pub unknown_messages: usize,
    /// 已知类型但长度与规范不一致的消息数（仍可能被解码）
    pub length_mismatches: usize,
    /// 流结束时缓冲区中残留的未成帧字节数
    pub trailing_bytes: usize,
}

/// 采样结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleReport {
    pub records_written: usize,
    pub destination: PathBuf,
}

/// CLI 输出的摘要行：`Wrote {count} records to {destination}`
impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrote {} records to {}", self.records_written, self.destination.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_report_summary_line() {
        let report = SampleReport {
            records_written: 2,
            destination: PathBuf::from("out/parsed_sample.json"),
        };
        assert_eq!(report.to_string(), "Wrote 2 records to out/parsed_sample.json");
    }

    #[test]
    fn sample_report_summary_line_for_empty_sample() {
        let report = SampleReport {
            records_written: 0,
            destination: PathBuf::from("out/parsed_sample.json"),
        };
        assert_eq!(report.to_string(), "Wrote 0 records to out/parsed_sample.json");
    }
}
