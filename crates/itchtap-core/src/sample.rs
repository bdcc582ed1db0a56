//! JSONL 头部采样：取前 50 条非空记录，写出为缩进的 JSON 数组
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::{SampleReport, DEFAULT_FEED_OUTPUT};

/// 采样条数上限（固定，不可配置）
pub const SAMPLE_LIMIT: usize = 50;
/// 采样源：即 `listen` 的默认输出
pub const DEFAULT_SOURCE: &str = DEFAULT_FEED_OUTPUT;
pub const DEFAULT_DESTINATION: &str = "out/parsed_sample.json";

/// 单条记录：任意 JSON 值，不做 schema 校验
/// （保留对象键顺序与超长整数的原始文本）
pub type Record = serde_json::Value;

/// 按输入顺序保存的采样结果，长度不超过 [`SAMPLE_LIMIT`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    records: Vec<Record>,
}

impl Sample {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// 逐行读取并解析，直到收满 [`SAMPLE_LIMIT`] 条
/// - 去掉首尾空白后为空的行直接跳过，不计入上限
/// - 收满后不再读取后续行（后续行即使不合法也不报错）
/// - 读取失败返回 `Error::Io`，解析失败返回带行号的 `Error::Parse`
pub fn take_sample<R: BufRead>(reader: R) -> Result<Sample> {
    let mut records = Vec::with_capacity(SAMPLE_LIMIT);
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Record = serde_json::from_str(trimmed)
            .map_err(|source| Error::Parse { line: idx + 1, source })?;
        records.push(value);
        if records.len() == SAMPLE_LIMIT {
            break;
        }
    }
    Ok(Sample { records })
}

/// 以两空格缩进写出 JSON 数组，末尾追加换行
pub fn write_sample(out: &mut dyn Write, sample: &Sample) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, sample.records()).map_err(Error::from_json_write)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// 完整采样流程：读取 `source`，写出到 `destination`（覆盖已有文件）
///
/// 全部解析完成后才创建目标文件，因此解析失败时不会留下输出文件。
/// 目标目录不存在时返回 `Error::DestinationWrite`，不会自动创建。
pub fn sample_file(source: &Path, destination: &Path) -> Result<SampleReport> {
    let file = File::open(source).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::SourceNotFound { path: source.to_path_buf() },
        _ => Error::SourceRead { path: source.to_path_buf(), source: e },
    })?;
    let sample = take_sample(BufReader::new(file)).map_err(|e| match e {
        Error::Io(e) => Error::SourceRead { path: source.to_path_buf(), source: e },
        other => other,
    })?;
    debug!(records = sample.len(), ?source, "sample collected");

    let to_dest_err = |e: io::Error| Error::DestinationWrite {
        path: destination.to_path_buf(),
        source: e,
    };
    let mut out = BufWriter::new(File::create(destination).map_err(to_dest_err)?);
    write_sample(&mut out, &sample).map_err(|e| match e {
        Error::Io(e) => to_dest_err(e),
        other => other,
    })?;

    Ok(SampleReport {
        records_written: sample.len(),
        destination: destination.to_path_buf(),
    })
}
