//! 错误类型（模块）
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// 核心库统一错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 采样源文件不存在
    #[error("source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// 采样源文件读取失败（权限、非 UTF-8 内容等）
    #[error("failed to read {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 第 `line` 行（从 1 开始）不是合法 JSON
    #[error("invalid JSON on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// 目标文件无法创建或写入
    #[error("failed to write {}: {source}", path.display())]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept connection: {source}")]
    Accept {
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 写出 JSON 时的错误：底层 IO 失败归为 `Io`，便于调用方映射到目标文件
    pub(crate) fn from_json_write(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::Io(io::Error::from(e))
        } else {
            Error::Json(e)
        }
    }
}
