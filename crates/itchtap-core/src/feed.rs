//! 行情接收主流程：TCP 接入 → 分帧 → 解码 → JSONL 写出
use std::fs::File;
use std::io::{self, LineWriter, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::framing::{FrameBuffer, INITIAL_BUFFER_CAP};
use crate::messages::{expected_len, Message};
use crate::options::FeedStats;

/// 单次读取的字节数
pub(crate) const RECV_CHUNK: usize = 8192;

/// 从 `reader` 读取分帧的 ITCH 流，每条已知消息写出一行 JSON 到 `out`
///
/// 读到 EOF 即结束；读取出错时记录告警并按已接收的数据收尾（不视为失败）。
/// 写出失败会直接返回错误。
pub fn parse_stream(reader: &mut dyn Read, out: &mut dyn Write) -> Result<FeedStats> {
    let mut frames = FrameBuffer::with_capacity(INITIAL_BUFFER_CAP);
    let mut chunk = [0u8; RECV_CHUNK];
    let mut stats = FeedStats::default();

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "receive error, finishing with data received so far");
                break;
            }
        };
        frames.extend(&chunk[..n]);
        while let Some(payload) = frames.next_frame() {
            write_payload(payload, out, &mut stats)?;
        }
        frames.compact();
    }

    stats.trailing_bytes = frames.remaining();
    if stats.trailing_bytes > 0 {
        warn!(trailing_bytes = stats.trailing_bytes, "trailing bytes left unparsed");
    }
    out.flush()?;
    Ok(stats)
}

fn write_payload(payload: &[u8], out: &mut dyn Write, stats: &mut FeedStats) -> Result<()> {
    let code = payload[0];
    if let Some(len) = expected_len(code) {
        if len != payload.len() {
            stats.length_mismatches += 1;
            debug!(code = %(code as char), expected = len, actual = payload.len(), "length mismatch");
        }
    }

    match Message::decode(payload) {
        Some(msg) => {
            trace!(code = %(code as char), timestamp = msg.header().timestamp, "decoded");
            serde_json::to_writer(&mut *out, &msg).map_err(Error::from_json_write)?;
            out.write_all(b"\n")?;
            stats.messages_parsed += 1;
        }
        None => stats.unknown_messages += 1,
    }
    Ok(())
}

/// 绑定 0.0.0.0:`port`；端口为 0 时由系统分配
pub fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr).map_err(|source| Error::Bind { addr, source })
}

/// 接受一个客户端连接，解析其全部数据写入 `output`（截断已有文件）
pub fn serve_one(listener: &TcpListener, output: &Path) -> Result<FeedStats> {
    let (mut stream, peer) = listener.accept().map_err(|source| Error::Accept { source })?;
    info!(%peer, "client connected");

    let file = File::create(output).map_err(|source| Error::DestinationWrite {
        path: output.to_path_buf(),
        source,
    })?;
    // 按行刷新，消费方可以边接收边读取
    let mut out = LineWriter::new(file);

    let stats = parse_stream(&mut stream, &mut out).map_err(|e| match e {
        Error::Io(source) => Error::DestinationWrite { path: output.to_path_buf(), source },
        other => other,
    })?;
    info!(
        messages_parsed = stats.messages_parsed,
        unknown_messages = stats.unknown_messages,
        length_mismatches = stats.length_mismatches,
        "stream finished"
    );
    Ok(stats)
}
