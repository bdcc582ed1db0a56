//! ITCH 行情解析与 JSONL 采样核心库
//!
//! 设计要点：
//! - 行情接收：单连接、同步阻塞读取，2 字节大端长度分帧，已知消息逐行写出 JSON。
//! - 未知类型与长度异常只计数不中断，流结束后输出统计。
//! - 采样：取 JSONL 前 50 条非空记录，整体解析成功后才写出缩进 JSON 数组。

mod error;
mod feed;
mod fields;
mod framing;
mod messages;
mod options;
mod sample;

pub use error::{Error, Result};
pub use feed::{bind, parse_stream, serve_one};
pub use fields::{Alpha, Price};
pub use messages::{
    expected_len, AddOrder, AddOrderMpid, CrossTrade, Header, Imbalance, Message, OrderCancel,
    OrderDelete, OrderExecuted, OrderExecutedWithPrice, OrderReplace, RegShoRestriction,
    SystemEvent, Trade,
};
pub use options::{FeedStats, ListenOptions, SampleReport, DEFAULT_FEED_OUTPUT};
pub use sample::{
    sample_file, take_sample, write_sample, Record, Sample, DEFAULT_DESTINATION, DEFAULT_SOURCE,
    SAMPLE_LIMIT,
};
