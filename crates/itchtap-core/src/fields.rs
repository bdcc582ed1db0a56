//! 大端整数读取与字段类型（价格、字母字段）
use serde::{Serialize, Serializer};

/// 价格的隐含小数位：原始值为 价格 × 10^4
pub(crate) const PRICE_SCALE: u32 = 10_000;

// 以下读取函数假定调用方已校验 payload 长度

pub(crate) fn read_u16(p: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([p[at], p[at + 1]])
}

pub(crate) fn read_u32(p: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([p[at], p[at + 1], p[at + 2], p[at + 3]])
}

/// 6 字节大端整数（ITCH 时间戳，自午夜起的纳秒数）
pub(crate) fn read_u48(p: &[u8], at: usize) -> u64 {
    let mut b = [0u8; 8];
    b[2..].copy_from_slice(&p[at..at + 6]);
    u64::from_be_bytes(b)
}

pub(crate) fn read_u64(p: &[u8], at: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&p[at..at + 8]);
    u64::from_be_bytes(b)
}

/// 单字节标志位（如买卖方向、事件码）
pub(crate) fn read_flag(p: &[u8], at: usize) -> char {
    p[at] as char
}

/// 四位隐含小数的价格
///
/// 序列化为 JSON 数字：小数部分为 0 时输出整数（`100`），否则输出最短十进制（`123.45`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(pub u32);

impl Price {
    pub(crate) fn read(p: &[u8], at: usize) -> Self {
        Price(read_u32(p, at))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % PRICE_SCALE == 0 {
            serializer.serialize_u32(self.0 / PRICE_SCALE)
        } else {
            // IEEE 除法正确舍入，最短表示即原十进制值
            serializer.serialize_f64(f64::from(self.0) / f64::from(PRICE_SCALE))
        }
    }
}

/// 定长字母字段（左对齐、右补空格），输出时去掉尾部空格
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Alpha(pub String);

impl Alpha {
    pub(crate) fn read(p: &[u8], at: usize, width: usize) -> Self {
        let raw = &p[at..at + width];
        let end = raw.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
        // 按字节映射为字符，非 ASCII 字节不会导致解码失败
        Alpha(raw[..end].iter().map(|&b| b as char).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
