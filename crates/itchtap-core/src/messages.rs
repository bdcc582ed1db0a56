//! ITCH 5.0 消息解码
//!
//! 每条消息的首字节为类型码，随后是定长大端字段。解码结果序列化为单行 JSON，
//! `type` 字段在最前，其后依次为公共头部与各类型专属字段。
use serde::Serialize;

use crate::fields::{read_flag, read_u16, read_u32, read_u48, read_u64, Alpha, Price};

/// 股票代码宽度
const STOCK_WIDTH: usize = 8;
/// MPID 归属宽度（F 消息）
const ATTRIBUTION_WIDTH: usize = 4;

/// 各类型消息的规范长度（含类型码）；未知类型返回 None
pub fn expected_len(code: u8) -> Option<usize> {
    match code {
        b'A' => Some(36),
        b'C' => Some(36),
        b'D' => Some(19),
        b'E' => Some(31),
        b'F' => Some(40),
        b'I' => Some(50),
        b'P' => Some(44),
        b'Q' => Some(40),
        b'S' => Some(12),
        b'U' => Some(35),
        b'X' => Some(23),
        b'Y' => Some(20),
        _ => None,
    }
}

/// 公共头部：定位码、追踪号、时间戳
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub stock_locate: u16,
    pub tracking_number: u16,
    pub timestamp: u64,
}

impl Header {
    fn read(p: &[u8]) -> Self {
        Self {
            stock_locate: read_u16(p, 1),
            tracking_number: read_u16(p, 3),
            timestamp: read_u48(p, 5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemEvent {
    #[serde(flatten)]
    pub header: Header,
    pub event_code: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOrder {
    #[serde(flatten)]
    pub header: Header,
    pub order_ref: u64,
    pub buy_sell: char,
    pub shares: u32,
    pub stock: Alpha,
    pub price: Price,
}

/// 带 MPID 归属的新增订单
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOrderMpid {
    #[serde(flatten)]
    pub header: Header,
    pub order_ref: u64,
    pub buy_sell: char,
    pub shares: u32,
    pub stock: Alpha,
    pub price: Price,
    pub attribution: Alpha,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderExecuted {
    #[serde(flatten)]
    pub header: Header,
    pub order_ref: u64,
    pub executed_shares: u32,
    pub match_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderExecutedWithPrice {
    #[serde(flatten)]
    pub header: Header,
    pub order_ref: u64,
    pub executed_shares: u32,
    pub match_number: u64,
    pub printable: char,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCancel {
    #[serde(flatten)]
    pub header: Header,
    pub order_ref: u64,
    pub canceled_shares: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDelete {
    #[serde(flatten)]
    pub header: Header,
    pub order_ref: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReplace {
    #[serde(flatten)]
    pub header: Header,
    pub original_ref: u64,
    pub new_ref: u64,
    pub shares: u32,
    pub price: Price,
}

/// 非显示订单成交
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    #[serde(flatten)]
    pub header: Header,
    pub order_ref: u64,
    pub buy_sell: char,
    pub shares: u32,
    pub stock: Alpha,
    pub price: Price,
    pub match_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTrade {
    #[serde(flatten)]
    pub header: Header,
    pub shares: u64,
    pub stock: Alpha,
    pub cross_price: Price,
    pub match_number: u64,
    pub cross_type: char,
}

/// 净订单失衡指示（NOII）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Imbalance {
    #[serde(flatten)]
    pub header: Header,
    pub paired_shares: u64,
    pub imbalance_shares: u64,
    pub imbalance_direction: char,
    pub stock: Alpha,
    pub far_price: Price,
    pub near_price: Price,
    pub current_ref_price: Price,
    pub cross_type: char,
    pub price_variation_indicator: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegShoRestriction {
    #[serde(flatten)]
    pub header: Header,
    pub stock: Alpha,
    pub reg_sho_action: char,
}

/// 已支持的消息类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "S")]
    SystemEvent(SystemEvent),
    #[serde(rename = "A")]
    AddOrder(AddOrder),
    #[serde(rename = "F")]
    AddOrderMpid(AddOrderMpid),
    #[serde(rename = "E")]
    OrderExecuted(OrderExecuted),
    #[serde(rename = "C")]
    OrderExecutedWithPrice(OrderExecutedWithPrice),
    #[serde(rename = "X")]
    OrderCancel(OrderCancel),
    #[serde(rename = "D")]
    OrderDelete(OrderDelete),
    #[serde(rename = "U")]
    OrderReplace(OrderReplace),
    #[serde(rename = "P")]
    Trade(Trade),
    #[serde(rename = "Q")]
    CrossTrade(CrossTrade),
    #[serde(rename = "I")]
    Imbalance(Imbalance),
    #[serde(rename = "Y")]
    RegShoRestriction(RegShoRestriction),
}

impl Message {
    /// 解码单条消息
    /// - 类型未知或 payload 短于规范长度时返回 None
    /// - payload 超长时仅按规范长度的前缀解码（长度不一致由调用方统计）
    pub fn decode(p: &[u8]) -> Option<Message> {
        let code = *p.first()?;
        let need = expected_len(code)?;
        if p.len() < need {
            return None;
        }
        let header = Header::read(p);

        let msg = match code {
            b'S' => Message::SystemEvent(SystemEvent { header, event_code: read_flag(p, 11) }),
            b'A' => Message::AddOrder(AddOrder {
                header,
                order_ref: read_u64(p, 11),
                buy_sell: read_flag(p, 19),
                shares: read_u32(p, 20),
                stock: Alpha::read(p, 24, STOCK_WIDTH),
                price: Price::read(p, 32),
            }),
            b'F' => Message::AddOrderMpid(AddOrderMpid {
                header,
                order_ref: read_u64(p, 11),
                buy_sell: read_flag(p, 19),
                shares: read_u32(p, 20),
                stock: Alpha::read(p, 24, STOCK_WIDTH),
                price: Price::read(p, 32),
                attribution: Alpha::read(p, 36, ATTRIBUTION_WIDTH),
            }),
            b'E' => Message::OrderExecuted(OrderExecuted {
                header,
                order_ref: read_u64(p, 11),
                executed_shares: read_u32(p, 19),
                match_number: read_u64(p, 23),
            }),
            b'C' => Message::OrderExecutedWithPrice(OrderExecutedWithPrice {
                header,
                order_ref: read_u64(p, 11),
                executed_shares: read_u32(p, 19),
                match_number: read_u64(p, 23),
                printable: read_flag(p, 31),
                price: Price::read(p, 32),
            }),
            b'X' => Message::OrderCancel(OrderCancel {
                header,
                order_ref: read_u64(p, 11),
                canceled_shares: read_u32(p, 19),
            }),
            b'D' => Message::OrderDelete(OrderDelete { header, order_ref: read_u64(p, 11) }),
            b'U' => Message::OrderReplace(OrderReplace {
                header,
                original_ref: read_u64(p, 11),
                new_ref: read_u64(p, 19),
                shares: read_u32(p, 27),
                price: Price::read(p, 31),
            }),
            b'P' => Message::Trade(Trade {
                header,
                order_ref: read_u64(p, 11),
                buy_sell: read_flag(p, 19),
                shares: read_u32(p, 20),
                stock: Alpha::read(p, 24, STOCK_WIDTH),
                price: Price::read(p, 32),
                match_number: read_u64(p, 36),
            }),
            b'Q' => Message::CrossTrade(CrossTrade {
                header,
                shares: read_u64(p, 11),
                stock: Alpha::read(p, 19, STOCK_WIDTH),
                cross_price: Price::read(p, 27),
                match_number: read_u64(p, 31),
                cross_type: read_flag(p, 39),
            }),
            b'I' => Message::Imbalance(Imbalance {
                header,
                paired_shares: read_u64(p, 11),
                imbalance_shares: read_u64(p, 19),
                imbalance_direction: read_flag(p, 27),
                stock: Alpha::read(p, 28, STOCK_WIDTH),
                far_price: Price::read(p, 36),
                near_price: Price::read(p, 40),
                current_ref_price: Price::read(p, 44),
                cross_type: read_flag(p, 48),
                price_variation_indicator: read_flag(p, 49),
            }),
            b'Y' => Message::RegShoRestriction(RegShoRestriction {
                header,
                stock: Alpha::read(p, 11, STOCK_WIDTH),
                reg_sho_action: read_flag(p, 19),
            }),
            _ => return None,
        };
        Some(msg)
    }

    pub fn header(&self) -> &Header {
        match self {
            Message::SystemEvent(m) => &m.header,
            Message::AddOrder(m) => &m.header,
            Message::AddOrderMpid(m) => &m.header,
            Message::OrderExecuted(m) => &m.header,
            Message::OrderExecutedWithPrice(m) => &m.header,
            Message::OrderCancel(m) => &m.header,
            Message::OrderDelete(m) => &m.header,
            Message::OrderReplace(m) => &m.header,
            Message::Trade(m) => &m.header,
            Message::CrossTrade(m) => &m.header,
            Message::Imbalance(m) => &m.header,
            Message::RegShoRestriction(m) => &m.header,
        }
    }
}
