//! 长度前缀分帧（2 字节大端长度 + payload）
use crate::fields::read_u16;

/// 初始缓冲容量（1 MiB），不足时由 Vec 自动扩容
pub(crate) const INITIAL_BUFFER_CAP: usize = 1024 * 1024;

/// 接收缓冲区：追加网络字节，按帧切出 payload
pub(crate) struct FrameBuffer {
    buf: Vec<u8>,
    /// 已消费到的位置；`compact` 时前移
    pos: usize,
}

impl FrameBuffer {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self { buf: Vec::with_capacity(cap), pos: 0 }
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// 取出下一帧 payload
    /// - 长度为 0 的帧直接跳过
    /// - 剩余字节不足一帧时返回 None，等待后续数据
    pub(crate) fn next_frame(&mut self) -> Option<&[u8]> {
        loop {
            if self.remaining() < 2 {
                return None;
            }
            let len = read_u16(&self.buf, self.pos) as usize;
            if len == 0 {
                self.pos += 2;
                continue;
            }
            if self.remaining() < len + 2 {
                return None;
            }
            let start = self.pos + 2;
            let end = start + len;
            self.pos = end;
            return Some(&self.buf[start..end]);
        }
    }

    /// 丢弃已消费字节，未成帧的尾部移动到缓冲区开头
    pub(crate) fn compact(&mut self) {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
    }

    /// 尚未消费的字节数
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut v = (payload.len() as u16).to_be_bytes().to_vec();
        v.extend_from_slice(payload);
        v
    }

    #[test]
    fn yields_complete_frames_in_order() {
        let mut fb = FrameBuffer::with_capacity(16);
        fb.extend(&frame(b"abc"));
        fb.extend(&frame(b"de"));
        assert_eq!(fb.next_frame(), Some(&b"abc"[..]));
        assert_eq!(fb.next_frame(), Some(&b"de"[..]));
        assert_eq!(fb.next_frame(), None);
        assert_eq!(fb.remaining(), 0);
    }

    #[test]
    fn waits_for_partial_frame() {
        let bytes = frame(b"hello");
        let mut fb = FrameBuffer::with_capacity(16);
        fb.extend(&bytes[..1]);
        assert_eq!(fb.next_frame(), None);
        fb.extend(&bytes[1..4]);
        assert_eq!(fb.next_frame(), None);
        fb.compact();
        assert_eq!(fb.remaining(), 4);
        fb.extend(&bytes[4..]);
        assert_eq!(fb.next_frame(), Some(&b"hello"[..]));
    }

    #[test]
    fn skips_zero_length_frames() {
        let mut fb = FrameBuffer::with_capacity(16);
        fb.extend(&[0, 0, 0, 0]);
        fb.extend(&frame(b"x"));
        assert_eq!(fb.next_frame(), Some(&b"x"[..]));
        assert_eq!(fb.next_frame(), None);
    }

    #[test]
    fn compact_keeps_unconsumed_tail() {
        let mut fb = FrameBuffer::with_capacity(16);
        fb.extend(&frame(b"ab"));
        fb.extend(&[0x00]);
        assert!(fb.next_frame().is_some());
        fb.compact();
        assert_eq!(fb.remaining(), 1);
    }
}
