use anyhow::Result;
use itchtap_core::{bind, parse_stream, serve_one, Error, FeedStats};
use serde_json::{json, Value};
use std::io::{Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::{fs, io, thread};

/// 公共头部：locate=1, tracking=0, timestamp=34_200_000_000_000（09:30）
fn header(code: u8, len: usize) -> Vec<u8> {
    let mut p = Vec::with_capacity(len);
    p.push(code);
    p.extend_from_slice(&1u16.to_be_bytes());
    p.extend_from_slice(&0u16.to_be_bytes());
    p.extend_from_slice(&34_200_000_000_000u64.to_be_bytes()[2..]);
    p
}

fn add_order() -> Vec<u8> {
    let mut p = header(b'A', 36);
    p.extend_from_slice(&42u64.to_be_bytes());
    p.push(b'B');
    p.extend_from_slice(&100u32.to_be_bytes());
    p.extend_from_slice(b"AAPL    ");
    p.extend_from_slice(&1_234_500u32.to_be_bytes());
    p
}

fn system_event() -> Vec<u8> {
    let mut p = header(b'S', 12);
    p.push(b'Q');
    p
}

fn add_order_mpid() -> Vec<u8> {
    let mut p = header(b'F', 40);
    p.extend_from_slice(&43u64.to_be_bytes());
    p.push(b'S');
    p.extend_from_slice(&5u32.to_be_bytes());
    p.extend_from_slice(b"MSFT    ");
    p.extend_from_slice(&3_000_000u32.to_be_bytes());
    p.extend_from_slice(b"GS  ");
    p
}

fn frame(payload: &[u8]) -> Vec<u8> {
    let mut v = (payload.len() as u16).to_be_bytes().to_vec();
    v.extend_from_slice(payload);
    v
}

fn lines(out: &[u8]) -> Vec<Value> {
    std::str::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

/// 每次只返回一个字节，模拟被任意切分的网络读取
struct Trickle(Cursor<Vec<u8>>);

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(1);
        self.0.read(&mut buf[..n])
    }
}

#[test]
fn decodes_known_messages_to_json_lines() -> Result<()> {
    let mut input = frame(&system_event());
    input.extend(frame(&add_order()));
    input.extend(frame(&add_order_mpid()));

    let mut out = Vec::new();
    let stats = parse_stream(&mut Cursor::new(input), &mut out)?;
    assert_eq!(
        stats,
        FeedStats { messages_parsed: 3, unknown_messages: 0, length_mismatches: 0, trailing_bytes: 0 }
    );

    let text = String::from_utf8(out.clone())?;
    assert!(text.lines().all(|l| l.starts_with("{\"type\":")), "{text}");

    let rows = lines(&out);
    assert_eq!(
        rows[0],
        json!({"type": "S", "stock_locate": 1, "tracking_number": 0,
               "timestamp": 34_200_000_000_000u64, "event_code": "Q"})
    );
    assert_eq!(
        rows[1],
        json!({"type": "A", "stock_locate": 1, "tracking_number": 0,
               "timestamp": 34_200_000_000_000u64, "order_ref": 42, "buy_sell": "B",
               "shares": 100, "stock": "AAPL", "price": 123.45})
    );
    assert_eq!(rows[2]["price"], json!(300));
    assert_eq!(rows[2]["attribution"], json!("GS"));
    Ok(())
}

#[test]
fn split_reads_decode_identically() -> Result<()> {
    let mut input = Vec::new();
    for _ in 0..5 {
        input.extend(frame(&add_order()));
        input.extend(frame(&system_event()));
    }

    let mut whole = Vec::new();
    let a = parse_stream(&mut Cursor::new(input.clone()), &mut whole)?;
    let mut trickled = Vec::new();
    let b = parse_stream(&mut Trickle(Cursor::new(input)), &mut trickled)?;

    assert_eq!(a, b);
    assert_eq!(a.messages_parsed, 10);
    assert_eq!(whole, trickled);
    Ok(())
}

#[test]
fn unknown_zero_length_and_trailing_bytes_are_counted() -> Result<()> {
    let mut input = vec![0, 0];
    input.extend(frame(b"Zjunk"));
    input.extend(frame(&system_event()));
    let mut long_delete = header(b'D', 25);
    long_delete.extend_from_slice(&7u64.to_be_bytes());
    long_delete.extend_from_slice(&[0xFF; 6]);
    input.extend(frame(&long_delete));
    input.extend(frame(&add_order()[..20]));
    input.extend([0x00, 0x09, b'S']);

    let mut out = Vec::new();
    let stats = parse_stream(&mut Cursor::new(input), &mut out)?;
    assert_eq!(stats.messages_parsed, 2);
    // Z 为未知类型；截短的 A 无法解码
    assert_eq!(stats.unknown_messages, 2);
    // 超长的 D 与截短的 A
    assert_eq!(stats.length_mismatches, 2);
    assert_eq!(stats.trailing_bytes, 3);

    let rows = lines(&out);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["type"], json!("D"));
    assert_eq!(rows[1]["order_ref"], json!(7));
    Ok(())
}

/// 任何写入都失败的输出端
struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn output_write_failure_is_an_io_error() {
    let input = frame(&add_order());
    match parse_stream(&mut Cursor::new(input), &mut FullDisk) {
        Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn empty_stream_produces_no_output() -> Result<()> {
    let mut out = Vec::new();
    let stats = parse_stream(&mut io::empty(), &mut out)?;
    assert_eq!(stats, FeedStats::default());
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn bind_assigns_port_when_zero() -> Result<()> {
    let listener = bind(0)?;
    assert_ne!(listener.local_addr()?.port(), 0);
    Ok(())
}

#[test]
fn serve_one_writes_feed_from_tcp_client() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let output = tmp.path().join("parsed.jsonl");
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let client = thread::spawn(move || -> io::Result<()> {
        let mut stream = TcpStream::connect(addr)?;
        stream.write_all(&frame(&system_event()))?;
        stream.write_all(&frame(&add_order()))?;
        Ok(())
    });

    let stats = serve_one(&listener, &output)?;
    client.join().expect("client thread panicked")?;

    assert_eq!(stats.messages_parsed, 2);
    let rows = lines(&fs::read(&output)?);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["stock"], json!("AAPL"));
    Ok(())
}
