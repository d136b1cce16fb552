use redis_pool_demo::frame::{self, Frame};

use bytes::Bytes;
use std::io::Cursor;

fn decode(src: &[u8]) -> Result<Frame, frame::Error> {
    let mut buf = Cursor::new(src);
    Frame::check(&mut buf)?;

    // `check` и `parse` должны потребить одинаковое количество байтов
    let len = buf.position();
    buf.set_position(0);
    let frame = Frame::parse(&mut buf)?;
    assert_eq!(len, buf.position());

    Ok(frame)
}

#[test]
fn simple_string() {
    assert_eq!(Frame::Simple("PONG".to_string()), decode(b"+PONG\r\n").unwrap());
}

#[test]
fn negative_integer() {
    assert_eq!(Frame::Integer(-42), decode(b":-42\r\n").unwrap());
}

#[test]
fn bulk_string_with_crlf_inside() {
    assert_eq!(
        Frame::Bulk(Bytes::from_static(b"a\r\nb")),
        decode(b"$4\r\na\r\nb\r\n").unwrap()
    );
}

#[test]
fn null_bulk_and_null_array() {
    assert_eq!(Frame::Null, decode(b"$-1\r\n").unwrap());
    assert_eq!(Frame::Null, decode(b"*-1\r\n").unwrap());
}

#[test]
fn array_of_mixed_frames() {
    let frame = decode(b"*3\r\n$3\r\nget\r\n:7\r\n-ERR oops\r\n").unwrap();

    assert_eq!(
        Frame::Array(vec![
            Frame::Bulk(Bytes::from_static(b"get")),
            Frame::Integer(7),
            Frame::Error("ERR oops".to_string()),
        ]),
        frame
    );
}

#[test]
fn partial_input_is_incomplete() {
    let inputs: [&[u8]; 4] = [b"", b"+PON", b"$5\r\nhel", b"*2\r\n$3\r\nget\r\n"];

    for src in inputs.iter() {
        assert!(
            matches!(decode(src), Err(frame::Error::Incomplete)),
            "{:?}",
            src
        );
    }
}

#[test]
fn unknown_type_byte_is_protocol_error() {
    assert!(matches!(decode(b"?oops\r\n"), Err(frame::Error::Other(_))));
}

#[test]
fn display_joins_array_parts() {
    let frame = Frame::Array(vec![
        Frame::Simple("OK".to_string()),
        Frame::Integer(1984),
        Frame::Null,
    ]);

    assert_eq!("OK 1984 (nil)", frame.to_string());
}

#[test]
fn compares_with_str() {
    assert!(Frame::Simple("OK".to_string()) == "OK");
    assert!(Frame::Bulk(Bytes::from_static(b"OK")) == "OK");
    assert!(Frame::Error("OK".to_string()) != "OK");
}

#[test]
fn oversized_bulk_length_is_protocol_error() {
    let src: &[u8] = b"$18446744073709551615\r\n";

    let mut buf = Cursor::new(src);
    assert!(matches!(
        Frame::check(&mut buf),
        Err(frame::Error::Other(_))
    ));

    let mut buf = Cursor::new(src);
    assert!(matches!(
        Frame::parse(&mut buf),
        Err(frame::Error::Other(_))
    ));
}

#[test]
fn line_ends_at_first_crlf() {
    let inputs: [&[u8]; 2] = [b"+OK\r\n+NEXT\r\n", b"+OK\r\n\r\n"];

    for src in inputs.iter() {
        let mut buf = Cursor::new(*src);
        assert_eq!(Frame::Simple("OK".to_string()), Frame::parse(&mut buf).unwrap());
        assert_eq!(5, buf.position());
    }
}
