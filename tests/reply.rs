use redis_pool_demo::{reply, FromFrame, Frame, IntoArg};

use bytes::Bytes;

fn bulk(data: &'static [u8]) -> Frame {
    Frame::Bulk(Bytes::from_static(data))
}

#[test]
fn string_from_text_frames() {
    assert_eq!("PONG", String::from_frame(Frame::Simple("PONG".into())).unwrap());
    assert_eq!("Repo Man", String::from_frame(bulk(b"Repo Man")).unwrap());
    assert_eq!("1984", String::from_frame(Frame::Integer(1984)).unwrap());
}

#[test]
fn string_from_invalid_utf8_is_generic_error() {
    let err = String::from_frame(bulk(&[0xff, 0xfe])).unwrap_err();
    assert!(!err.is_nil());
}

#[test]
fn int_from_integer_and_decimal_text() {
    assert_eq!(1984, i64::from_frame(Frame::Integer(1984)).unwrap());
    assert_eq!(1984, i64::from_frame(bulk(b"1984")).unwrap());
    assert_eq!(-7, i64::from_frame(Frame::Simple("-7".into())).unwrap());
}

#[test]
fn int_rejects_partial_numbers() {
    let inputs: [&[u8]; 4] = [b"12abc", b"", b"-", b"Repo Man"];

    for data in inputs.iter() {
        let err = i64::from_frame(Frame::Bulk(Bytes::copy_from_slice(data))).unwrap_err();
        assert!(matches!(err, reply::Error::Other(_)), "{:?}", data);
    }
}

#[test]
fn null_is_nil_for_every_scalar() {
    assert!(String::from_frame(Frame::Null).unwrap_err().is_nil());
    assert!(i64::from_frame(Frame::Null).unwrap_err().is_nil());
    assert!(Bytes::from_frame(Frame::Null).unwrap_err().is_nil());
    assert!(Vec::<u8>::from_frame(Frame::Null).unwrap_err().is_nil());
    assert!(bool::from_frame(Frame::Null).unwrap_err().is_nil());
}

#[test]
fn option_maps_null_to_none() {
    assert_eq!(None, Option::<i64>::from_frame(Frame::Null).unwrap());
    assert_eq!(Some(5), Option::<i64>::from_frame(Frame::Integer(5)).unwrap());
}

#[test]
fn array_is_not_a_scalar() {
    let frame = Frame::Array(vec![bulk(b"a")]);

    assert!(!String::from_frame(frame.clone()).unwrap_err().is_nil());
    assert!(!i64::from_frame(frame).unwrap_err().is_nil());
}

#[test]
fn bool_from_integer_flags() {
    assert!(bool::from_frame(Frame::Integer(1)).unwrap());
    assert!(!bool::from_frame(bulk(b"0")).unwrap());
}

#[test]
fn nil_converts_to_boxed_error() {
    let err: redis_pool_demo::Error = reply::Error::Nil.into();
    assert!(err.to_string().contains("nil"));
}

#[test]
fn arguments_are_encoded_as_text() {
    assert_eq!(Bytes::from_static(b"1984"), 1984i32.into_arg());
    assert_eq!(Bytes::from_static(b"-1"), (-1i64).into_arg());
    assert_eq!(Bytes::from_static(b"1"), true.into_arg());
    assert_eq!(Bytes::from_static(b"0"), false.into_arg());
    assert_eq!(Bytes::from_static(b"1.5"), 1.5f64.into_arg());
    assert_eq!(Bytes::from_static(b"Repo Man"), "Repo Man".into_arg());
    assert_eq!(Bytes::from_static(b"\x00\x01"), vec![0u8, 1].into_arg());
}
