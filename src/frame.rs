//! Предоставляет тип, представляющий кадр протокола `Redis`, а также
//! утилиты для разбора кадров из массива байтов.

use bytes::{Buf, Bytes};
use std::convert::TryInto;
use std::fmt;
use std::io::Cursor;
use std::num::TryFromIntError;
use std::string::FromUtf8Error;

/// Кадр протокола `Redis`.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

#[derive(Debug)]
pub enum Error {
    /// Недостаточно данных для разбора сообщения.
    Incomplete,

    /// Невалидная кодировка сообщения.
    Other(crate::Error),
}

const INVALID_FORMAT: &str = "Ошибка протокола; невалидный формат кадра.";

impl Frame {
    /// Возвращает пустой массив.
    pub fn array() -> Frame {
        Frame::Array(vec![])
    }

    /// Добавляет кадр `Bulk` в массив. `self` должен быть кадром `Array`.
    ///
    /// # Паника
    ///
    /// Паникует, если `self` не является массивом.
    pub fn push_bulk(&mut self, bytes: Bytes) {
        match self {
            Frame::Array(vec) => {
                vec.push(Frame::Bulk(bytes));
            }
            _ => panic!("Кадр не является массивом!"),
        }
    }

    /// Проверяет, что из `src` может быть декодировано целое сообщение
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<(), Error> {
        match get_u8(src)? {
            b'+' | b'-' => {
                get_line(src)?;
                Ok(())
            }
            b':' => {
                let _ = get_integer(src)?;
                Ok(())
            }
            b'$' => {
                if b'-' == peek_u8(src)? {
                    // Пропускаем '-1\r\n'.
                    skip(src, 4)
                } else {
                    let len: usize = get_decimal(src)?.try_into()?;

                    // Данные и завершающий \r\n.
                    skip(src, bulk_size(len)?)
                }
            }
            b'*' => {
                if b'-' == peek_u8(src)? {
                    // Пустой (null) массив.
                    return skip(src, 4);
                }

                let len = get_decimal(src)?;

                for _ in 0..len {
                    Frame::check(src)?;
                }

                Ok(())
            }
            actual => Err(format!("Ошибка протокола; невалидный тип кадра `{}`.", actual).into()),
        }
    }

    /// Сообщение было проверено с помощью `check`.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Frame, Error> {
        match get_u8(src)? {
            b'+' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Simple(String::from_utf8(line)?))
            }
            b'-' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Error(String::from_utf8(line)?))
            }
            b':' => Ok(Frame::Integer(get_integer(src)?)),
            b'$' => {
                if b'-' == peek_u8(src)? {
                    parse_null(src)
                } else {
                    let len = get_decimal(src)?.try_into()?;
                    let n = bulk_size(len)?;

                    if src.remaining() < n {
                        return Err(Error::Incomplete);
                    }

                    let data = Bytes::copy_from_slice(&src.chunk()[..len]);
                    skip(src, n)?;

                    Ok(Frame::Bulk(data))
                }
            }
            b'*' => {
                if b'-' == peek_u8(src)? {
                    return parse_null(src);
                }

                let len = get_decimal(src)?.try_into()?;
                let mut out = Vec::with_capacity(len);

                for _ in 0..len {
                    out.push(Frame::parse(src)?);
                }

                Ok(Frame::Array(out))
            }
            actual => Err(format!("Ошибка протокола; невалидный тип кадра `{}`.", actual).into()),
        }
    }

    /// Преобразует кадр в ошибку "Неожиданный кадр"
    pub(crate) fn to_error(&self) -> crate::Error {
        format!("Неожиданный кадр: {}", self).into()
    }
}

impl PartialEq<&str> for Frame {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Frame::Simple(s) => s.eq(other),
            Frame::Bulk(s) => s.eq(other),
            _ => false,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use std::str;

        match self {
            Frame::Simple(response) => response.fmt(fmt),
            Frame::Error(msg) => write!(fmt, "Ошибка: {}.", msg),
            Frame::Integer(num) => num.fmt(fmt),
            Frame::Bulk(msg) => match str::from_utf8(msg) {
                Ok(string) => string.fmt(fmt),
                Err(_) => write!(fmt, "{:?}", msg),
            },
            Frame::Null => "(nil)".fmt(fmt),
            Frame::Array(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(fmt, " ")?;
                    }

                    part.fmt(fmt)?;
                }

                Ok(())
            }
        }
    }
}

/// Разбирает `-1\r\n` после префикса `$` или `*`.
fn parse_null(src: &mut Cursor<&[u8]>) -> Result<Frame, Error> {
    let line = get_line(src)?;

    if line != b"-1" {
        return Err(INVALID_FORMAT.into());
    }

    Ok(Frame::Null)
}

/// Размер объемной строки длины `len` вместе с \r\n.
fn bulk_size(len: usize) -> Result<usize, Error> {
    len.checked_add(2).ok_or_else(|| INVALID_FORMAT.into())
}

fn peek_u8(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }

    Ok(src.chunk()[0])
}

fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }

    Ok(src.get_u8())
}

fn skip(src: &mut Cursor<&[u8]>, n: usize) -> Result<(), Error> {
    if src.remaining() < n {
        return Err(Error::Incomplete);
    }

    src.advance(n);
    Ok(())
}

/// Читает длину строки или массива.
fn get_decimal(src: &mut Cursor<&[u8]>) -> Result<u64, Error> {
    use atoi::atoi;

    let line = get_line(src)?;

    atoi::<u64>(line).ok_or_else(|| INVALID_FORMAT.into())
}

/// Читает значение кадра `Integer`, которое может быть отрицательным.
fn get_integer(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    use atoi::atoi;

    let line = get_line(src)?;

    atoi::<i64>(line).ok_or_else(|| INVALID_FORMAT.into())
}

/// Возвращает строку до \r\n и переносит курсор за разделитель.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();
    let rest = buf.get(start..).unwrap_or_default();

    match rest.windows(2).position(|pair| pair == b"\r\n") {
        Some(offset) => {
            src.set_position((start + offset + 2) as u64);
            Ok(&rest[..offset])
        }
        None => Err(Error::Incomplete),
    }
}

impl From<String> for Error {
    fn from(src: String) -> Error {
        Error::Other(src.into())
    }
}

impl From<&str> for Error {
    fn from(src: &str) -> Error {
        src.to_string().into()
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        INVALID_FORMAT.into()
    }
}

impl From<TryFromIntError> for Error {
    fn from(_src: TryFromIntError) -> Error {
        INVALID_FORMAT.into()
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Incomplete => "Поток кончился слишком рано.".fmt(fmt),
            Error::Other(err) => err.fmt(fmt),
        }
    }
}
