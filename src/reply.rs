//! Преобразование кадров ответа в значения запрошенного типа.
//!
//! Ответ `Null` на `GET` означает отсутствие ключа. Это ожидаемая ситуация,
//! поэтому она выражается отдельным вариантом `Error::Nil`, а не общей
//! ошибкой: вызывающая сторона может отличить "ключа нет" от обрыва
//! соединения или невалидного ответа.

use crate::Frame;

use bytes::Bytes;
use std::{fmt, str};

/// Ошибка получения значения.
#[derive(Debug)]
pub enum Error {
    /// Для ключа нет значения.
    Nil,

    /// Ошибка транспорта, протокола или преобразования типа.
    Other(crate::Error),
}

impl Error {
    /// Возвращает `true`, если ошибка означает отсутствие значения.
    pub fn is_nil(&self) -> bool {
        matches!(self, Error::Nil)
    }
}

/// Значение, которое можно извлечь из кадра ответа.
///
/// Кадры `Error` сюда не попадают: клиент преобразует их в `Err` раньше.
pub trait FromFrame: Sized {
    /// Преобразует `frame` в `Self`.
    ///
    /// Для кадра `Null` возвращается `Error::Nil`, для кадра неподходящего
    /// типа - `Error::Other`.
    fn from_frame(frame: Frame) -> Result<Self, Error>;
}

impl FromFrame for Frame {
    fn from_frame(frame: Frame) -> Result<Self, Error> {
        Ok(frame)
    }
}

impl FromFrame for Bytes {
    fn from_frame(frame: Frame) -> Result<Self, Error> {
        match frame {
            Frame::Bulk(data) => Ok(data),
            Frame::Simple(s) => Ok(Bytes::from(s.into_bytes())),
            Frame::Null => Err(Error::Nil),
            frame => Err(unexpected("bytes", &frame)),
        }
    }
}

impl FromFrame for Vec<u8> {
    fn from_frame(frame: Frame) -> Result<Self, Error> {
        Bytes::from_frame(frame).map(|data| data.to_vec())
    }
}

impl FromFrame for String {
    fn from_frame(frame: Frame) -> Result<Self, Error> {
        match frame {
            Frame::Simple(s) => Ok(s),
            Frame::Bulk(data) => str::from_utf8(&data[..])
                .map(|s| s.to_string())
                .map_err(|_| "Ошибка преобразования; значение не является строкой UTF-8.".into()),
            Frame::Integer(v) => Ok(v.to_string()),
            Frame::Null => Err(Error::Nil),
            frame => Err(unexpected("string", &frame)),
        }
    }
}

impl FromFrame for i64 {
    fn from_frame(frame: Frame) -> Result<Self, Error> {
        const MSG: &str = "Ошибка преобразования; значение не является целым числом.";

        match frame {
            Frame::Integer(v) => Ok(v),
            // Строковые значения (например, результат `GET`) разбираются как десятичный текст
            Frame::Simple(data) => parse_int(data.as_bytes()).ok_or_else(|| MSG.into()),
            Frame::Bulk(data) => parse_int(&data).ok_or_else(|| MSG.into()),
            Frame::Null => Err(Error::Nil),
            frame => Err(unexpected("int", &frame)),
        }
    }
}

impl FromFrame for bool {
    fn from_frame(frame: Frame) -> Result<Self, Error> {
        i64::from_frame(frame).map(|v| v != 0)
    }
}

impl<T: FromFrame> FromFrame for Option<T> {
    fn from_frame(frame: Frame) -> Result<Self, Error> {
        match frame {
            Frame::Null => Ok(None),
            frame => T::from_frame(frame).map(Some),
        }
    }
}

fn parse_int(data: &[u8]) -> Option<i64> {
    if is_decimal(data) {
        atoi::atoi::<i64>(data)
    } else {
        None
    }
}

/// `atoi` останавливается на первом нецифровом символе, поэтому значение
/// проверяется целиком.
fn is_decimal(data: &[u8]) -> bool {
    let digits = match data.first() {
        Some(b'-') | Some(b'+') => &data[1..],
        _ => data,
    };

    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}

fn unexpected(expected: &str, frame: &Frame) -> Error {
    format!(
        "Ошибка преобразования; ожидается `{}`, получено {:?}",
        expected, frame
    )
    .into()
}

impl From<crate::Error> for Error {
    fn from(src: crate::Error) -> Error {
        Error::Other(src)
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

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Nil => "Значение отсутствует (nil).".fmt(f),
            Error::Other(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {}
