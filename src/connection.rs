use crate::frame::{self, Frame};

use bytes::{Buf, BytesMut};
use std::io::{self, Cursor, ErrorKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

/// Отправляет и получает значения `Frame` через `TcpStream`.
///
/// Входящие данные накапливаются в `buffer`, пока их не станет достаточно
/// для разбора целого кадра. Исходящие кадры записываются в `BufWriter`
/// и отправляются одним сбросом (flush).
#[derive(Debug)]
pub struct Connection {
    stream: BufWriter<TcpStream>,

    // Буфер для чтения кадров.
    buffer: BytesMut,
}

impl Connection {
    /// Создает новое `Connection` поверх `socket` и инициализирует буферы.
    pub fn new(socket: TcpStream) -> Connection {
        Connection {
            stream: BufWriter::new(socket),
            // 4 КБ.
            buffer: BytesMut::with_capacity(4 * 1024),
        }
    }

    /// Читает один `Frame` из потока.
    ///
    /// Ожидает, пока не будет получено достаточно данных для разбора кадра.
    /// Данные, оставшиеся в буфере после разбора, сохраняются до следующего
    /// вызова `read_frame`.
    ///
    /// # Возвращаемые значения
    ///
    /// При успехе возвращается полученный кадр. Если `TcpStream` закрыт
    /// между кадрами, возвращается `None`. Обрыв посреди кадра является ошибкой.
    pub async fn read_frame(&mut self) -> crate::Result<Option<Frame>> {
        loop {
            // Пытаемся разобрать кадр из буферизованных данных.
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // Данных недостаточно, читаем еще. `0` означает конец потока.
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }

                return Err("Соединение сброшено собеседником.".into());
            }
        }
    }

    /// Пытается разобрать кадр из буфера. Разобранные данные удаляются из
    /// буфера. Если данных недостаточно, возвращается `Ok(None)`.
    fn parse_frame(&mut self) -> crate::Result<Option<Frame>> {
        use frame::Error::Incomplete;

        let mut buf = Cursor::new(&self.buffer[..]);

        // `check` дешевле полного разбора и не выделяет память, поэтому
        // сначала убеждаемся, что кадр получен целиком.
        match Frame::check(&mut buf) {
            Ok(_) => {
                // `check` продвинул курсор до конца кадра.
                let len = buf.position() as usize;

                buf.set_position(0);
                let frame = Frame::parse(&mut buf)?;

                self.buffer.advance(len);

                Ok(Some(frame))
            }
            Err(Incomplete) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Записывает один `Frame` в поток и сбрасывает буфер записи.
    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        match frame {
            Frame::Array(val) => {
                self.stream.write_u8(b'*').await?;
                self.write_decimal(val.len() as i64).await?;

                for entry in val {
                    self.write_value(entry).await?;
                }
            }
            _ => self.write_value(frame).await?,
        }

        self.stream.flush().await
    }

    /// Записывает литерал кадра в поток.
    async fn write_value(&mut self, frame: &Frame) -> io::Result<()> {
        match frame {
            Frame::Simple(val) => {
                self.stream.write_u8(b'+').await?;
                self.stream.write_all(val.as_bytes()).await?;
                self.stream.write_all(b"\r\n").await?;
            }
            Frame::Error(val) => {
                self.stream.write_u8(b'-').await?;
                self.stream.write_all(val.as_bytes()).await?;
                self.stream.write_all(b"\r\n").await?;
            }
            Frame::Integer(val) => {
                self.stream.write_u8(b':').await?;
                self.write_decimal(*val).await?;
            }
            Frame::Null => {
                self.stream.write_all(b"$-1\r\n").await?;
            }
            Frame::Bulk(val) => {
                self.stream.write_u8(b'$').await?;
                self.write_decimal(val.len() as i64).await?;
                self.stream.write_all(val).await?;
                self.stream.write_all(b"\r\n").await?;
            }
            Frame::Array(_) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    "Вложенные массивы не поддерживаются.",
                ));
            }
        }

        Ok(())
    }

    /// Записывает десятичное число и завершающий `\r\n`.
    async fn write_decimal(&mut self, val: i64) -> io::Result<()> {
        use std::io::Write;

        // Самое длинное значение `i64` занимает 20 символов.
        let mut buf = [0u8; 20];
        let mut buf = Cursor::new(&mut buf[..]);
        write!(&mut buf, "{}", val)?;

        let pos = buf.position() as usize;
        self.stream.write_all(&buf.get_ref()[..pos]).await?;
        self.stream.write_all(b"\r\n").await?;

        Ok(())
    }
}
