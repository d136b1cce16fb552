use crate::Frame;

use bytes::Bytes;

/// Возвращает `PONG` при отсутствии аргументов,
/// иначе, возвращает копию аргументов в виде группы (bulk).
///
/// Эта команда часто используется для тестирования того,
/// что соединение открыто, а также для измерения задержки
#[derive(Debug, Default)]
pub struct Ping {
    /// Опциональное сообщение для возврата
    msg: Option<Bytes>,
}

impl Ping {
    /// Создает новую команду `Ping` с опциональным `msg`
    pub fn new(msg: Option<Bytes>) -> Ping {
        Ping { msg }
    }

    /// Преобразует команду в соответствующий `Frame`.
    ///
    /// ```text
    /// PING [message]
    /// ```
    pub(crate) fn into_frame(self) -> Frame {
        let mut frame = Frame::array();
        frame.push_bulk(Bytes::from("ping".as_bytes()));
        if let Some(msg) = self.msg {
            frame.push_bulk(msg);
        }
        frame
    }
}
