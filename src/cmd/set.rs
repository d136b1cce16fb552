use crate::Frame;

use bytes::Bytes;
use std::time::Duration;

/// Устанавливает `value` для `key`.
///
/// Предыдущее значение перезаписывается, независимо от типа (при наличии).
/// Предыдущее время жизни отбрасывается (discard) при успешной операции `SET`.
#[derive(Debug)]
pub struct Set {
    /// Ключ для установки
    key: String,

    /// Значение для хранения
    value: Bytes,

    /// Время жизни ключа
    expire: Option<Duration>,
}

impl Set {
    /// Создает новую команду `Set`, устанавливающую `value` для `key`.
    ///
    /// Если `expire` является `Some`, значение должно быть удалено по истечение определенного времени.
    pub fn new(key: impl ToString, value: Bytes, expire: Option<Duration>) -> Set {
        Set {
            key: key.to_string(),
            value,
            expire,
        }
    }

    /// Преобразует команду в соответствующий `Frame`.
    ///
    /// ```text
    /// SET key value [PX milliseconds]
    /// ```
    pub(crate) fn into_frame(self) -> Frame {
        let mut frame = Frame::array();
        frame.push_bulk(Bytes::from("set".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        frame.push_bulk(self.value);
        if let Some(ms) = self.expire {
            // Сервер принимает аргументы только в виде групповых строк,
            // поэтому время жизни передается десятичным текстом
            frame.push_bulk(Bytes::from("px".as_bytes()));
            frame.push_bulk(Bytes::from(ms.as_millis().to_string()));
        }
        frame
    }
}
