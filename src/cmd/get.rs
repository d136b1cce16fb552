use crate::Frame;

use bytes::Bytes;

/// Извлекает значение по ключу.
///
/// При отсутствии значения сервер возвращает специальное значение `nil`.
#[derive(Debug)]
pub struct Get {
    /// Название ключа для получения
    key: String,
}

impl Get {
    /// Создает новую команду `Get`, которая запрашивает `key`
    pub fn new(key: impl ToString) -> Get {
        Get {
            key: key.to_string(),
        }
    }

    /// Преобразует команду в соответствующий `Frame`.
    ///
    /// # Формат
    ///
    /// ```text
    /// GET key
    /// ```
    pub(crate) fn into_frame(self) -> Frame {
        let mut frame = Frame::array();
        frame.push_bulk(Bytes::from("get".as_bytes()));
        frame.push_bulk(Bytes::from(self.key.into_bytes()));
        frame
    }
}
