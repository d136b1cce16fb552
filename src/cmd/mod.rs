//! Построители запросов для поддерживаемых команд.
//!
//! Каждая команда знает, как преобразовать себя в `Frame` для отправки
//! серверу. Ответ разбирает `Client`.

mod get;
pub use get::Get;

mod ping;
pub use ping::Ping;

mod set;
pub use set::Set;
