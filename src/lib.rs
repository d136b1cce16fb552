//! Небольшой клиент `Redis` с ограниченным пулом соединений.
//!
//! Основные компоненты:
//!
//! * `clients`: клиент, работающий поверх одного соединения, и пул таких
//!   клиентов с лимитами простаивающих и активных соединений.
//!
//! * `cmd`: построители запросов для поддерживаемых команд.
//!
//! * `frame`: кадр протокола `Redis`, промежуточное представление между
//!   командой и байтами.
//!
//! * `reply`: преобразование ответа в запрошенный тип и отдельное условие
//!   отсутствия ключа.
//!
//! * `demo`: команды демонстрационной программы.

pub mod clients;
pub use clients::{Client, Pool, PoolConfig, PoolStats, PooledClient};

mod arg;
pub use arg::IntoArg;

pub mod cmd;

mod connection;
pub use connection::Connection;

pub mod demo;

pub mod frame;
pub use frame::Frame;

pub mod reply;
pub use reply::FromFrame;

pub mod user;
pub use user::User;

/// Порт сервера `Redis` по умолчанию.
pub const DEFAULT_PORT: u16 = 6379;

/// Максимальное количество простаивающих соединений в пуле по умолчанию.
pub const MAX_IDLE: usize = 80;

/// Максимальное количество активных соединений в пуле по умолчанию.
pub const MAX_ACTIVE: usize = 12000;

/// Ошибка, возвращаемая большинством функций.
///
/// Упакованный `std::error::Error` позволяет поднимать наверх ошибки
/// транспорта, протокола и сериализации без отдельного перечисления.
/// Отсутствие ключа выражается отдельно, с помощью `reply::Error::Nil`.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Специализированный тип `Result` для операций клиента.
pub type Result<T> = std::result::Result<T, Error>;
