//! Минимальная реализация клиента `Redis`.
//!
//! Предоставляет асинхронное подключение и методы для обработки поддерживаемых команд.

use crate::cmd::{Get, Ping, Set};
use crate::{reply, Connection, Frame, FromFrame, IntoArg};

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::io::{Error, ErrorKind};
use std::time::Duration;
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, instrument};

/// Соединение, установленное с сервером `Redis`.
///
/// Поддерживаемый одним `TcpStream`, `Client` предоставляет базовую функциональность
/// сетевого клиента (нет длинного опроса (polling), повторов и др.). Соединения устанавливаются
/// с помощью функции `connect` или берутся из `Pool`.
///
/// Каждая команда - это независимый обмен запросом и ответом.
#[derive(Debug)]
pub struct Client {
    /// Соединение TCP, декорированное кодировщиком/декодером протокола `Redis`.
    connection: Connection,

    /// `true` с момента записи запроса до полного чтения ответа, а также после
    /// ошибки транспорта или протокола. Такое соединение не возвращается в пул.
    broken: bool,
}

impl Client {
    /// Устанавливает соединение с сервером `Redis`, находящимся по `addr`.
    ///
    /// `addr` - любой тип, который может быть асинхронно преобразован в
    /// `SocketAddr`. Это включает `SocketAddr` и строки.
    ///
    /// # Примеры
    ///
    /// ```no_run
    /// use redis_pool_demo::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = match Client::connect("localhost:6379").await {
    ///         Ok(client) => client,
    ///         Err(_) => panic!("Невозможно установить соединение!"),
    ///     };
    /// # drop(client);
    /// }
    /// ```
    pub async fn connect<T: ToSocketAddrs>(addr: T) -> crate::Result<Client> {
        // Ошибка, возникшая на этом этапе, поднимается к вызывающей стороне.
        let socket = TcpStream::connect(addr).await?;

        Ok(Client {
            connection: Connection::new(socket),
            broken: false,
        })
    }

    /// Возвращает `true`, если соединение больше нельзя использовать.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// "Пингует" сервер.
    ///
    /// При отсутствии аргументов, возвращается "PONG",
    /// иначе, возвращается копия аргументов в виде группы (bulk).
    ///
    /// # Примеры
    ///
    /// ```no_run
    /// use redis_pool_demo::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let mut client = Client::connect("localhost:6379").await.unwrap();
    ///
    ///     let pong = client.ping(None).await.unwrap();
    ///     assert_eq!(b"PONG", &pong[..]);
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn ping(&mut self, msg: Option<Bytes>) -> crate::Result<Bytes> {
        let frame = Ping::new(msg).into_frame();

        match self.exec(frame).await? {
            Frame::Simple(value) => Ok(value.into()),
            Frame::Bulk(value) => Ok(value),
            frame => Err(frame.to_error()),
        }
    }

    /// Извлекает значение по ключу и преобразует его в `T`.
    ///
    /// При отсутствии значения возвращается `reply::Error::Nil`. Любая другая
    /// ошибка, включая невозможность преобразования, возвращается как
    /// `reply::Error::Other`.
    ///
    /// # Примеры
    ///
    /// ```no_run
    /// use redis_pool_demo::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let mut client = Client::connect("localhost:6379").await.unwrap();
    ///
    ///     match client.get::<String>("foo").await {
    ///         Ok(val) => println!("foo = {}", val),
    ///         Err(err) if err.is_nil() => println!("foo не существует"),
    ///         Err(err) => println!("{}", err),
    ///     }
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn get<T: FromFrame>(&mut self, key: &str) -> Result<T, reply::Error> {
        let frame = Get::new(key).into_frame();

        // Принимаются кадры `Simple`, `Bulk` и `Null`. Преобразование
        // выполняет `FromFrame`, `Null` становится `Nil`
        let response = self.exec(frame).await?;

        T::from_frame(response)
    }

    /// Устанавливает переданное `value` для `key`.
    ///
    /// `value` может быть строкой, числом или произвольными байтами.
    /// Предыдущее значение перезаписывается (при наличии).
    ///
    /// # Примеры
    ///
    /// ```no_run
    /// use redis_pool_demo::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let mut client = Client::connect("localhost:6379").await.unwrap();
    ///
    ///     client.set("foo", "bar").await.unwrap();
    ///     client.set("year", 1984).await.unwrap();
    ///
    ///     let val: String = client.get("foo").await.unwrap();
    ///     assert_eq!(val, "bar");
    /// }
    /// ```
    #[instrument(skip(self, value))]
    pub async fn set<V: IntoArg>(&mut self, key: &str, value: V) -> crate::Result<()> {
        self.set_cmd(Set::new(key, value.into_arg(), None)).await
    }

    /// Устанавливает переданное `value` для `key`. Значение истекает после `expiration`.
    #[instrument(skip(self, value))]
    pub async fn set_expires<V: IntoArg>(
        &mut self,
        key: &str,
        value: V,
        expiration: Duration,
    ) -> crate::Result<()> {
        self.set_cmd(Set::new(key, value.into_arg(), Some(expiration)))
            .await
    }

    /// Сериализует `value` в JSON и сохраняет результат для `key`.
    #[instrument(skip(self, value))]
    pub async fn set_json<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> crate::Result<()> {
        let json = serde_json::to_vec(value)?;

        debug!(len = json.len(), "сериализовано значение");

        self.set(key, json).await
    }

    /// Извлекает значение по ключу и десериализует его из JSON.
    ///
    /// Отсутствие ключа, как и в `get`, возвращается как `reply::Error::Nil`.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, reply::Error> {
        let data: Bytes = self.get(key).await?;

        serde_json::from_slice(&data).map_err(|err| reply::Error::Other(err.into()))
    }

    /// Выполняет произвольную команду и возвращает кадр ответа как есть.
    ///
    /// Кадр `Error` от сервера возвращается как `Err`.
    #[instrument(skip(self, args))]
    pub async fn execute(&mut self, name: &str, args: Vec<Bytes>) -> crate::Result<Frame> {
        let mut frame = Frame::array();
        frame.push_bulk(Bytes::copy_from_slice(name.as_bytes()));
        for arg in args {
            frame.push_bulk(arg);
        }

        self.exec(frame).await
    }

    /// Основная логика `SET`, используемая методами `set` и `set_expires`.
    async fn set_cmd(&mut self, cmd: Set) -> crate::Result<()> {
        // При успехе сервер отвечает простым `OK`. Любой другой ответ означает ошибку
        match self.exec(cmd.into_frame()).await? {
            Frame::Simple(response) if response == "OK" => Ok(()),
            frame => Err(frame.to_error()),
        }
    }

    /// Записывает кадр запроса в сокет и ждет ответа.
    ///
    /// Кадр `Error` преобразуется в `Err`.
    async fn exec(&mut self, frame: Frame) -> crate::Result<Frame> {
        debug!(request = ?frame);

        // Сбрасывается только после чтения ответа целиком. Отмененный между
        // записью и чтением запрос оставляет соединение сломанным
        self.broken = true;

        self.connection.write_frame(&frame).await?;
        let response = self.connection.read_frame().await?;

        debug!(?response);

        match response {
            Some(frame) => {
                self.broken = false;

                match frame {
                    // Ошибка сервера не нарушает протокол, соединение остается пригодным
                    Frame::Error(msg) => Err(msg.into()),
                    frame => Ok(frame),
                }
            }
            None => {
                // `None` - индикатор того, что сервер закрыл
                // соединение без отправки кадра
                let err = Error::new(ErrorKind::ConnectionReset, "Соединение сброшено сервером.");

                Err(err.into())
            }
        }
    }
}
