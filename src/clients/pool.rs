//! Пул соединений с сервером `Redis`.
//!
//! Пул хранит ограниченный набор простаивающих клиентов и ограничивает общее
//! количество активных (простаивающих и используемых) соединений. Клиент
//! возвращается в пул при уничтожении (drop) `PooledClient`, поэтому
//! освобождение соединения гарантируется на любом пути выхода из области видимости.

use crate::{Client, MAX_ACTIVE, MAX_IDLE};

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Настройки пула.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Адрес сервера, например, "127.0.0.1:6379".
    pub addr: String,

    /// Максимальное количество простаивающих соединений.
    pub max_idle: usize,

    /// Максимальное количество активных соединений. `0` снимает ограничение.
    pub max_active: usize,

    /// Ждать освобождения соединения, если пул исчерпан. Иначе `get`
    /// сразу возвращает ошибку.
    pub wait: bool,

    /// Простаивающие дольше этого времени соединения закрываются.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> PoolConfig {
        PoolConfig {
            addr: format!("127.0.0.1:{}", crate::DEFAULT_PORT),
            max_idle: MAX_IDLE,
            max_active: MAX_ACTIVE,
            wait: false,
            idle_timeout: None,
        }
    }
}

/// Снимок состояния пула.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Количество активных соединений, включая простаивающие.
    pub active_count: usize,

    /// Количество простаивающих соединений.
    pub idle_count: usize,
}

/// Пул соединений.
///
/// Клонирование `Pool` дешево: все копии разделяют одно состояние.
#[derive(Debug, Clone)]
pub struct Pool {
    shared: Arc<Shared>,
}

/// Клиент, взятый из пула.
///
/// Разыменовывается в `Client`. При уничтожении соединение возвращается в пул.
#[derive(Debug)]
pub struct PooledClient {
    shared: Arc<Shared>,

    /// `None` только после возврата в `drop`.
    client: Option<Client>,
}

#[derive(Debug)]
struct Shared {
    config: PoolConfig,

    state: Mutex<State>,

    /// Уведомляет ожидающих `get` об освобождении соединения.
    available: Notify,
}

#[derive(Debug)]
struct State {
    /// Простаивающие клиенты. Свежие в начале, самые старые в конце.
    idle: VecDeque<IdleClient>,

    /// Простаивающие и используемые соединения.
    active: usize,

    closed: bool,
}

#[derive(Debug)]
struct IdleClient {
    client: Client,
    since: Instant,
}

/// Место в `active`, зарезервированное под устанавливаемое соединение.
struct Reservation<'a> {
    shared: &'a Shared,
    armed: bool,
}

/// Результат попытки взять соединение под блокировкой.
enum Checkout {
    Idle(Client),
    Dial,
    Wait,
}

impl Pool {
    /// Создает пул. Соединения устанавливаются лениво, при первом `get`.
    pub fn new(config: PoolConfig) -> Pool {
        Pool {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    idle: VecDeque::with_capacity(config.max_idle),
                    active: 0,
                    closed: false,
                }),
                config,
                available: Notify::new(),
            }),
        }
    }

    /// Возвращает настройки пула.
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    /// Берет соединение из пула.
    ///
    /// Сначала используется самое свежее простаивающее соединение. Если таких нет,
    /// устанавливается новое, пока не достигнут `max_active`. При исчерпании
    /// пула возвращается ошибка, либо, если установлен `wait`, `get` ждет
    /// возврата соединения другим владельцем.
    ///
    /// Зарезервированное место освобождается, если соединение не удалось установить
    /// или если `get` был отменен во время установки.
    #[instrument(skip(self))]
    pub async fn get(&self) -> crate::Result<PooledClient> {
        loop {
            // `Notified` создается до проверки состояния, поэтому уведомление,
            // пришедшее между проверкой и ожиданием, не теряется
            let notified = self.shared.available.notified();

            match self.shared.checkout()? {
                Checkout::Idle(client) => {
                    debug!("используется простаивающее соединение");
                    return Ok(self.wrap(client));
                }
                Checkout::Dial => break,
                Checkout::Wait => {
                    debug!("пул исчерпан, ожидаем освобождения соединения");
                    notified.await;
                }
            }
        }

        // Место уже зарезервировано в `checkout`. Оно освобождается при
        // ошибке установки соединения и при отмене `get` во время установки
        let reservation = Reservation {
            shared: &self.shared,
            armed: true,
        };

        debug!(addr = %self.shared.config.addr, "устанавливается новое соединение");

        let client = Client::connect(self.shared.config.addr.as_str()).await?;
        reservation.disarm();

        Ok(self.wrap(client))
    }

    /// Возвращает количество активных и простаивающих соединений.
    pub fn stats(&self) -> PoolStats {
        let state = self.shared.lock();

        PoolStats {
            active_count: state.active,
            idle_count: state.idle.len(),
        }
    }

    /// Закрывает простаивающие соединения и запрещает новые `get`.
    ///
    /// Используемые соединения закрываются при возврате.
    pub fn close(&self) {
        let idle = {
            let mut state = self.shared.lock();
            let idle = std::mem::take(&mut state.idle);
            state.closed = true;
            state.active -= idle.len();
            idle
        };

        debug!(closed = idle.len(), "пул закрыт");

        // Ожидающие `get` должны проснуться и получить ошибку
        self.shared.available.notify_waiters();
    }

    fn wrap(&self, client: Client) -> PooledClient {
        PooledClient {
            shared: self.shared.clone(),
            client: Some(client),
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        // Состояние пула остается согласованным даже после паники владельца блокировки
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn checkout(&self) -> crate::Result<Checkout> {
        let mut state = self.lock();

        if state.closed {
            return Err("Пул соединений закрыт.".into());
        }

        if let Some(timeout) = self.config.idle_timeout {
            while let Some(idle) = state.idle.back() {
                if idle.since.elapsed() < timeout {
                    break;
                }

                state.idle.pop_back();
                state.active -= 1;
                debug!("закрыто устаревшее соединение");
            }
        }

        if let Some(idle) = state.idle.pop_front() {
            return Ok(Checkout::Idle(idle.client));
        }

        if self.config.max_active == 0 || state.active < self.config.max_active {
            // Место резервируется до установки соединения
            state.active += 1;
            return Ok(Checkout::Dial);
        }

        if self.config.wait {
            Ok(Checkout::Wait)
        } else {
            Err("Пул соединений исчерпан.".into())
        }
    }

    /// Возвращает клиента в пул или закрывает его.
    fn put(&self, client: Client) {
        let mut state = self.lock();

        if !state.closed && !client.is_broken() && state.idle.len() < self.config.max_idle {
            state.idle.push_front(IdleClient {
                client,
                since: Instant::now(),
            });
        } else {
            state.active -= 1;
            debug!(broken = client.is_broken(), "соединение закрыто");
        }

        drop(state);
        self.available.notify_one();
    }

    /// Освобождает место соединения, которое так и не было установлено.
    fn release(&self) {
        self.lock().active -= 1;
        self.available.notify_one();
    }
}

impl Reservation<'_> {
    /// Передает место установленному соединению.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.release();
        }
    }
}

impl Deref for PooledClient {
    type Target = Client;

    fn deref(&self) -> &Client {
        // `client` равен `None` только внутри `drop`
        match &self.client {
            Some(client) => client,
            None => unreachable!("клиент уже возвращен в пул"),
        }
    }
}

impl DerefMut for PooledClient {
    fn deref_mut(&mut self) -> &mut Client {
        match &mut self.client {
            Some(client) => client,
            None => unreachable!("клиент уже возвращен в пул"),
        }
    }
}

impl Drop for PooledClient {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.shared.put(client);
        }
    }
}
