//! Хранилище `Redis` в памяти для тестов.
//!
//! Понимает `PING`, `SET` (с `PX`), `GET`, `PTTL` и `QUIT`. На остальные
//! команды отвечает кадром `Error`, как настоящий сервер. Ответ на `GET`
//! ключа, начинающегося со `slow`, задерживается на `SLOW_REPLY`.

#![allow(dead_code)]

use redis_pool_demo::{Connection, Frame};

use bytes::Bytes;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time;

pub const SLOW_REPLY: Duration = Duration::from_millis(200);

/// Запущенное хранилище.
pub struct Store {
    pub addr: SocketAddr,

    /// Количество принятых соединений.
    accepted: Arc<AtomicUsize>,
}

impl Store {
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

/// Значение и время жизни в миллисекундах, переданное в `PX`.
type Db = Arc<Mutex<HashMap<String, (Bytes, Option<u64>)>>>;

/// Запускает хранилище в фоновой задаче.
pub async fn start_store() -> Store {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let db: Db = Arc::new(Mutex::new(HashMap::new()));

    let counter = accepted.clone();
    tokio::spawn(async move {
        loop {
            let (socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            counter.fetch_add(1, Ordering::SeqCst);

            let db = db.clone();
            tokio::spawn(async move {
                let mut conn = Connection::new(socket);
                while let Ok(Some(frame)) = conn.read_frame().await {
                    let slow = is_slow(&frame);
                    let response = match apply(&db, frame) {
                        Some(response) => response,
                        // `QUIT`: закрываем соединение без ответа
                        None => return,
                    };
                    if slow {
                        time::sleep(SLOW_REPLY).await;
                    }
                    if conn.write_frame(&response).await.is_err() {
                        return;
                    }
                }
            });
        }
    });

    Store { addr, accepted }
}

/// Возвращает адрес, на котором гарантированно никто не слушает.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn apply(db: &Db, frame: Frame) -> Option<Frame> {
    let parts = match frame {
        Frame::Array(parts) => parts,
        frame => return Some(Frame::Error(format!("ERR expected array, got {}", frame))),
    };

    let args: Vec<Bytes> = parts
        .into_iter()
        .filter_map(|part| match part {
            Frame::Bulk(data) => Some(data),
            _ => None,
        })
        .collect();

    let name = match args.first() {
        Some(name) => String::from_utf8_lossy(name).to_lowercase(),
        None => return Some(Frame::Error("ERR empty command".to_string())),
    };

    let response = match (&name[..], &args[1..]) {
        ("ping", []) => Frame::Simple("PONG".to_string()),
        ("ping", [msg]) => Frame::Bulk(msg.clone()),
        ("get", [key]) => match db.lock().unwrap().get(&key_of(key)) {
            Some((value, _)) => Frame::Bulk(value.clone()),
            None => Frame::Null,
        },
        ("set", [key, value]) => {
            db.lock().unwrap().insert(key_of(key), (value.clone(), None));
            Frame::Simple("OK".to_string())
        }
        ("set", [key, value, option, millis]) => match parse_px(option, millis) {
            Some(px) => {
                db.lock()
                    .unwrap()
                    .insert(key_of(key), (value.clone(), Some(px)));
                Frame::Simple("OK".to_string())
            }
            None => Frame::Error("ERR syntax error".to_string()),
        },
        ("pttl", [key]) => match db.lock().unwrap().get(&key_of(key)) {
            Some((_, Some(px))) => Frame::Integer(*px as i64),
            Some((_, None)) => Frame::Integer(-1),
            None => Frame::Integer(-2),
        },
        ("quit", []) => return None,
        (name, _) => Frame::Error(format!("ERR unknown command '{}'", name)),
    };

    Some(response)
}

fn parse_px(option: &Bytes, millis: &Bytes) -> Option<u64> {
    if !option.eq_ignore_ascii_case(b"px") {
        return None;
    }

    std::str::from_utf8(millis).ok()?.parse().ok()
}

/// `GET slow...`
fn is_slow(frame: &Frame) -> bool {
    match frame {
        Frame::Array(parts) => match &parts[..] {
            [Frame::Bulk(name), Frame::Bulk(key)] => {
                name.eq_ignore_ascii_case(b"get") && key.starts_with(b"slow")
            }
            _ => false,
        },
        _ => false,
    }
}

fn key_of(data: &Bytes) -> String {
    String::from_utf8_lossy(data).into_owned()
}
