mod support;

use redis_pool_demo::{demo, Client, User};

use support::start_store;

#[tokio::test]
async fn ping_prints_response() {
    let store = start_store().await;
    let mut client = Client::connect(store.addr).await.unwrap();
    let mut out = Vec::new();

    demo::ping(&mut client, &mut out).await.unwrap();

    assert_eq!("PING Response = PONG\n", String::from_utf8(out).unwrap());
}

#[tokio::test]
async fn set_then_get_prints_values_and_missing_key() {
    let store = start_store().await;
    let mut client = Client::connect(store.addr).await.unwrap();
    let mut out = Vec::new();

    demo::set(&mut client).await.unwrap();
    demo::get(&mut client, &mut out).await.unwrap();

    assert_eq!(
        "Favorite Movie = Repo Man\n\
         Release Year = 1984\n\
         Nonexistent Key does not exist\n",
        String::from_utf8(out).unwrap()
    );
}

/// Без предварительного `set` первый же `GET` возвращает `Nil`, и ошибка
/// поднимается к вызывающей стороне.
#[tokio::test]
async fn get_without_set_returns_error() {
    let store = start_store().await;
    let mut client = Client::connect(store.addr).await.unwrap();
    let mut out = Vec::new();

    assert!(demo::get(&mut client, &mut out).await.is_err());
    assert!(out.is_empty());
}

#[tokio::test]
async fn set_struct_stores_json_record() {
    let store = start_store().await;
    let mut client = Client::connect(store.addr).await.unwrap();

    demo::set_struct(&mut client).await.unwrap();

    let raw: String = client.get(demo::OBJECT_PREFIX).await.unwrap();
    assert_eq!(
        r#"{"ispro":true,"userid":"4","username":"agnynureza","playerid":""}"#,
        raw
    );

    let user: User = serde_json::from_str(&raw).unwrap();
    assert_eq!(User::example(), user);
}
