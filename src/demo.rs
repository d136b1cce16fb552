//! Команды демонстрационной программы.
//!
//! Каждая функция выполняет одну-две команды на переданном соединении и
//! пишет результат в `out`. Ошибки возвращаются вызывающей стороне без изменений.

use crate::{Client, User};

use std::io::Write;
use std::str;
use tracing::instrument;

/// Ключ строкового значения.
pub const FAVORITE_MOVIE: &str = "Favorite Movie";

/// Ключ целочисленного значения.
pub const RELEASE_YEAR: &str = "Release Year";

/// Ключ, который никогда не устанавливается.
pub const NONEXISTENT_KEY: &str = "Nonexistent Key";

/// Ключ, под которым сохраняется профиль пользователя.
pub const OBJECT_PREFIX: &str = "12345";

/// Проверяет соединение командой `PING` и печатает ответ.
#[instrument(skip_all)]
pub async fn ping(client: &mut Client, out: &mut impl Write) -> crate::Result<()> {
    let pong = client.ping(None).await?;

    let pong = str::from_utf8(&pong).map_err(|_| "Ответ на `PING` не является строкой.")?;
    writeln!(out, "PING Response = {}", pong)?;

    Ok(())
}

/// Устанавливает строковое и целочисленное значения.
#[instrument(skip_all)]
pub async fn set(client: &mut Client) -> crate::Result<()> {
    client.set(FAVORITE_MOVIE, "Repo Man").await?;
    client.set(RELEASE_YEAR, 1984).await?;

    Ok(())
}

/// Читает значения, установленные `set`, и отсутствующий ключ.
#[instrument(skip_all)]
pub async fn get(client: &mut Client, out: &mut impl Write) -> crate::Result<()> {
    let movie: String = client.get(FAVORITE_MOVIE).await?;
    writeln!(out, "{} = {}", FAVORITE_MOVIE, movie)?;

    let year: i64 = client.get(RELEASE_YEAR).await?;
    writeln!(out, "{} = {}", RELEASE_YEAR, year)?;

    // Отсутствие ключа - ожидаемый результат, а не ошибка
    match client.get::<String>(NONEXISTENT_KEY).await {
        Ok(value) => writeln!(out, "{} = {}", NONEXISTENT_KEY, value)?,
        Err(err) if err.is_nil() => writeln!(out, "{} does not exist", NONEXISTENT_KEY)?,
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Сериализует профиль пользователя в JSON и сохраняет его под `OBJECT_PREFIX`.
#[instrument(skip_all)]
pub async fn set_struct(client: &mut Client) -> crate::Result<()> {
    client.set_json(OBJECT_PREFIX, &User::example()).await
}
