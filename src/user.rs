use serde::{Deserialize, Serialize};

/// Профиль пользователя, сохраняемый в виде JSON.
///
/// Все поля всегда присутствуют в сериализованном значении, включая пустой
/// `playerid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ispro")]
    pub is_pro: bool,

    /// Числовой идентификатор, хранящийся как текст
    #[serde(rename = "userid")]
    pub user_id: String,

    pub username: String,

    /// Дополнительный идентификатор, может быть пустым
    #[serde(rename = "playerid")]
    pub player_id: String,
}

impl User {
    /// Возвращает профиль, который сохраняет демонстрационная программа.
    pub fn example() -> User {
        User {
            is_pro: true,
            user_id: "4".to_string(),
            username: "agnynureza".to_string(),
            player_id: String::new(),
        }
    }
}
