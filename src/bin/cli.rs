use redis_pool_demo::{demo, Pool, PoolConfig, DEFAULT_PORT, MAX_ACTIVE, MAX_IDLE};

use clap::{Parser, Subcommand};
use std::io;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(
    name = "redis-pool-demo",
    version,
    author,
    about = "Демонстрация команд Redis через пул соединений"
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,

    #[clap(name = "hostname", long, default_value = "127.0.0.1")]
    host: String,

    #[clap(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Максимальное количество простаивающих соединений.
    #[clap(long, default_value_t = MAX_IDLE)]
    max_idle: usize,

    /// Максимальное количество активных соединений.
    #[clap(long, default_value_t = MAX_ACTIVE)]
    max_active: usize,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Проверяет соединение.
    Ping,
    /// Устанавливает строковое и целочисленное значения.
    Set,
    /// Читает значения, включая отсутствующий ключ.
    Get,
    /// Сохраняет профиль пользователя в виде JSON (по умолчанию).
    SetStruct,
    /// Выполняет все команды по очереди.
    All,
}

/// Входная точка CLI.
///
/// `flavor = "current_thread"` используется для предотвращения выделения фоновых потоков.
#[tokio::main(flavor = "current_thread")]
async fn main() -> redis_pool_demo::Result<()> {
    // Включаем логирование, уровень задается через `RUST_LOG`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()?;

    let cli = Cli::parse();

    let pool = Pool::new(PoolConfig {
        addr: format!("{}:{}", cli.host, cli.port),
        max_idle: cli.max_idle,
        max_active: cli.max_active,
        ..PoolConfig::default()
    });

    // Без соединения продолжать нечего
    let mut client = match pool.get().await {
        Ok(client) => client,
        Err(err) => {
            error!(cause = %err, addr = %pool.config().addr, "невозможно установить соединение");
            process::exit(1);
        }
    };

    let mut out = io::stdout();

    let result = match cli.command.unwrap_or(Command::SetStruct) {
        Command::Ping => demo::ping(&mut client, &mut out).await,
        Command::Set => demo::set(&mut client).await,
        Command::Get => demo::get(&mut client, &mut out).await,
        Command::SetStruct => demo::set_struct(&mut client).await,
        Command::All => run_all(&mut client, &mut out).await,
    };

    // Ошибки печатаются, код завершения от них не зависит
    if let Err(err) = result {
        println!("{}", err);
    }

    Ok(())
}

async fn run_all(
    client: &mut redis_pool_demo::Client,
    out: &mut io::Stdout,
) -> redis_pool_demo::Result<()> {
    demo::ping(client, out).await?;
    demo::set(client).await?;
    demo::get(client, out).await?;
    demo::set_struct(client).await
}
