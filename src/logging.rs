// Настройка логирования поверх `tracing`.
//
// Библиотека сама ничего не инициализирует: события пула пишутся через
// `tracing` и видны только если приложение поставило subscriber.
//
// ```rust
// use concurrent_work_queue::logging;
//
// logging::init_default();
//
// let config = logging::LogConfig {
//     level: tracing::Level::DEBUG,
//     json_format: true,
//     ..Default::default()
// };
// logging::init(config);
// ```
//
// Переменная окружения `RUST_LOG` имеет приоритет над `LogConfig::level`.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

pub use tracing::{debug, error, info, trace, warn};


#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub json_format: bool,
    pub with_thread_names: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            with_thread_names: true,
            with_target: false,
        }
    }
}

impl LogConfig {
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            with_target: true,
            ..Default::default()
        }
    }

    pub fn production() -> Self {
        Self {
            json_format: true,
            ..Default::default()
        }
    }
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()))
}

/// Ставит глобальный subscriber. Ошибка, если он уже установлен.
pub fn try_init(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = fmt()
        .with_env_filter(env_filter(config.level))
        .with_thread_names(config.with_thread_names)
        .with_target(config.with_target);

    if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// Как [`try_init`], но уже установленный subscriber не считается ошибкой.
pub fn init(config: LogConfig) {
    let _ = try_init(config);
}

/// INFO, консоль. Повторный вызов ничего не делает.
pub fn init_default() {
    init(LogConfig::default());
}

pub fn init_development() {
    init(LogConfig::development());
}
