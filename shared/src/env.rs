use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

pub fn which() -> Environment {
    let default_env = if cfg!(debug_assertions) {
        "development"
    } else {
        "production"
    };

    match env::var("ENV")
        .unwrap_or_else(|_| default_env.into())
        .to_lowercase()
        .as_str()
    {
        "production" => Environment::Production,
        _ => Environment::Development,
    }
}
