/// Error types shared by the help-center crates.
///
/// Infrastructure failures (Redis) live here. The service crate defines its own
/// `AppError` for configuration, dataset and lookup failures.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis not configured")]
    RedisUnavailable,
}
