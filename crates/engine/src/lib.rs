pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};
pub use pool::{DatabasePool, PoolOptions};
pub use users::{NewUser, User, UserField};

mod error;
mod ops;
pub mod pool;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
