pub mod in_memory;
pub mod task;
pub mod user;

pub use in_memory::InMemoryTaskRepository;
pub use in_memory::InMemoryUserRepository;
pub use task::PostgresTaskRepository;
pub use user::PostgresUserRepository;
