//! PostgreSQL connection management on top of SeaORM.

mod config;
mod connector;
mod health;
mod schema;

pub use config::PostgresConfig;
pub use connector::{connect, connect_with_retry};
pub use health::check_health;
pub use schema::create_table_if_missing;

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
