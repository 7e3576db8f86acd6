pub mod error;
pub mod connection;
pub mod consent_record;
pub mod consent_sql;
