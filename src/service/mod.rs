pub mod bootstrap;
pub mod handover;
pub mod layout;
pub mod password;
pub mod permissions;
pub mod probe;
pub mod schema_init;
pub mod seeder;
