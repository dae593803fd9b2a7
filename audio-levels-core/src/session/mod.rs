pub mod level_session;
