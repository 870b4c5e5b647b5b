pub mod ip_history;
pub mod points;
