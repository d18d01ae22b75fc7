mod db_setup;
mod run;
mod store;

pub use db_setup::count_rows;
pub use run::run;
