pub mod inspect;
pub mod load;
pub mod run;
pub mod schema;
pub mod verify;
