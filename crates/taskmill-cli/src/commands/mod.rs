pub mod add;
pub mod list;
pub mod run;
pub mod toggle;
