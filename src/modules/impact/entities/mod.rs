pub mod impact;
