pub mod quote;
pub mod tariffs;
