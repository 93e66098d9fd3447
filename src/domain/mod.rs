pub mod batch;
pub mod classification;
pub mod ticket;
