pub mod adapter;
pub mod classification;
pub mod error;
pub mod pipeline;
pub mod record;
