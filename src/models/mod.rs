pub mod envelope;
pub mod quote;
pub mod quote_record;
