pub mod allocation;
pub mod balance_accumulator;
pub mod holder_eligibility;
pub mod report;
