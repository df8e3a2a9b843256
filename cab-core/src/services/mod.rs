pub mod consolidate;
pub mod encoding;
pub mod enrich;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod semester;
pub mod store;
