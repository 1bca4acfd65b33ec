pub mod comparator;
pub mod recommendation;
