pub mod comparators;
pub mod index;
pub mod sort_check;
