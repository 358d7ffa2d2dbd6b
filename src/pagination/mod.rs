mod iterator;

pub use iterator::PageIterator;
