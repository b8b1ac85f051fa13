mod reporting;
mod wrappers;
