pub mod dashboard;
pub mod data_series;
pub mod selection;
pub mod view;
