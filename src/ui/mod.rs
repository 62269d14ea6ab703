pub mod charts;
pub mod heatmap;
pub mod panels;
pub mod table;
