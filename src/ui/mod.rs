pub mod charts;
pub mod heatmap;
pub mod panels;
pub mod table;
pub mod tabs;
