mod controls;
mod details;
mod legend;
mod panels;
