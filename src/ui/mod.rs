pub mod dialogs;
pub mod employee_panel;
pub mod gantt_chart;
pub mod theme;
pub mod toolbar;
