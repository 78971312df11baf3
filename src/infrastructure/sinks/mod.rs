pub mod json_report;
