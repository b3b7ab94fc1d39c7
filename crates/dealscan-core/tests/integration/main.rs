mod catalog_markup_tests;
mod common;
mod scenario_tests;
