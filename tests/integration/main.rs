mod api_tests;
mod query_mapping;
