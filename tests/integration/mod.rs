//! Integration tests for parsesmith

mod check_command;
mod config_integration;
mod llm_strategy;
mod oracle_properties;
mod retry_loop;
mod test_utils;
