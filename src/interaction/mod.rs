//! Event handling and user interactions for order-bot.
//!
//! This module provides functionality for each step of the ordering flow:
//! - Answering mentions in the ordering channel with a menu
//! - Dispatching button, select, and dialog callbacks
//! - Building the canned messages and dialogs of the flow

pub mod action;
pub mod mention;
pub mod order;
