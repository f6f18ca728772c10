// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

// Built-in dispatchers
pub mod cd;
pub mod context_dispatcher;
pub mod core_dispatcher;
pub mod exit;
pub mod help;

pub use context_dispatcher::ContextDispatcher;
pub use core_dispatcher::{CoreDispatcher, VERSION};
