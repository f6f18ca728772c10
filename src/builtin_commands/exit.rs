// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

use crate::stack::DispatcherStack;

/// Pop every dispatcher; the host loop ends once the stack is empty.
/// Returns how many entries were removed.
pub fn execute(stack: &mut DispatcherStack) -> usize {
    let mut popped = 0;
    while stack.pop().is_some() {
        popped += 1;
    }
    popped
}
