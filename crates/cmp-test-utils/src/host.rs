//! [`FakeHost`] for steering the host context between queries.

use cmp_config::{BufferId, HostContext};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
struct HostState {
    cmdline: Option<String>,
    suitable: bool,
    buffer: BufferId,
    filetypes: HashMap<BufferId, String>,
}

/// A host context whose state can be changed while a store holds it.
///
/// Share it with the store through an `Rc`:
///
/// ```rust
/// use cmp_config::ConfigStore;
/// use cmp_test_utils::FakeHost;
/// use std::rc::Rc;
///
/// let host = FakeHost::in_buffer(1, "lua").shared();
/// let store = ConfigStore::new(Rc::clone(&host));
///
/// host.enter_cmdline(":");
/// assert_eq!(store.plan().mode.name(), "cmdline");
/// ```
#[derive(Debug)]
pub struct FakeHost {
    state: RefCell<HostState>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// Insert mode in buffer 1, no filetype
    pub fn new() -> Self {
        Self {
            state: RefCell::new(HostState {
                cmdline: None,
                suitable: true,
                buffer: 1,
                filetypes: HashMap::new(),
            }),
        }
    }

    /// Insert mode in `buffer` with the given filetype
    pub fn in_buffer(buffer: BufferId, filetype: &str) -> Self {
        let host = Self::new();
        host.switch_buffer(buffer, filetype);
        host
    }

    /// Wrap in an `Rc` for sharing with a store
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Make `buffer` current and record its filetype
    pub fn switch_buffer(&self, buffer: BufferId, filetype: &str) {
        let mut state = self.state.borrow_mut();
        state.buffer = buffer;
        state.filetypes.insert(buffer, filetype.to_string());
    }

    /// Change the filetype of `buffer` without switching to it
    pub fn set_filetype(&self, buffer: BufferId, filetype: &str) {
        self.state
            .borrow_mut()
            .filetypes
            .insert(buffer, filetype.to_string());
    }

    pub fn enter_cmdline(&self, kind: &str) {
        self.state.borrow_mut().cmdline = Some(kind.to_string());
    }

    pub fn leave_cmdline(&self) {
        self.state.borrow_mut().cmdline = None;
    }

    pub fn set_suitable(&self, suitable: bool) {
        self.state.borrow_mut().suitable = suitable;
    }
}

impl HostContext for FakeHost {
    fn is_cmdline_mode(&self) -> bool {
        self.state.borrow().cmdline.is_some()
    }

    fn cmdline_type(&self) -> String {
        self.state.borrow().cmdline.clone().unwrap_or_default()
    }

    fn is_suitable_mode(&self) -> bool {
        self.state.borrow().suitable
    }

    fn current_buffer(&self) -> BufferId {
        self.state.borrow().buffer
    }

    fn buffer_filetype(&self, buffer: BufferId) -> String {
        self.state
            .borrow()
            .filetypes
            .get(&buffer)
            .cloned()
            .unwrap_or_default()
    }
}
