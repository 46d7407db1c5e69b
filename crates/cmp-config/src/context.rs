//! Host execution context
//!
//! The resolver picks which layers apply by asking the host where the user
//! currently is. [`HostContext`] is that query surface.

/// Buffer identifier as reported by the host
pub type BufferId = i64;

/// Queries the resolver makes against the host environment
pub trait HostContext {
    /// Whether the user is typing on the command line
    fn is_cmdline_mode(&self) -> bool;

    /// Command-line type (`:`, `/`, `?`, ...). Only meaningful in command-line mode.
    fn cmdline_type(&self) -> String;

    /// Whether the current mode allows completion at all
    fn is_suitable_mode(&self) -> bool;

    fn current_buffer(&self) -> BufferId;

    fn buffer_filetype(&self, buffer: BufferId) -> String;
}

impl<T: HostContext + ?Sized> HostContext for std::rc::Rc<T> {
    fn is_cmdline_mode(&self) -> bool {
        (**self).is_cmdline_mode()
    }

    fn cmdline_type(&self) -> String {
        (**self).cmdline_type()
    }

    fn is_suitable_mode(&self) -> bool {
        (**self).is_suitable_mode()
    }

    fn current_buffer(&self) -> BufferId {
        (**self).current_buffer()
    }

    fn buffer_filetype(&self, buffer: BufferId) -> String {
        (**self).buffer_filetype(buffer)
    }
}

impl<T: HostContext + ?Sized> HostContext for std::sync::Arc<T> {
    fn is_cmdline_mode(&self) -> bool {
        (**self).is_cmdline_mode()
    }

    fn cmdline_type(&self) -> String {
        (**self).cmdline_type()
    }

    fn is_suitable_mode(&self) -> bool {
        (**self).is_suitable_mode()
    }

    fn current_buffer(&self) -> BufferId {
        (**self).current_buffer()
    }

    fn buffer_filetype(&self, buffer: BufferId) -> String {
        (**self).buffer_filetype(buffer)
    }
}

/// A fixed snapshot of the host state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticContext {
    /// `Some(kind)` while on the command line
    pub cmdline: Option<String>,
    pub suitable: bool,
    pub buffer: BufferId,
    pub filetype: String,
}

impl Default for StaticContext {
    fn default() -> Self {
        Self {
            cmdline: None,
            suitable: true,
            buffer: 1,
            filetype: String::new(),
        }
    }
}

impl StaticContext {
    /// Insert mode in `buffer` whose filetype is `filetype`
    pub fn insert_mode(buffer: BufferId, filetype: impl Into<String>) -> Self {
        Self {
            buffer,
            filetype: filetype.into(),
            ..Self::default()
        }
    }

    /// Command-line mode of the given type
    pub fn cmdline(kind: impl Into<String>) -> Self {
        Self {
            cmdline: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Mark the snapshot as a mode where completion must stay off
    pub fn unsuitable(mut self) -> Self {
        self.suitable = false;
        self
    }
}

impl HostContext for StaticContext {
    fn is_cmdline_mode(&self) -> bool {
        self.cmdline.is_some()
    }

    fn cmdline_type(&self) -> String {
        self.cmdline.clone().unwrap_or_default()
    }

    fn is_suitable_mode(&self) -> bool {
        self.suitable
    }

    fn current_buffer(&self) -> BufferId {
        self.buffer
    }

    fn buffer_filetype(&self, buffer: BufferId) -> String {
        if buffer == self.buffer {
            self.filetype.clone()
        } else {
            String::new()
        }
    }
}
