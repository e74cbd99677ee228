use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// UI-level events an element reacts to during its next `update`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct UiEvent: u8 {
        const HIDDEN = 1 << 0;
        const VISIBLE = 1 << 1;
        const OPACITY_CHANGE = 1 << 2;
    }
}

bitflags! {
    /// Pending invalidations an element reports to its parent during the frame sweep.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u8 {
        const MEASURE = 1 << 0;
        const ARRANGE = 1 << 1;
        const RENDER_ORDER = 1 << 2;
        const VISIBILITY = 1 << 3;
        const OPACITY = 1 << 4;
    }
}

impl ChangeFlags {
    pub fn affects_layout(self) -> bool {
        self.intersects(Self::MEASURE | Self::VISIBILITY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrolledEvent {
    pub panel_id: u64,
    pub index: usize,
    pub scroll_to_first: bool,
}

pub type ScrolledHandler = Box<dyn FnMut(&ScrolledEvent)>;

#[derive(Default)]
pub struct ScrolledHandlers {
    handlers: Vec<ScrolledHandler>,
}

impl ScrolledHandlers {
    pub fn push<F>(&mut self, handler: F)
    where
        F: FnMut(&ScrolledEvent) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn invoke(&mut self, event: &ScrolledEvent) {
        for handler in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ScrolledHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrolledHandlers")
            .field("len", &self.handlers.len())
            .finish()
    }
}
