// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        let right = u32::from(self.x) + u32::from(self.width);
        let bottom = u32::from(self.y) + u32::from(self.height);
        x >= self.x && u32::from(x) < right && y >= self.y && u32::from(y) < bottom
    }
}

#[derive(Debug)]
struct Listener {
    bounds: Bounds,
    triggered: Weak<Cell<bool>>,
}

#[derive(Debug, Default)]
struct HubInner {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

#[derive(Debug, Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_outside(&self, bounds: Bounds) -> OutsideClickSubscription {
        let triggered = Rc::new(Cell::new(false));
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.listeners.insert(
            id,
            Listener {
                bounds,
                triggered: Rc::downgrade(&triggered),
            },
        );
        OutsideClickSubscription {
            id,
            hub: Rc::downgrade(&self.inner),
            triggered,
        }
    }

    pub fn pointer_down(&self, x: u16, y: u16) -> usize {
        let inner = self.inner.borrow();
        let mut flagged = 0;
        for listener in inner.listeners.values() {
            if listener.bounds.contains(x, y) {
                continue;
            }
            if let Some(triggered) = listener.triggered.upgrade() {
                triggered.set(true);
                flagged += 1;
            }
        }
        flagged
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

#[derive(Debug)]
pub struct OutsideClickSubscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
    triggered: Rc<Cell<bool>>,
}

impl OutsideClickSubscription {
    pub fn is_triggered(&self) -> bool {
        self.triggered.get()
    }

    fn set_bounds(&self, bounds: Bounds) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        let mut inner = hub.borrow_mut();
        if let Some(listener) = inner.listeners.get_mut(&self.id) {
            listener.bounds = bounds;
        }
    }
}

impl Drop for OutsideClickSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.remove(&self.id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption<V> {
    pub value: V,
    pub label: String,
}

impl<V> DropdownOption<V> {
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownEvent<V> {
    Changed(V),
    Dismissed,
}

#[derive(Debug)]
pub struct Dropdown<V> {
    options: Vec<DropdownOption<V>>,
    value: V,
    placeholder: String,
    selected: Option<usize>,
    highlight: usize,
    bounds: Bounds,
    subscription: Option<OutsideClickSubscription>,
}

impl<V: Clone + PartialEq> Dropdown<V> {
    pub fn new(options: Vec<DropdownOption<V>>, value: V, placeholder: impl Into<String>) -> Self {
        let mut dropdown = Self {
            options,
            value,
            placeholder: placeholder.into(),
            selected: None,
            highlight: 0,
            bounds: Bounds::default(),
            subscription: None,
        };
        dropdown.refresh_selected();
        dropdown
    }

    pub fn options(&self) -> &[DropdownOption<V>] {
        &self.options
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn highlighted(&self) -> usize {
        self.highlight
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn display_label(&self) -> &str {
        match self.selected.and_then(|index| self.options.get(index)) {
            Some(option) => &option.label,
            None => &self.placeholder,
        }
    }

    pub fn set_value(&mut self, value: V) {
        self.value = value;
        self.refresh_selected();
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        if let Some(subscription) = &self.subscription {
            subscription.set_bounds(bounds);
        }
    }

    pub fn open(&mut self, hub: &PointerHub) {
        if self.is_open() {
            return;
        }
        self.highlight = self.selected.unwrap_or(0);
        self.subscription = Some(hub.subscribe_outside(self.bounds));
    }

    pub fn close(&mut self) -> Option<DropdownEvent<V>> {
        self.subscription.take().map(|_| DropdownEvent::Dismissed)
    }

    pub fn toggle(&mut self, hub: &PointerHub) -> Option<DropdownEvent<V>> {
        if self.is_open() {
            self.close()
        } else {
            self.open(hub);
            None
        }
    }

    pub fn select(&mut self, value: V) -> DropdownEvent<V> {
        self.subscription = None;
        self.value = value.clone();
        self.refresh_selected();
        DropdownEvent::Changed(value)
    }

    pub fn select_highlighted(&mut self) -> Option<DropdownEvent<V>> {
        if !self.is_open() {
            return None;
        }
        let value = self.options.get(self.highlight)?.value.clone();
        Some(self.select(value))
    }

    pub fn highlight_next(&mut self) {
        self.move_highlight(1);
    }

    pub fn highlight_prev(&mut self) {
        self.move_highlight(-1);
    }

    pub fn take_outside_close(&mut self) -> Option<DropdownEvent<V>> {
        let triggered = self
            .subscription
            .as_ref()
            .is_some_and(OutsideClickSubscription::is_triggered);
        if triggered { self.close() } else { None }
    }

    fn move_highlight(&mut self, delta: isize) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() as isize;
        self.highlight = (self.highlight as isize + delta).rem_euclid(len) as usize;
    }

    fn refresh_selected(&mut self) {
        self.selected = self
            .options
            .iter()
            .position(|option| option.value == self.value);
    }
}
