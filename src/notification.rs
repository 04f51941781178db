//! Value-change notification slots.
//!
//! A [`ChangeNotifier`] holds zero or one handler. When a property setter
//! raises it, the handler runs synchronously with a [`ChangedEventArgs`]
//! describing the transition and may replace the proposed value before it is
//! stored. Owning documents use this to redirect assignments (for example to
//! swap a layer for the one registered in the document's own layer table)
//! without the object needing to know about the document.

use std::fmt;

/// Arguments passed to a [`ChangeNotifier`] handler.
///
/// The old value is read-only. The new value can be inspected and replaced;
/// whatever it holds when the handler returns is what the setter stores.
pub struct ChangedEventArgs<'a, T> {
    old_value: &'a T,
    new_value: T,
}

impl<'a, T> ChangedEventArgs<'a, T> {
    /// Create the arguments for a transition from `old_value` to `new_value`.
    pub fn new(old_value: &'a T, new_value: T) -> Self {
        Self {
            old_value,
            new_value,
        }
    }

    /// The value before the change.
    pub fn old_value(&self) -> &T {
        self.old_value
    }

    /// The proposed value.
    pub fn new_value(&self) -> &T {
        &self.new_value
    }

    /// Mutable access to the proposed value.
    pub fn new_value_mut(&mut self) -> &mut T {
        &mut self.new_value
    }

    /// Replace the proposed value.
    pub fn set_new_value(&mut self, value: T) {
        self.new_value = value;
    }

    /// Consume the arguments, yielding the (possibly replaced) new value.
    pub fn into_new_value(self) -> T {
        self.new_value
    }
}

impl<T: fmt::Debug> fmt::Debug for ChangedEventArgs<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangedEventArgs")
            .field("old_value", self.old_value)
            .field("new_value", &self.new_value)
            .finish()
    }
}

type ChangeHandler<T> = Box<dyn FnMut(&mut ChangedEventArgs<'_, T>)>;

/// A typed event slot invoked on a value transition.
pub struct ChangeNotifier<T> {
    handler: Option<ChangeHandler<T>>,
}

impl<T> ChangeNotifier<T> {
    /// Create a slot with no handler.
    pub fn new() -> Self {
        Self { handler: None }
    }

    /// Register the handler, replacing any previous one.
    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&mut ChangedEventArgs<'_, T>) + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Remove the handler. Returns `true` if one was registered.
    pub fn unsubscribe(&mut self) -> bool {
        self.handler.take().is_some()
    }

    /// Check whether a handler is registered.
    pub fn is_subscribed(&self) -> bool {
        self.handler.is_some()
    }

    /// Run the handler for the transition `old_value -> new_value` and
    /// return the value to store.
    ///
    /// Without a handler this is the identity on `new_value`.
    pub fn raise(&mut self, old_value: &T, new_value: T) -> T {
        match self.handler.as_mut() {
            Some(handler) => {
                let mut args = ChangedEventArgs::new(old_value, new_value);
                handler(&mut args);
                args.into_new_value()
            }
            None => new_value,
        }
    }
}

impl<T> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}
