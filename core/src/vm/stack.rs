use crate::Vec;
use alloc::fmt;

/// The operand stack of the VM, doubling as variable storage.
///
/// Values are pushed and popped at the top, while variable slots are read and
/// written by absolute index counted from the bottom (`get(0)` is the oldest
/// element still on the stack).
///
/// # Examples
///
/// ```ignore
/// use stackloop_core::vm::Stack;
///
/// let mut stack = Stack::new(16);
/// stack.push(42);
/// stack.push(17);
/// assert_eq!(stack.get(0), Some(&42));
/// assert_eq!(stack.pop(), Some(17));
/// assert_eq!(stack.len(), 1);
/// ```
pub struct Stack<T> {
    /// The underlying storage for stack elements, bottom first.
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack, pre-allocating room for `capacity` elements.
    ///
    /// The stack grows past `capacity` as needed; loops whose bodies leave
    /// values behind grow it without bound.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Pushes a value onto the stack.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Removes and returns the top value from the stack.
    ///
    /// Returns `None` if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns the element at `index` counted from the bottom.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns a mutable reference to the element at `index` counted from the bottom.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Returns the current number of elements on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// All elements, bottom first.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> Stack<T> {
    /// Pushes every element of `values`, in order.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.items.extend_from_slice(values);
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("items", &self.items)
            .field("len", &self.items.len())
            .finish()
    }
}
