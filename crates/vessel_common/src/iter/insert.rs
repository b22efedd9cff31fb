use std::collections::VecDeque;

use super::{category::OutputTag, cursor::*};

/// Containers that can append an element.
pub trait PushBack {
    /// Element type of the container
    type Item;

    /// Append `value` after the last element.
    fn push_back(&mut self, value: Self::Item);
}

/// Containers that can prepend an element.
pub trait PushFront {
    /// Element type of the container
    type Item;

    /// Prepend `value` before the first element.
    fn push_front(&mut self, value: Self::Item);
}

/// Containers that can insert an element before a position.
pub trait InsertAt {
    /// Element type of the container
    type Item;

    /// Insert `value` before `index`, returning the index the value ended up at.
    fn insert_at(&mut self, index: usize, value: Self::Item) -> usize;
}

impl<T> PushBack for Vec<T> {
    type Item = T;

    fn push_back(&mut self, value: T) {
        self.push(value);
    }
}

impl<T> InsertAt for Vec<T> {
    type Item = T;

    fn insert_at(&mut self, index: usize, value: T) -> usize {
        self.insert(index, value);
        index
    }
}

impl<T> PushBack for VecDeque<T> {
    type Item = T;

    fn push_back(&mut self, value: T) {
        VecDeque::push_back(self, value);
    }
}

impl<T> PushFront for VecDeque<T> {
    type Item = T;

    fn push_front(&mut self, value: T) {
        VecDeque::push_front(self, value);
    }
}

impl<T> InsertAt for VecDeque<T> {
    type Item = T;

    fn insert_at(&mut self, index: usize, value: T) -> usize {
        self.insert(index, value);
        index
    }
}

//------------------------------------------------------------------------------------------------------------------------------

/// Output cursor appending everything written through it to a container.
#[derive(Debug)]
pub struct BackInserter<'a, S> {
    container: &'a mut S,
}

impl<'a, S: PushBack> BackInserter<'a, S> {
    pub fn new(container: &'a mut S) -> Self {
        Self { container }
    }
}

impl<'a, S: PushBack> IteratorTraits for BackInserter<'a, S> {
    type Category = OutputTag;
    type Value = S::Item;
}

impl<'a, S: PushBack> OutputCursor for BackInserter<'a, S> {
    fn put(&mut self, value: S::Item) {
        self.container.push_back(value);
    }
}

/// Output cursor prepending everything written through it to a container.
///
/// Values end up in the container in the reverse order they were written.
#[derive(Debug)]
pub struct FrontInserter<'a, S> {
    container: &'a mut S,
}

impl<'a, S: PushFront> FrontInserter<'a, S> {
    pub fn new(container: &'a mut S) -> Self {
        Self { container }
    }
}

impl<'a, S: PushFront> IteratorTraits for FrontInserter<'a, S> {
    type Category = OutputTag;
    type Value = S::Item;
}

impl<'a, S: PushFront> OutputCursor for FrontInserter<'a, S> {
    fn put(&mut self, value: S::Item) {
        self.container.push_front(value);
    }
}

/// Output cursor inserting into a container at a position, which moves past every inserted value.
///
/// Values end up in the container in the order they were written.
#[derive(Debug)]
pub struct Inserter<'a, S> {
    container: &'a mut S,
    pos:       usize,
}

impl<'a, S: InsertAt> Inserter<'a, S> {
    pub fn new(container: &'a mut S, pos: usize) -> Self {
        Self { container, pos }
    }

    /// Index the next value will be inserted at.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a, S: InsertAt> IteratorTraits for Inserter<'a, S> {
    type Category = OutputTag;
    type Value = S::Item;
}

impl<'a, S: InsertAt> OutputCursor for Inserter<'a, S> {
    fn put(&mut self, value: S::Item) {
        self.pos = self.container.insert_at(self.pos, value) + 1;
    }
}

/// Create a [`BackInserter`] for `container`.
pub fn back_inserter<S: PushBack>(container: &mut S) -> BackInserter<'_, S> {
    BackInserter::new(container)
}

/// Create a [`FrontInserter`] for `container`.
pub fn front_inserter<S: PushFront>(container: &mut S) -> FrontInserter<'_, S> {
    FrontInserter::new(container)
}

/// Create an [`Inserter`] for `container`, starting at `pos`.
pub fn inserter<S: InsertAt>(container: &mut S, pos: usize) -> Inserter<'_, S> {
    Inserter::new(container, pos)
}
