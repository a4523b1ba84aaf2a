//! An arena-backed doubly linked list that keeps elements ordered by recency.
//!
//! The front holds the most recently touched element, the back the least recently touched one.
//! Nodes live in a growable `Vec`; removed slots are recycled through a free list. Elements are
//! addressed by [`Handle`]s, which carry a generation counter: once an element has been removed,
//! every handle that pointed to it is rejected, even if its slot has been reused since.
//!
//! All structural operations (`push_front`, `push_back`, `remove`, `move_to_front`) are O(1).
//!
//! ```rust
//! use previewer_core::cache::RecencyList;
//!
//! let mut list = RecencyList::new();
//! let a = list.push_front("a");
//! let b = list.push_front("b");
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["b", "a"]);
//!
//! list.move_to_front(a);
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["a", "b"]);
//!
//! assert_eq!(list.remove(b), Some("b"));
//! assert_eq!(list.remove(b), None);
//! assert_eq!(list.len(), 1);
//! ```

use std::fmt::Debug;

/// A stable reference to an element of a [`RecencyList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
	index: usize,
	generation: u64,
}

struct Node<T> {
	value: Option<T>,
	prev: Option<usize>,
	next: Option<usize>,
	generation: u64,
}

pub struct RecencyList<T> {
	nodes: Vec<Node<T>>,
	free: Vec<usize>,
	front: Option<usize>,
	back: Option<usize>,
	len: usize,
}

impl<T> RecencyList<T> {
	#[must_use]
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	/// Creates an empty list with room for `capacity` elements before the arena reallocates.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			nodes: Vec::with_capacity(capacity),
			free: Vec::new(),
			front: None,
			back: None,
			len: 0,
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Inserts `value` as the most recently used element.
	pub fn push_front(&mut self, value: T) -> Handle {
		let index = self.alloc(value);
		self.link_front(index);
		self.len += 1;
		self.handle_of(index)
	}

	/// Inserts `value` as the least recently used element.
	pub fn push_back(&mut self, value: T) -> Handle {
		let index = self.alloc(value);
		self.link_back(index);
		self.len += 1;
		self.handle_of(index)
	}

	/// Detaches the element and returns its value.
	///
	/// Returns `None` for a stale handle (the element was already removed) or a handle issued by
	/// another list, leaving the list untouched.
	pub fn remove(&mut self, handle: Handle) -> Option<T> {
		let index = self.resolve(handle)?;
		self.unlink(index);

		let node = &mut self.nodes[index];
		let value = node.value.take();
		node.generation = node.generation.wrapping_add(1);
		self.free.push(index);
		self.len -= 1;
		value
	}

	/// Promotes the element to the front, keeping the relative order of all others.
	///
	/// Returns `false` if the handle is stale.
	pub fn move_to_front(&mut self, handle: Handle) -> bool {
		let Some(index) = self.resolve(handle) else {
			return false;
		};
		if self.front != Some(index) {
			self.unlink(index);
			self.link_front(index);
		}
		true
	}

	pub fn front(&self) -> Option<Handle> {
		self.front.map(|index| self.handle_of(index))
	}

	pub fn back(&self) -> Option<Handle> {
		self.back.map(|index| self.handle_of(index))
	}

	pub fn get(&self, handle: Handle) -> Option<&T> {
		let index = self.resolve(handle)?;
		self.nodes[index].value.as_ref()
	}

	pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
		let index = self.resolve(handle)?;
		self.nodes[index].value.as_mut()
	}

	/// Iterates from the most to the least recently used element.
	pub fn iter(&self) -> Iter<'_, T> {
		Iter {
			list: self,
			cursor: self.front,
			remaining: self.len,
		}
	}

	/// Removes all elements. Every handle issued so far becomes stale.
	pub fn clear(&mut self) {
		let mut cursor = self.front;
		while let Some(index) = cursor {
			let node = &mut self.nodes[index];
			cursor = node.next;
			node.value = None;
			node.prev = None;
			node.next = None;
			node.generation = node.generation.wrapping_add(1);
			self.free.push(index);
		}
		self.front = None;
		self.back = None;
		self.len = 0;
	}

	/// Walks the links in both directions and checks that they agree with each other and with
	/// `len()`. The walk is bounded by the arena size, so a cycle is reported instead of looping.
	pub fn is_consistent(&self) -> bool {
		let limit = self.nodes.len() + 1;

		let mut forward = Vec::with_capacity(self.len);
		let mut prev = None;
		let mut cursor = self.front;
		while let Some(index) = cursor {
			if forward.len() >= limit {
				return false;
			}
			let node = &self.nodes[index];
			if node.value.is_none() || node.prev != prev {
				return false;
			}
			forward.push(index);
			prev = Some(index);
			cursor = node.next;
		}
		if prev != self.back || forward.len() != self.len {
			return false;
		}

		let mut steps = 0;
		let mut cursor = self.back;
		while let Some(index) = cursor {
			steps += 1;
			if steps > forward.len() || forward[forward.len() - steps] != index {
				return false;
			}
			cursor = self.nodes[index].prev;
		}
		steps == self.len
	}

	fn alloc(&mut self, value: T) -> usize {
		if let Some(index) = self.free.pop() {
			let node = &mut self.nodes[index];
			node.value = Some(value);
			node.prev = None;
			node.next = None;
			index
		} else {
			self.nodes.push(Node {
				value: Some(value),
				prev: None,
				next: None,
				generation: 0,
			});
			self.nodes.len() - 1
		}
	}

	fn resolve(&self, handle: Handle) -> Option<usize> {
		let node = self.nodes.get(handle.index)?;
		(node.generation == handle.generation && node.value.is_some()).then_some(handle.index)
	}

	fn handle_of(&self, index: usize) -> Handle {
		Handle {
			index,
			generation: self.nodes[index].generation,
		}
	}

	fn link_front(&mut self, index: usize) {
		self.nodes[index].prev = None;
		self.nodes[index].next = self.front;
		match self.front {
			Some(old_front) => self.nodes[old_front].prev = Some(index),
			None => self.back = Some(index),
		}
		self.front = Some(index);
	}

	fn link_back(&mut self, index: usize) {
		self.nodes[index].next = None;
		self.nodes[index].prev = self.back;
		match self.back {
			Some(old_back) => self.nodes[old_back].next = Some(index),
			None => self.front = Some(index),
		}
		self.back = Some(index);
	}

	fn unlink(&mut self, index: usize) {
		let (prev, next) = (self.nodes[index].prev, self.nodes[index].next);
		match prev {
			Some(prev) => self.nodes[prev].next = next,
			None => self.front = next,
		}
		match next {
			Some(next) => self.nodes[next].prev = prev,
			None => self.back = prev,
		}
		self.nodes[index].prev = None;
		self.nodes[index].next = None;
	}
}

impl<T> Default for RecencyList<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Debug> Debug for RecencyList<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

pub struct Iter<'a, T> {
	list: &'a RecencyList<T>,
	cursor: Option<usize>,
	remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		if self.remaining == 0 {
			return None;
		}
		let node = &self.list.nodes[self.cursor?];
		self.cursor = node.next;
		self.remaining -= 1;
		node.value.as_ref()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(0, Some(self.remaining))
	}
}

impl<'a, T> IntoIterator for &'a RecencyList<T> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
